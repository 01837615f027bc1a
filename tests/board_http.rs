use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use postboard::{
    application::{
        board::{BoardService, Paging},
        repos::{PostsRepo, RepoError},
    },
    domain::posts::{Post, PostDraft, PostId},
    infra::http::{BoardAppState, build_router},
};
use postboard_api_types::ListPostsQuery;
use tower::ServiceExt;

/// Behaves like a json-server `/posts` collection.
#[derive(Default)]
struct MemoryRepo {
    posts: Mutex<Vec<Post>>,
    failing: AtomicBool,
}

impl MemoryRepo {
    fn seeded(count: i64) -> Self {
        let posts = (1..=count)
            .map(|id| Post {
                id,
                title: format!("Post {id}"),
                body: format!("Post {id} Body"),
            })
            .collect();
        Self {
            posts: Mutex::new(posts),
            failing: AtomicBool::new(false),
        }
    }

    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RepoError::Status {
                status: 500,
                body: "unavailable".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PostsRepo for MemoryRepo {
    async fn list(&self, query: &ListPostsQuery) -> Result<Vec<Post>, RepoError> {
        self.check()?;
        let posts = self.posts.lock().expect("posts lock");
        Ok(posts
            .iter()
            .filter(|post| {
                query
                    .title_like
                    .as_deref()
                    .is_none_or(|term| post.title.contains(term))
            })
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &PostDraft) -> Result<Post, RepoError> {
        self.check()?;
        let mut posts = self.posts.lock().expect("posts lock");
        let id = posts.iter().map(|post| post.id).max().unwrap_or(0) + 1;
        let post = draft.clone().into_post(id);
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        self.check()?;
        let mut posts = self.posts.lock().expect("posts lock");
        let slot = posts
            .iter_mut()
            .find(|existing| existing.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post.clone())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        self.check()?;
        let mut posts = self.posts.lock().expect("posts lock");
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

struct Harness {
    router: Router,
    repo: Arc<MemoryRepo>,
}

async fn harness(repo: MemoryRepo, paging: Paging) -> Harness {
    let repo = Arc::new(repo);
    let board = Arc::new(BoardService::new(repo.clone(), paging));
    board.refresh().await;
    Harness {
        router: build_router(BoardAppState::new(board)),
        repo,
    }
}

impl Harness {
    async fn page(&self) -> String {
        let response = self
            .router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    async fn post_form(&self, path: &str, form: &str) -> StatusCode {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        if status == StatusCode::SEE_OTHER {
            assert_eq!(
                response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
                Some(&b"/"[..])
            );
        }
        status
    }
}

fn card_count(html: &str) -> usize {
    html.matches("data-testid=\"post-card\"").count()
}

#[tokio::test]
async fn initial_page_lists_posts_with_controls() {
    let h = harness(MemoryRepo::seeded(3), Paging::default()).await;
    let html = h.page().await;

    assert!(html.contains("data-testid=\"posts-app\""));
    assert!(html.contains("data-testid=\"search-input\""));
    assert!(html.contains("data-testid=\"add-post-button\""));
    assert_eq!(card_count(&html), 3);
    assert!(html.contains("Post 1 Body"));
    assert!(!html.contains("data-testid=\"loading-text\""));
    assert!(!html.contains("data-testid=\"error-text\""));
    // Three posts never fill a page of ten.
    assert!(!html.contains("data-testid=\"load-more-button\""));
    assert!(!html.contains("data-testid=\"post-form\""));
}

#[tokio::test]
async fn search_filters_and_keeps_the_term() {
    let h = harness(MemoryRepo::seeded(12), Paging::default()).await;

    assert_eq!(h.post_form("/search", "q=Post+1").await, StatusCode::SEE_OTHER);
    let html = h.page().await;

    // "Post 1", "Post 10", "Post 11", "Post 12"
    assert_eq!(card_count(&html), 4);
    assert!(html.contains("value=\"Post 1\""));

    assert_eq!(h.post_form("/search", "q=").await, StatusCode::SEE_OTHER);
    assert_eq!(card_count(&h.page().await), 10);
}

#[tokio::test]
async fn load_more_grows_the_page_until_exhausted() {
    let paging = Paging {
        page_size: 2,
        step: 2,
    };
    let h = harness(MemoryRepo::seeded(5), paging).await;

    let html = h.page().await;
    assert_eq!(card_count(&html), 2);
    assert!(html.contains("data-testid=\"load-more-button\""));

    h.post_form("/more", "").await;
    let html = h.page().await;
    assert_eq!(card_count(&html), 4);
    assert!(html.contains("data-testid=\"load-more-button\""));

    h.post_form("/more", "").await;
    let html = h.page().await;
    assert_eq!(card_count(&html), 5);
    assert!(!html.contains("data-testid=\"load-more-button\""));
}

#[tokio::test]
async fn adding_a_post_prepends_it_and_closes_the_dialog() {
    let h = harness(MemoryRepo::seeded(2), Paging::default()).await;

    h.post_form("/modal/new", "").await;
    let html = h.page().await;
    assert!(html.contains("data-testid=\"post-form\""));
    assert!(html.contains(">Save</button>"));

    h.post_form("/modal/submit", "title=Test+Title&body=Test+Body")
        .await;
    let html = h.page().await;
    assert!(!html.contains("data-testid=\"post-form\""));
    assert_eq!(card_count(&html), 3);

    let first_title = html.find("Test Title").expect("new post rendered");
    let older_title = html.find("Post 1").expect("older post rendered");
    assert!(first_title < older_title);
}

#[tokio::test]
async fn editing_prefills_and_replaces_the_post() {
    let h = harness(MemoryRepo::seeded(2), Paging::default()).await;

    assert_eq!(h.post_form("/posts/1/edit", "").await, StatusCode::SEE_OTHER);
    let html = h.page().await;
    assert!(html.contains("value=\"Post 1\""));
    assert!(html.contains(">Post 1 Body</textarea>"));

    h.post_form("/modal/submit", "title=Updated+Title&body=Updated+Body")
        .await;
    let html = h.page().await;
    assert!(!html.contains("data-testid=\"post-form\""));
    assert!(html.contains("Updated Title"));
    assert!(html.contains("Updated Body"));
    assert_eq!(card_count(&html), 2);
}

#[tokio::test]
async fn closing_the_dialog_discards_edits() {
    let h = harness(MemoryRepo::seeded(1), Paging::default()).await;

    h.post_form("/posts/1/edit", "").await;
    h.post_form("/modal/close", "").await;
    let html = h.page().await;
    assert!(!html.contains("data-testid=\"post-form\""));
    assert!(html.contains("Post 1 Body"));
}

#[tokio::test]
async fn editing_an_unlisted_post_is_not_found() {
    let h = harness(MemoryRepo::seeded(1), Paging::default()).await;
    assert_eq!(h.post_form("/posts/99/edit", "").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_removes_the_card() {
    let h = harness(MemoryRepo::seeded(2), Paging::default()).await;

    h.post_form("/posts/1/delete", "").await;
    let html = h.page().await;
    assert_eq!(card_count(&html), 1);
    assert!(!html.contains("Post 1 Body"));
    assert!(html.contains("Post 2 Body"));
}

#[tokio::test]
async fn failed_fetch_shows_the_error_message() {
    let h = harness(MemoryRepo::seeded(2), Paging::default()).await;

    h.repo.fail(true);
    h.post_form("/refresh", "").await;
    let html = h.page().await;
    assert!(html.contains("data-testid=\"error-text\""));
    assert!(html.contains("An error occurred while fetching posts, please try again later."));
    assert!(!html.contains("data-testid=\"loading-text\""));

    h.repo.fail(false);
    h.post_form("/refresh", "").await;
    assert!(!h.page().await.contains("data-testid=\"error-text\""));
}

#[tokio::test]
async fn failed_startup_fetch_recovers_through_refresh() {
    let repo = MemoryRepo::seeded(2);
    repo.fail(true);
    let h = harness(repo, Paging::default()).await;

    let html = h.page().await;
    assert!(html.contains("data-testid=\"error-text\""));
    assert!(!html.contains("data-testid=\"load-more-button\""));
    assert!(html.contains("data-testid=\"refresh-button\""));
    assert!(html.contains("action=\"/refresh\""));

    h.repo.fail(false);
    // Resubmitting the unchanged empty search does not fetch.
    h.post_form("/search", "q=").await;
    assert!(h.page().await.contains("data-testid=\"error-text\""));

    assert_eq!(h.post_form("/refresh", "").await, StatusCode::SEE_OTHER);
    let html = h.page().await;
    assert!(!html.contains("data-testid=\"error-text\""));
    assert_eq!(card_count(&html), 2);
}

#[tokio::test]
async fn failed_submit_keeps_the_dialog_and_edits() {
    let h = harness(MemoryRepo::seeded(1), Paging::default()).await;

    h.post_form("/modal/new", "").await;
    h.repo.fail(true);
    h.post_form("/modal/submit", "title=Draft&body=Unsaved").await;

    let html = h.page().await;
    assert!(html.contains("data-testid=\"post-form\""));
    assert!(html.contains("value=\"Draft\""));
    assert!(html.contains(">Unsaved</textarea>"));
    assert!(html.contains("data-testid=\"error-text\""));
    assert_eq!(card_count(&html), 1);
}

#[tokio::test]
async fn health_reports_no_content() {
    let h = harness(MemoryRepo::default(), Paging::default()).await;
    let response = h
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
