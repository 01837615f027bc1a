use std::future::{Future, pending};
use std::panic::resume_unwind;
use std::sync::Arc;

use metrics::counter;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::posts::{Post, PostDraft, PostId};

use super::error::{BoardError, Operation};
use super::form::FormSubmission;
use super::state::{BoardState, FetchApplied, FetchTicket, Paging, SubmitOutcome};

pub(crate) const METRIC_REMOTE_REQUESTS: &str = "postboard_remote_requests_total";
pub(crate) const METRIC_REMOTE_FAILURES: &str = "postboard_remote_failures_total";
pub(crate) const METRIC_STALE_FETCH_DISCARDED: &str = "postboard_stale_fetch_discarded_total";

/// Drives [`BoardState`] against a [`PostsRepo`].
///
/// The state lock is never held across a remote call: a transition runs,
/// the lock is released while the request is in flight, and the completion
/// is applied under a fresh lock. Interleaved fetches are reconciled by
/// their sequence numbers.
///
/// Every transition that awaits the backend runs on its own task, so a
/// caller that goes away (a disconnected client) cannot leave `loading` or
/// a submitting dialog behind.
#[derive(Clone)]
pub struct BoardService {
    repo: Arc<dyn PostsRepo>,
    state: Arc<Mutex<BoardState>>,
}

impl BoardService {
    pub fn new(repo: Arc<dyn PostsRepo>, paging: Paging) -> Self {
        Self {
            repo,
            state: Arc::new(Mutex::new(BoardState::new(paging))),
        }
    }

    /// Run `f` against the current state, e.g. to build a view.
    pub async fn read<R>(&self, f: impl FnOnce(&BoardState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    pub async fn refresh(&self) -> FetchApplied {
        let this = self.clone();
        detached(async move {
            let ticket = this.state.lock().await.refresh();
            this.run_fetch(ticket).await
        })
        .await
    }

    /// Returns `None` when the term did not change and nothing was fetched.
    pub async fn search(&self, term: impl Into<String>) -> Option<FetchApplied> {
        let this = self.clone();
        let term = term.into();
        detached(async move {
            let ticket = this.state.lock().await.set_search_term(term)?;
            Some(this.run_fetch(ticket).await)
        })
        .await
    }

    pub async fn load_more(&self) -> FetchApplied {
        let this = self.clone();
        detached(async move {
            let ticket = this.state.lock().await.load_more();
            this.run_fetch(ticket).await
        })
        .await
    }

    async fn run_fetch(&self, ticket: FetchTicket) -> FetchApplied {
        debug!(
            target: "postboard::board",
            seq = ticket.seq,
            title_like = ticket.query.title_like.as_deref().unwrap_or(""),
            limit = ticket.query.limit,
            "fetching posts"
        );
        let result = self.repo.list(&ticket.query).await;
        observe(Operation::Fetch, &result);

        let applied = self.state.lock().await.apply_fetch(ticket.seq, result);
        if applied == FetchApplied::Stale {
            counter!(METRIC_STALE_FETCH_DISCARDED).increment(1);
            info!(
                target: "postboard::board",
                seq = ticket.seq,
                "discarded superseded fetch result"
            );
        }
        applied
    }

    pub async fn add_post(&self, draft: PostDraft) -> Result<Post, BoardError> {
        let this = self.clone();
        detached(async move { this.create_and_apply(draft).await }).await
    }

    pub async fn update_post(&self, post: Post) -> Result<Post, BoardError> {
        let this = self.clone();
        detached(async move { this.update_and_apply(post).await }).await
    }

    pub async fn delete_post(&self, id: PostId) -> Result<(), BoardError> {
        let this = self.clone();
        detached(async move {
            let result = this.repo.delete(id).await;
            observe(Operation::Delete, &result);
            this.state.lock().await.apply_deleted(id, result)
        })
        .await
    }

    async fn create_and_apply(&self, draft: PostDraft) -> Result<Post, BoardError> {
        let result = self.repo.create(&draft).await;
        observe(Operation::Add, &result);
        self.state.lock().await.apply_created(result)
    }

    async fn update_and_apply(&self, post: Post) -> Result<Post, BoardError> {
        let result = self.repo.update(&post).await;
        observe(Operation::Update, &result);
        self.state.lock().await.apply_updated(result)
    }

    pub async fn open_create_modal(&self) {
        self.state.lock().await.open_create_modal();
    }

    /// Open the dialog seeded from the listed post with `id`.
    /// Returns `false` when no such post is listed.
    pub async fn open_edit_modal(&self, id: PostId) -> bool {
        let mut state = self.state.lock().await;
        match state.posts().get(id).cloned() {
            Some(post) => {
                state.open_edit_modal(&post);
                true
            }
            None => false,
        }
    }

    pub async fn close_modal(&self) {
        self.state.lock().await.close_modal();
    }

    /// Submit the dialog and wait for the mutation it triggers. The dialog
    /// closes only when the backend accepted the change.
    pub async fn submit_form(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> SubmitOutcome {
        let this = self.clone();
        let (title, body) = (title.into(), body.into());
        detached(async move {
            let pending = match this.state.lock().await.begin_form_submit(title, body) {
                Ok(pending) => pending,
                Err(rejected) => return SubmitOutcome::Rejected(rejected),
            };

            let outcome = match pending.submission {
                FormSubmission::Create(draft) => this.create_and_apply(draft).await,
                FormSubmission::Update(post) => this.update_and_apply(post).await,
            };

            this.state
                .lock()
                .await
                .finish_form_submit(pending.generation, outcome)
        })
        .await
    }
}

/// Await `work` on a spawned task; dropping the returned future leaves the
/// task running to completion.
async fn detached<F>(work: F) -> F::Output
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(output) => output,
        Err(err) if err.is_panic() => resume_unwind(err.into_panic()),
        // Cancelled only while the runtime shuts down, which drops us too.
        Err(_) => pending().await,
    }
}

fn observe<T>(operation: Operation, result: &Result<T, RepoError>) {
    counter!(METRIC_REMOTE_REQUESTS, "operation" => operation.as_str()).increment(1);
    if result.is_err() {
        counter!(METRIC_REMOTE_FAILURES, "operation" => operation.as_str()).increment(1);
    }
}
