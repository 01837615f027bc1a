//! Canonical board state and its transitions.
//!
//! Every method here is synchronous and performs no I/O. Transitions that
//! need the backend hand back a [`FetchTicket`] or take the remote result as
//! an argument, so the whole coordinator can be driven from tests.

use postboard_api_types::ListPostsQuery;

use crate::application::repos::RepoError;
use crate::domain::posts::{Post, PostId, PostList};

use super::error::{BoardError, Operation};
use super::form::{FormMode, FormSubmission, PostForm, SubmitRejected};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_PAGE_STEP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page_size: u32,
    pub step: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            step: DEFAULT_PAGE_STEP,
        }
    }
}

/// A list request issued by the board. Only the latest ticket may land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: ListPostsQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchApplied {
    Replaced { count: usize },
    Failed(BoardError),
    /// A newer fetch was issued after this one; the result was dropped.
    Stale,
}

/// A dialog submission bound to the dialog instance that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub generation: u64,
    pub submission: FormSubmission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(Post),
    Failed(BoardError),
    Rejected(SubmitRejected),
}

#[derive(Debug, Clone)]
pub struct BoardState {
    posts: PostList,
    search_term: String,
    limit: u32,
    step: u32,
    loading: bool,
    error: Option<BoardError>,
    modal: Option<PostForm>,
    last_fetch_seq: u64,
    modal_generation: u64,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(Paging::default())
    }
}

impl BoardState {
    pub fn new(paging: Paging) -> Self {
        Self {
            posts: PostList::default(),
            search_term: String::new(),
            limit: paging.page_size,
            step: paging.step,
            loading: false,
            error: None,
            modal: None,
            last_fetch_seq: 0,
            modal_generation: 0,
        }
    }

    pub fn posts(&self) -> &PostList {
        &self.posts
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&BoardError> {
        self.error.as_ref()
    }

    pub fn modal(&self) -> Option<&PostForm> {
        self.modal.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Post being edited, when the dialog is open in edit mode.
    pub fn edit_target(&self) -> Option<&Post> {
        match self.modal.as_ref()?.mode() {
            FormMode::Edit(id) => self.posts.get(id),
            FormMode::Create => None,
        }
    }

    /// "Load More" is offered while the last page came back full.
    pub fn can_load_more(&self) -> bool {
        u32::try_from(self.posts.len()).map_or(true, |len| len >= self.limit)
    }

    /// Re-issue the list request with the current parameters.
    pub fn refresh(&mut self) -> FetchTicket {
        self.last_fetch_seq += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            seq: self.last_fetch_seq,
            query: ListPostsQuery::new(&self.search_term, self.limit),
        }
    }

    /// Change the search term. Returns `None` when the term is unchanged.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> Option<FetchTicket> {
        let term = term.into();
        if term == self.search_term {
            return None;
        }
        self.search_term = term;
        Some(self.refresh())
    }

    /// Grow the limit by one step; the whole list is re-fetched, not appended.
    pub fn load_more(&mut self) -> FetchTicket {
        self.limit = self.limit.saturating_add(self.step);
        self.refresh()
    }

    pub fn apply_fetch(
        &mut self,
        seq: u64,
        result: Result<Vec<Post>, RepoError>,
    ) -> FetchApplied {
        if seq != self.last_fetch_seq {
            return FetchApplied::Stale;
        }
        self.loading = false;
        match result {
            Ok(posts) => {
                self.posts = PostList::from_response(posts);
                FetchApplied::Replaced {
                    count: self.posts.len(),
                }
            }
            Err(err) => {
                let error = BoardError::new(Operation::Fetch, &err);
                self.error = Some(error);
                FetchApplied::Failed(error)
            }
        }
    }

    pub fn apply_created(&mut self, result: Result<Post, RepoError>) -> Result<Post, BoardError> {
        match result {
            Ok(post) => {
                self.posts.prepend(post.clone());
                Ok(post)
            }
            Err(err) => Err(self.record_failure(Operation::Add, &err)),
        }
    }

    pub fn apply_updated(&mut self, result: Result<Post, RepoError>) -> Result<Post, BoardError> {
        match result {
            Ok(post) => {
                self.posts.replace(post.clone());
                Ok(post)
            }
            Err(err) => Err(self.record_failure(Operation::Update, &err)),
        }
    }

    pub fn apply_deleted(
        &mut self,
        id: PostId,
        result: Result<(), RepoError>,
    ) -> Result<(), BoardError> {
        match result {
            Ok(()) => {
                self.posts.remove(id);
                Ok(())
            }
            Err(err) => Err(self.record_failure(Operation::Delete, &err)),
        }
    }

    fn record_failure(&mut self, operation: Operation, err: &RepoError) -> BoardError {
        let error = BoardError::new(operation, err);
        self.error = Some(error);
        error
    }

    pub fn open_create_modal(&mut self) {
        self.modal_generation += 1;
        self.modal = Some(PostForm::blank(self.modal_generation));
    }

    pub fn open_edit_modal(&mut self, post: &Post) {
        self.modal_generation += 1;
        self.modal = Some(PostForm::seeded(self.modal_generation, post));
    }

    /// Close the dialog however it was dismissed, discarding unsaved edits.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Copy the submitted fields into the open dialog and disable it.
    pub fn begin_form_submit(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<PendingSubmission, SubmitRejected> {
        let form = self.modal.as_mut().ok_or(SubmitRejected::NoOpenForm)?;
        if form.is_submitting() {
            return Err(SubmitRejected::AlreadySubmitting);
        }
        form.set_title(title);
        form.set_body(body);
        let submission = form.begin_submit()?;
        Ok(PendingSubmission {
            generation: form.generation(),
            submission,
        })
    }

    /// Close the dialog on success; on failure keep it open with its edits.
    /// A dialog that was closed or replaced in the meantime is left alone.
    pub fn finish_form_submit(
        &mut self,
        generation: u64,
        outcome: Result<Post, BoardError>,
    ) -> SubmitOutcome {
        let same_dialog = self
            .modal
            .as_ref()
            .is_some_and(|form| form.generation() == generation);

        match outcome {
            Ok(post) => {
                if same_dialog {
                    self.modal = None;
                }
                SubmitOutcome::Saved(post)
            }
            Err(error) => {
                if same_dialog {
                    if let Some(form) = self.modal.as_mut() {
                        form.submit_failed();
                    }
                }
                SubmitOutcome::Failed(error)
            }
        }
    }
}
