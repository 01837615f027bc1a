//! The board coordinator: canonical post list, search, paging, dialog and
//! error state, plus the service that drives it against the backend.

mod error;
mod form;
mod service;
mod state;

pub use error::{BoardError, FailureCause, Operation};
pub use form::{FormMode, FormSubmission, PostForm, SubmitRejected};
pub use service::BoardService;
pub use state::{
    BoardState, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_STEP, FetchApplied, FetchTicket, Paging,
    PendingSubmission, SubmitOutcome,
};
