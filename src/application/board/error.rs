use thiserror::Error;

use crate::application::repos::RepoError;

/// Remote operation kinds the board performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Operation::Fetch => "An error occurred while fetching posts, please try again later.",
            Operation::Add => "An error occurred while adding the post, please try again later.",
            Operation::Update => {
                "An error occurred while updating the post, please try again later."
            }
            Operation::Delete => {
                "An error occurred while deleting the post, please try again later."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Transport,
    NotFound,
    Status(u16),
    Decode,
    Encode,
}

impl From<&RepoError> for FailureCause {
    fn from(err: &RepoError) -> Self {
        match err {
            RepoError::Transport(_) => FailureCause::Transport,
            RepoError::NotFound => FailureCause::NotFound,
            RepoError::Status { status, .. } => FailureCause::Status(*status),
            RepoError::Decode(_) => FailureCause::Decode,
            RepoError::Encode(_) => FailureCause::Encode,
        }
    }
}

/// A failed remote operation as the board reports it to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{} failed: {cause:?}", .operation.as_str())]
pub struct BoardError {
    pub operation: Operation,
    pub cause: FailureCause,
}

impl BoardError {
    pub fn new(operation: Operation, err: &RepoError) -> Self {
        Self {
            operation,
            cause: FailureCause::from(err),
        }
    }

    /// Sentence shown in the page's error area.
    pub fn user_message(&self) -> String {
        let base = self.operation.message();
        match (self.operation, self.cause) {
            (Operation::Fetch, _) => base.to_string(),
            (_, FailureCause::NotFound) => format!("{base} The post no longer exists."),
            _ => base.to_string(),
        }
    }
}
