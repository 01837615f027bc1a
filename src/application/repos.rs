//! Repository trait describing the remote posts store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::{Post, PostDraft, PostId};
use postboard_api_types::ListPostsQuery;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("resource not found")]
    NotFound,
    #[error("backend responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode backend response: {0}")]
    Decode(String),
    #[error("failed to encode request body: {0}")]
    Encode(String),
}

impl RepoError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn encode(err: impl std::fmt::Display) -> Self {
        Self::Encode(err.to_string())
    }
}

/// The four operations of the posts backend. Each is a single request with
/// no retry; callers decide what a failure means.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list(&self, query: &ListPostsQuery) -> Result<Vec<Post>, RepoError>;

    async fn create(&self, draft: &PostDraft) -> Result<Post, RepoError>;

    /// Full replacement of title and body.
    async fn update(&self, post: &Post) -> Result<Post, RepoError>;

    async fn delete(&self, id: PostId) -> Result<(), RepoError>;
}
