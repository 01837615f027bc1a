//! Wire types exchanged with the posts backend.
//!
//! The backend speaks the json-server dialect: `GET /posts?title_like=&_limit=`,
//! `POST /posts`, `PUT /posts/{id}`, `DELETE /posts/{id}`.

use serde::{Deserialize, Serialize};

/// Server-assigned post identifier.
pub type PostId = i64;

/// A stored post as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
}

/// Payload for creating a post; the backend assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Attach an id, producing the full replacement body for an update.
    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            body: self.body,
        }
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
        }
    }
}

/// Parameters of a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPostsQuery {
    /// Case-sensitive substring matched against `title`; empty means no filter.
    pub title_like: Option<String>,
    pub limit: u32,
}

impl ListPostsQuery {
    pub fn new(search: &str, limit: u32) -> Self {
        let title_like = (!search.is_empty()).then(|| search.to_string());
        Self { title_like, limit }
    }

    /// Query pairs in the order the backend expects them.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(term) = &self.title_like {
            pairs.push(("title_like", term.clone()));
        }
        pairs.push(("_limit", self.limit.to_string()));
        pairs
    }
}
