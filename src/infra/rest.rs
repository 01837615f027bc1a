//! HTTP adapter for the posts backend.

use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::posts::{Post, PostDraft, PostId};
use postboard_api_types::ListPostsQuery;

#[derive(Clone, Debug)]
pub struct RestPostsRepo {
    client: Client,
    base: Url,
}

impl RestPostsRepo {
    /// `base` may carry a path prefix; resource paths are resolved beneath it.
    pub fn new(base: &Url) -> Result<Self, RepoError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(RepoError::transport)?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("postboard/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, RepoError> {
        let mut url = self.base.join(path).map_err(RepoError::transport)?;
        if !query.is_empty() {
            url.set_query(None);
            let mut qp = url.query_pairs_mut();
            for (k, v) in query {
                qp.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<Response, RepoError> {
        debug!(
            target: "postboard::rest",
            operation,
            method = %method,
            url = %url,
            "sending backend request"
        );
        let mut req = self.client.request(method, url);
        if let Some(b) = body {
            req = req.json(&b);
        }
        let resp = req.send().await.map_err(RepoError::transport)?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RepoError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, RepoError> {
        let bytes = resp.bytes().await.map_err(RepoError::transport)?;
        serde_json::from_slice(&bytes).map_err(RepoError::decode)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, RepoError> {
        let result = match self.send(operation, method, url, body).await {
            Ok(resp) => Self::decode(resp).await,
            Err(err) => Err(err),
        };
        log_failure(operation, result)
    }
}

fn log_failure<T>(operation: &'static str, result: Result<T, RepoError>) -> Result<T, RepoError> {
    if let Err(err) = &result {
        warn!(
            target: "postboard::rest",
            operation,
            error = %err,
            "backend request failed"
        );
    }
    result
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RepoError> {
    serde_json::to_value(value).map_err(RepoError::encode)
}

#[async_trait]
impl PostsRepo for RestPostsRepo {
    async fn list(&self, query: &ListPostsQuery) -> Result<Vec<Post>, RepoError> {
        let url = self.url("posts", &query.to_pairs())?;
        self.request("list", Method::GET, url, None).await
    }

    async fn create(&self, draft: &PostDraft) -> Result<Post, RepoError> {
        let url = self.url("posts", &[])?;
        let body = to_value(draft)?;
        self.request("create", Method::POST, url, Some(body)).await
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        let url = self.url(&format!("posts/{}", post.id), &[])?;
        let body = to_value(post)?;
        self.request("update", Method::PUT, url, Some(body)).await
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let url = self.url(&format!("posts/{id}"), &[])?;
        let result = self
            .send("delete", Method::DELETE, url, None)
            .await
            .map(|_| ());
        log_failure("delete", result)
    }
}
