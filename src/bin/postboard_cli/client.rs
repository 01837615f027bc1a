#![deny(clippy::all, clippy::pedantic)]

use postboard::application::repos::RepoError;
use postboard::infra::rest::RestPostsRepo;
use thiserror::Error;
use url::Url;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("backend URL is required (use --backend or POSTBOARD_BACKEND_URL)")]
    MissingBackend,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("backend error: {0}")]
    Repo(#[from] RepoError),
    #[error("failed to render output: {0}")]
    Output(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub repo: RestPostsRepo,
}

impl Ctx {
    pub fn new(backend: &str) -> Result<Self, CliError> {
        let base = Url::parse(backend)?;
        let repo = RestPostsRepo::new(&base)?;
        Ok(Self { repo })
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let backend = cli
        .backend
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or(CliError::MissingBackend)?;
    Ctx::new(backend)
}
