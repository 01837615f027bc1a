#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use postboard::application::repos::PostsRepo;
use postboard::domain::posts::{PostDraft, PostId};
use postboard_api_types::ListPostsQuery;
use serde_json::json;

use crate::args::PostsCmd;
use crate::client::{CliError, Ctx};
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { search, limit } => list(ctx, search, limit).await,
        PostsCmd::Create {
            title,
            body,
            body_file,
        } => create(ctx, title, body, body_file).await,
        PostsCmd::Update {
            id,
            title,
            body,
            body_file,
        } => update(ctx, id, title, body, body_file).await,
        PostsCmd::Delete { id } => delete(ctx, id).await,
    }
}

async fn list(ctx: &Ctx, search: Option<String>, limit: u32) -> Result<(), CliError> {
    if limit == 0 {
        return Err(CliError::InvalidInput("limit must be greater than 0".into()));
    }
    let query = ListPostsQuery::new(search.as_deref().unwrap_or_default(), limit);
    let posts = ctx.repo.list(&query).await?;
    print_json(&posts)
}

async fn create(
    ctx: &Ctx,
    title: String,
    body: Option<String>,
    body_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let body = read_value(body, body_file)?;
    let post = ctx.repo.create(&PostDraft::new(title, body)).await?;
    print_json(&post)
}

async fn update(
    ctx: &Ctx,
    id: PostId,
    title: String,
    body: Option<String>,
    body_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let body = read_value(body, body_file)?;
    let post = ctx
        .repo
        .update(&PostDraft::new(title, body).into_post(id))
        .await?;
    print_json(&post)
}

async fn delete(ctx: &Ctx, id: PostId) -> Result<(), CliError> {
    ctx.repo.delete(id).await?;
    print_json(&json!({ "deleted": id }))
}
