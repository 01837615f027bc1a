//! Handlers for the single posts page. Every interaction posts a form and is
//! answered with a redirect back to `/`.

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    application::{board::SubmitOutcome, error::HttpError},
    domain::posts::PostId,
    presentation::views::{BoardTemplate, render_template_response},
};

use super::state::BoardAppState;

const BOARD_PATH: &str = "/";

#[derive(Debug, Deserialize)]
pub(crate) struct SearchForm {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostFormFields {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

pub(crate) async fn board_page(State(state): State<BoardAppState>) -> Response {
    match state.board.read(BoardTemplate::from_state).await {
        Ok(template) => render_template_response(template, StatusCode::OK),
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub(crate) async fn board_search(
    State(state): State<BoardAppState>,
    Form(form): Form<SearchForm>,
) -> Redirect {
    state.board.search(form.q).await;
    Redirect::to(BOARD_PATH)
}

pub(crate) async fn board_load_more(State(state): State<BoardAppState>) -> Redirect {
    state.board.load_more().await;
    Redirect::to(BOARD_PATH)
}

pub(crate) async fn board_refresh(State(state): State<BoardAppState>) -> Redirect {
    state.board.refresh().await;
    Redirect::to(BOARD_PATH)
}

pub(crate) async fn modal_new(State(state): State<BoardAppState>) -> Redirect {
    state.board.open_create_modal().await;
    Redirect::to(BOARD_PATH)
}

pub(crate) async fn modal_close(State(state): State<BoardAppState>) -> Redirect {
    state.board.close_modal().await;
    Redirect::to(BOARD_PATH)
}

pub(crate) async fn modal_submit(
    State(state): State<BoardAppState>,
    Form(form): Form<PostFormFields>,
) -> Redirect {
    match state.board.submit_form(form.title, form.body).await {
        SubmitOutcome::Saved(post) => {
            debug!(target: "postboard::board", id = post.id, "post saved");
        }
        SubmitOutcome::Failed(err) => {
            debug!(target: "postboard::board", error = %err, "post not saved");
        }
        SubmitOutcome::Rejected(reason) => {
            debug!(target: "postboard::board", reason = ?reason, "submit ignored");
        }
    }
    Redirect::to(BOARD_PATH)
}

pub(crate) async fn post_edit(
    State(state): State<BoardAppState>,
    Path(id): Path<PostId>,
) -> Response {
    if state.board.open_edit_modal(id).await {
        Redirect::to(BOARD_PATH).into_response()
    } else {
        HttpError::not_found(
            "infra::http::board::post_edit",
            format!("post {id} is not listed"),
        )
        .into_response()
    }
}

pub(crate) async fn post_delete(
    State(state): State<BoardAppState>,
    Path(id): Path<PostId>,
) -> Redirect {
    if let Err(err) = state.board.delete_post(id).await {
        debug!(target: "postboard::board", id, error = %err, "post not deleted");
    }
    Redirect::to(BOARD_PATH)
}

pub(crate) async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
