use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::board::{BoardState, PostForm};
use crate::application::error::HttpError;
use crate::domain::posts::{Post, PostId};

const SEARCH_PLACEHOLDER: &str = "Search...";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

fn render_partial<T: Template>(template: &T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_partial",
            "Template rendering failed",
            err,
        )
    })
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    render_partial(&template).map(Html).map_err(HttpError::from)
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Fully controlled search field: shows the current term verbatim.
#[derive(Template)]
#[template(path = "partials/search_input.html")]
pub struct SearchInputTemplate {
    pub value: String,
    pub placeholder: &'static str,
}

impl SearchInputTemplate {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            placeholder: SEARCH_PLACEHOLDER,
        }
    }
}

#[derive(Clone)]
pub struct PostCardView {
    pub id: PostId,
    pub title: String,
    pub body: String,
}

impl From<&Post> for PostCardView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "partials/post_list.html")]
pub struct PostListTemplate {
    pub cards: Vec<PostCardView>,
}

impl PostListTemplate {
    pub fn new(posts: &[Post]) -> Self {
        Self {
            cards: posts.iter().map(PostCardView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "partials/post_form.html")]
pub struct PostFormTemplate {
    pub title: String,
    pub body: String,
    pub submitting: bool,
}

impl From<&PostForm> for PostFormTemplate {
    fn from(form: &PostForm) -> Self {
        Self {
            title: form.title().to_string(),
            body: form.body().to_string(),
            submitting: form.is_submitting(),
        }
    }
}

#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub search_html: String,
    pub list_html: String,
    pub show_list: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub show_load_more: bool,
    pub form_html: Option<String>,
}

impl BoardTemplate {
    /// Compose the page from the board state and its component partials.
    pub fn from_state(state: &BoardState) -> Result<Self, TemplateRenderError> {
        let posts = state.posts().as_slice();
        let search_html = render_partial(&SearchInputTemplate::new(state.search_term()))?;
        let list_html = render_partial(&PostListTemplate::new(posts))?;
        let form_html = state
            .modal()
            .map(|form| render_partial(&PostFormTemplate::from(form)))
            .transpose()?;

        Ok(Self {
            search_html,
            list_html,
            show_list: !state.is_loading() && !posts.is_empty(),
            loading: state.is_loading(),
            error: state.error().map(|err| err.user_message()),
            show_load_more: state.can_load_more(),
            form_html,
        })
    }
}
