//! Server-rendered views.
//!
//! Templates live in `templates/` and are compiled into the binary, so a
//! missing or malformed template is a build error rather than a runtime one.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexView<'a> {
    pub app_id: &'a str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardView<'a> {
    pub email: &'a str,
}

#[derive(Template)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedView;

/// Render a view as a `200 text/html` response, or `500` if rendering fails.
pub fn render<T: Template>(view: &T) -> Response {
    match view.render() {
        Ok(body) => Html(body).into_response(),
        Err(err) => {
            error!("Failed to render template: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
