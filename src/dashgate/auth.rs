//! Authentication gate for protected routes.
//!
//! Flow Overview:
//! 1) Build a Passage client for this request.
//! 2) Authenticate the request's session token.
//! 3) Fetch the user's profile and attach [`AuthenticatedUser`] to the request.
//!
//! An unauthenticated request is not an error: it gets the `unauthorized` page
//! with a `200`. Only provider failures turn into `500`.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use super::{
    templates::{self, UnauthorizedView},
    AppState,
};

/// The signed-in user, available to handlers behind [`require_user`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let provider = match state.connector().connect().await {
        Ok(provider) => provider,
        Err(err) => {
            error!("Failed to construct Passage client: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let user_id = match provider.authenticate_request(request.headers()) {
        Ok(user_id) => user_id,
        Err(err) => {
            debug!("Authentication failed: {err}");
            return templates::render(&UnauthorizedView);
        }
    };

    let user = match provider.get_user(&user_id).await {
        Ok(user) => user,
        Err(err) => {
            error!(user_id = %user_id, "Failed to fetch Passage user: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
    };

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
    });

    next.run(request).await
}
