use axum::{extract::Extension, response::Response};

use crate::dashgate::{
    auth::AuthenticatedUser,
    templates::{self, DashboardView},
};

/// Protected page; only reachable through [`crate::dashgate::auth::require_user`].
pub async fn dashboard(Extension(user): Extension<AuthenticatedUser>) -> Response {
    templates::render(&DashboardView { email: &user.email })
}
