use axum::{extract::State, response::Response};

use crate::dashgate::{
    templates::{self, IndexView},
    AppState,
};

// axum handler for the public landing page
pub async fn index(State(state): State<AppState>) -> Response {
    templates::render(&IndexView {
        app_id: state.app_id(),
    })
}
