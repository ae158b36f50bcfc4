//! # Dashgate
//!
//! A small web application that keeps a dashboard behind Passage passwordless
//! authentication.
//!
//! - `GET /` is public and embeds the Passage application id so the browser
//!   element can run the login ceremony.
//! - `GET /dashboard` goes through an authentication gate that validates the
//!   Passage session token, fetches the user's profile, and renders the user's
//!   email. Requests without a valid session get the `unauthorized` page with a
//!   `200` status; provider failures are `500`.
//!
//! Token format, key rotation and the login ceremony belong to Passage. This
//! crate only binds to the published JWKS and the management API.

pub mod cli;
pub mod dashgate;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
