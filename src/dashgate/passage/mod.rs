//! Binding to the Passage identity provider.
//!
//! The authentication gate only needs two operations from Passage:
//! authenticate the current request (yielding a user id) and fetch the user's
//! profile. Both sit behind [`IdentityProvider`] so the gate can be driven by
//! something other than the live service. A [`Connector`] builds a provider
//! client for each request, matching how the gate constructs its client.

mod client;
pub mod token;

pub use self::client::{Passage, PassageConnector};

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Infrastructure failures talking to Passage. These surface as `500`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid Passage configuration: {0}")]
    Config(String),
    #[error("failed to fetch Passage JWKS: {0}")]
    Jwks(#[source] reqwest::Error),
    #[error("Passage JWKS has no keys")]
    EmptyJwks,
    #[error("request to Passage failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Passage API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Reasons a request is not authenticated. None of these are server errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no Passage auth token on request")]
    MissingToken,
    #[error("token is not signed with RS256")]
    UnsupportedAlgorithm,
    #[error("token header has no key id")]
    MissingKeyId,
    #[error("unknown signing key: {0}")]
    UnknownKey(String),
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token has an empty subject")]
    EmptySubject,
}

/// A Passage user profile. Fields Passage adds later are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PassageUser {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate the credentials carried by the request and return the user id.
    fn authenticate_request(&self, headers: &HeaderMap) -> Result<String, AuthError>;

    /// Fetch a user's profile by id.
    async fn get_user(&self, user_id: &str) -> Result<PassageUser, Error>;
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Build a provider client from configuration.
    async fn connect(&self) -> Result<Box<dyn IdentityProvider>, Error>;
}
