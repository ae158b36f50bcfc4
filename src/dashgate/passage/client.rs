use super::{token, AuthError, Connector, Error, IdentityProvider, PassageUser};
use crate::{cli::globals::GlobalArgs, APP_USER_AGENT};
use async_trait::async_trait;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: PassageUser,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// A Passage client bound to one application and one snapshot of its JWKS.
pub struct Passage {
    http: Client,
    app_id: String,
    api_key: SecretString,
    api_url: Url,
    issuer: String,
    jwks: JwkSet,
    header_auth: bool,
}

impl std::fmt::Debug for Passage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Passage")
            .field("app_id", &self.app_id)
            .field("api_key", &"***")
            .field("api_url", &self.api_url.as_str())
            .field("issuer", &self.issuer)
            .field("keys", &self.jwks.keys.len())
            .field("header_auth", &self.header_auth)
            .finish_non_exhaustive()
    }
}

/// Append `v1/apps/{app_id}/{tail..}` to a base URL.
fn app_url(base: &Url, app_id: &str, tail: &[&str]) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::Config(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(["v1", "apps", app_id])
        .extend(tail);
    Ok(url)
}

impl Passage {
    /// Build a client for the configured app and load its signing keys.
    ///
    /// # Errors
    /// Returns an error if the app id is empty or the JWKS cannot be fetched.
    #[instrument(skip_all, fields(app_id = %globals.passage_app_id))]
    pub async fn connect(http: Client, globals: &GlobalArgs) -> Result<Self, Error> {
        let app_id = globals.passage_app_id.trim();
        if app_id.is_empty() {
            return Err(Error::Config("missing Passage app id".to_string()));
        }

        let jwks_url = app_url(
            &globals.passage_auth_url,
            app_id,
            &[".well-known", "jwks.json"],
        )?;

        let jwks: JwkSet = http
            .get(jwks_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(Error::Jwks)?
            .json()
            .await
            .map_err(Error::Jwks)?;

        if jwks.keys.is_empty() {
            return Err(Error::EmptyJwks);
        }

        debug!(keys = jwks.keys.len(), "loaded Passage JWKS");

        Self::from_parts(http, globals, jwks)
    }

    pub(crate) fn from_parts(
        http: Client,
        globals: &GlobalArgs,
        jwks: JwkSet,
    ) -> Result<Self, Error> {
        let app_id = globals.passage_app_id.trim().to_string();
        let issuer = app_url(&globals.passage_auth_url, &app_id, &[])?.to_string();

        Ok(Self {
            http,
            app_id,
            api_key: globals.passage_api_key.clone(),
            api_url: globals.passage_api_url.clone(),
            issuer,
            jwks,
            header_auth: globals.header_auth,
        })
    }

    /// Expected `iss` claim of session tokens for this app.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Validate a session token and return its subject (the Passage user id).
    ///
    /// # Errors
    /// Returns an [`AuthError`] describing why the token was rejected.
    pub fn validate_auth_token(&self, token: &str) -> Result<String, AuthError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm);
        }

        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let jwk = self
            .jwks
            .find(&kid)
            .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?;
        let key = DecodingKey::from_jwk(jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &key, &validation)?;
        if data.claims.sub.is_empty() {
            return Err(AuthError::EmptySubject);
        }

        Ok(data.claims.sub)
    }
}

#[async_trait]
impl IdentityProvider for Passage {
    fn authenticate_request(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let token = if self.header_auth {
            token::from_authorization(headers)
        } else {
            token::from_cookie(headers)
        }
        .ok_or(AuthError::MissingToken)?;

        self.validate_auth_token(token)
    }

    #[instrument(skip(self), fields(app_id = %self.app_id))]
    async fn get_user(&self, user_id: &str) -> Result<PassageUser, Error> {
        let url = app_url(&self.api_url, &self.app_id, &["users", user_id])?;

        let response = self
            .http
            .get(url)
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string(),
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: UserEnvelope = response.json().await?;
        Ok(envelope.user)
    }
}

/// Builds a [`Passage`] client per request, sharing one HTTP connection pool.
#[derive(Clone, Debug)]
pub struct PassageConnector {
    http: Client,
    globals: GlobalArgs,
}

impl PassageConnector {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(globals: GlobalArgs) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(globals.provider_timeout)
            .build()?;

        Ok(Self { http, globals })
    }
}

#[async_trait]
impl Connector for PassageConnector {
    async fn connect(&self) -> Result<Box<dyn IdentityProvider>, Error> {
        let passage = Passage::connect(self.http.clone(), &self.globals).await?;
        Ok(Box::new(passage))
    }
}
