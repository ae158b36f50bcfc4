//! Shared fixtures: an in-process stand-in for the Passage auth and management
//! APIs, plus helpers to mint session tokens it will accept.

#![allow(dead_code, clippy::unwrap_used)]

use anyhow::{Context, Result};
use axum::{
    extract::Path,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use dashgate::{
    cli::globals::GlobalArgs,
    dashgate::{passage::PassageConnector, router, AppState},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::{pkcs8::DecodePrivateKey, traits::PublicKeyParts, RsaPrivateKey, RsaPublicKey};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::{net::TcpListener, task::JoinHandle};
use url::Url;

pub const APP_ID: &str = "app-123";
pub const API_KEY: &str = "test-api-key";
pub const KID: &str = "k1";
pub const USER_ID: &str = "usr_ada";
pub const USER_EMAIL: &str = "ada@example.com";
pub const MISSING_USER_ID: &str = "usr_missing";

const TEST_PRIVATE_KEY_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/rsa_test_key.pem"
));

pub fn now() -> i64 {
    i64::try_from(SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()).unwrap()
}

fn jwks() -> Value {
    let private_key = RsaPrivateKey::from_pkcs8_pem(TEST_PRIVATE_KEY_PEM).unwrap();
    let public_key = RsaPublicKey::from(&private_key);
    json!({
        "keys": [{
            "kty": "RSA",
            "alg": "RS256",
            "use": "sig",
            "kid": KID,
            "n": Base64UrlUnpadded::encode_string(&public_key.n().to_bytes_be()),
            "e": Base64UrlUnpadded::encode_string(&public_key.e().to_bytes_be()),
        }]
    })
}

async fn jwks_handler(Path(app_id): Path<String>) -> Response {
    if app_id == APP_ID {
        Json(jwks()).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"error": "App not found"}))).into_response()
    }
}

async fn user_handler(
    Path((app_id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let expected = format!("Bearer {API_KEY}");
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid API key", "code": "invalid_access_token"})),
        )
            .into_response();
    }
    if app_id != APP_ID {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "App not found"}))).into_response();
    }

    match user_id.as_str() {
        USER_ID => Json(json!({
            "user": {
                "id": USER_ID,
                "email": USER_EMAIL,
                "email_verified": true,
                "phone": "",
                "status": "active",
                "created_at": "2024-01-01T00:00:00Z",
                "last_login_at": "2024-06-01T00:00:00Z",
                "webauthn": true,
                "user_metadata": null
            }
        }))
        .into_response(),
        "usr_broken" => (StatusCode::BAD_GATEWAY, "upstream exploded").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "User not found", "code": "user_not_found"})),
        )
            .into_response(),
    }
}

/// Stand-in for `auth.passage.id` and `api.passage.id` on one local port.
pub struct MockPassage {
    pub base_url: Url,
    handle: JoinHandle<()>,
}

impl MockPassage {
    pub async fn start() -> Result<Self> {
        let app = Router::new()
            .route("/v1/apps/:app_id/.well-known/jwks.json", get(jwks_handler))
            .route("/v1/apps/:app_id/users/:user_id", get(user_handler));

        let (base_url, handle) = serve(app).await?;
        Ok(Self { base_url, handle })
    }

    pub fn issuer(&self) -> String {
        format!("{}v1/apps/{APP_ID}", self.base_url)
    }

    /// A session token for `sub`, valid for ten minutes.
    pub fn token_for(&self, sub: &str) -> String {
        self.token_with(json!({
            "sub": sub,
            "iss": self.issuer(),
            "iat": now(),
            "exp": now() + 600,
        }))
    }

    pub fn token_with(&self, claims: Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(KID.to_string());
        let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY_PEM.as_bytes()).unwrap();
        encode(&header, &claims, &key).unwrap()
    }

    pub fn globals(&self) -> GlobalArgs {
        GlobalArgs::new(APP_ID.to_string(), SecretString::from(API_KEY.to_string()))
            .unwrap()
            .with_auth_url(self.base_url.clone())
            .with_api_url(self.base_url.clone())
    }
}

impl Drop for MockPassage {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A running dashgate instance on a local port.
pub struct TestServer {
    pub base_url: Url,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(globals: GlobalArgs) -> Result<Self> {
        let connector = PassageConnector::new(globals.clone())?;
        let app = router(AppState::new(globals, Arc::new(connector)));
        let (base_url, handle) = serve(app).await?;
        Ok(Self { base_url, handle })
    }

    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(app: Router) -> Result<(Url, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind test listener")?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    Ok((base_url(addr)?, handle))
}

fn base_url(addr: SocketAddr) -> Result<Url> {
    Url::parse(&format!("http://{addr}/")).context("Failed to build base URL")
}

/// An address nothing is listening on.
pub async fn closed_url() -> Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    base_url(addr)
}
