//! Locating the Passage session token on an incoming request.

use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};

/// Cookie set by the Passage web element after a successful login.
pub const AUTH_COOKIE_NAME: &str = "psg_auth_token";

/// Read the session token from the `psg_auth_token` cookie.
#[must_use]
pub fn from_cookie(headers: &HeaderMap) -> Option<&str> {
    // Browsers may send several Cookie headers over HTTP/2
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            let val = val.trim();
            // an empty value does not shadow a later non-empty one
            if key.trim() == AUTH_COOKIE_NAME && !val.is_empty() {
                return Some(val);
            }
        }
    }
    None
}

/// Read the session token from an `Authorization: Bearer` header.
#[must_use]
pub fn from_authorization(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
