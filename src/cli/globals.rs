use secrecy::SecretString;
use std::time::Duration;
use url::Url;

pub const DEFAULT_PASSAGE_AUTH_URL: &str = "https://auth.passage.id";
pub const DEFAULT_PASSAGE_API_URL: &str = "https://api.passage.id";
pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 10;

/// Process-wide configuration, resolved once at startup and shared read-only
/// by the server and the authentication gate.
#[derive(Clone)]
pub struct GlobalArgs {
    pub passage_app_id: String,
    pub passage_api_key: SecretString,
    pub passage_auth_url: Url,
    pub passage_api_url: Url,
    pub header_auth: bool,
    pub provider_timeout: Duration,
}

impl GlobalArgs {
    /// # Errors
    /// Returns an error if the default Passage URLs fail to parse.
    pub fn new(app_id: String, api_key: SecretString) -> Result<Self, url::ParseError> {
        Ok(Self {
            passage_app_id: app_id,
            passage_api_key: api_key,
            passage_auth_url: Url::parse(DEFAULT_PASSAGE_AUTH_URL)?,
            passage_api_url: Url::parse(DEFAULT_PASSAGE_API_URL)?,
            header_auth: false,
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        })
    }

    #[must_use]
    pub fn with_auth_url(mut self, url: Url) -> Self {
        self.passage_auth_url = url;
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.passage_api_url = url;
        self
    }

    #[must_use]
    pub const fn with_header_auth(mut self, header_auth: bool) -> Self {
        self.header_auth = header_auth;
        self
    }

    #[must_use]
    pub const fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("passage_app_id", &self.passage_app_id)
            .field("passage_api_key", &"***")
            .field("passage_auth_url", &self.passage_auth_url.as_str())
            .field("passage_api_url", &self.passage_api_url.as_str())
            .field("header_auth", &self.header_auth)
            .field("provider_timeout", &self.provider_timeout)
            .finish()
    }
}
