use crate::{cli::globals::GlobalArgs, dashgate};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub passage_app_id: String,
    pub passage_api_key: SecretString,
    pub passage_auth_url: Url,
    pub passage_api_url: Url,
    pub header_auth: bool,
    pub provider_timeout_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        port = args.port,
        app_id = %args.passage_app_id,
        header_auth = args.header_auth,
        "starting dashgate"
    );

    let globals = GlobalArgs::new(args.passage_app_id, args.passage_api_key)
        .context("Failed to build default Passage URLs")?
        .with_auth_url(args.passage_auth_url)
        .with_api_url(args.passage_api_url)
        .with_header_auth(args.header_auth)
        .with_provider_timeout(Duration::from_secs(args.provider_timeout_seconds));

    debug!("Global args: {:?}", globals);

    dashgate::new(args.port, globals).await
}
