//! Maps validated CLI arguments to the action the binary should run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{passage, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or a URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let passage_opts = passage::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        passage_app_id: passage_opts.app_id,
        passage_api_key: passage_opts.api_key,
        passage_auth_url: passage_opts.auth_url,
        passage_api_url: passage_opts.api_url,
        header_auth: passage_opts.header_auth,
        provider_timeout_seconds: passage_opts.timeout_seconds,
    }))
}
