use crate::cli::globals::{
    DEFAULT_PASSAGE_API_URL, DEFAULT_PASSAGE_AUTH_URL, DEFAULT_PROVIDER_TIMEOUT_SECONDS,
};
use anyhow::{Context, Result};
use clap::{builder::BoolishValueParser, Arg, ArgAction, Command};
use secrecy::SecretString;
use url::Url;

pub const ARG_PASSAGE_APP_ID: &str = "passage-app-id";
pub const ARG_PASSAGE_API_KEY: &str = "passage-api-key";
pub const ARG_PASSAGE_AUTH_URL: &str = "passage-auth-url";
pub const ARG_PASSAGE_API_URL: &str = "passage-api-url";
pub const ARG_HEADER_AUTH: &str = "header-auth";
pub const ARG_PROVIDER_TIMEOUT: &str = "provider-timeout-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PASSAGE_APP_ID)
                .long(ARG_PASSAGE_APP_ID)
                .help("Passage application id")
                .env("PASSAGE_APP_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSAGE_API_KEY)
                .long(ARG_PASSAGE_API_KEY)
                .help("Passage API key, used to fetch user profiles")
                .env("PASSAGE_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSAGE_AUTH_URL)
                .long(ARG_PASSAGE_AUTH_URL)
                .help("Base URL that publishes the app JWKS and issues session tokens")
                .env("PASSAGE_AUTH_URL")
                .default_value(DEFAULT_PASSAGE_AUTH_URL),
        )
        .arg(
            Arg::new(ARG_PASSAGE_API_URL)
                .long(ARG_PASSAGE_API_URL)
                .help("Base URL of the Passage management API")
                .env("PASSAGE_API_URL")
                .default_value(DEFAULT_PASSAGE_API_URL),
        )
        .arg(
            Arg::new(ARG_HEADER_AUTH)
                .long(ARG_HEADER_AUTH)
                .help(
                    "Read the session token from the Authorization header \
                     instead of the psg_auth_token cookie",
                )
                .env("DASHGATE_HEADER_AUTH")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new(ARG_PROVIDER_TIMEOUT)
                .long(ARG_PROVIDER_TIMEOUT)
                .help("Timeout for requests to Passage, in seconds")
                .env("DASHGATE_PROVIDER_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub app_id: String,
    pub api_key: SecretString,
    pub auth_url: Url,
    pub api_url: Url,
    pub header_auth: bool,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if a required value is missing or a URL does not parse.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let app_id = matches
            .get_one::<String>(ARG_PASSAGE_APP_ID)
            .cloned()
            .context("missing required argument: --passage-app-id")?;
        let api_key = matches
            .get_one::<String>(ARG_PASSAGE_API_KEY)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --passage-api-key")?;

        let auth_url = parse_url(matches, ARG_PASSAGE_AUTH_URL, DEFAULT_PASSAGE_AUTH_URL)?;
        let api_url = parse_url(matches, ARG_PASSAGE_API_URL, DEFAULT_PASSAGE_API_URL)?;

        Ok(Self {
            app_id,
            api_key,
            auth_url,
            api_url,
            header_auth: matches.get_flag(ARG_HEADER_AUTH),
            timeout_seconds: matches
                .get_one::<u64>(ARG_PROVIDER_TIMEOUT)
                .copied()
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        })
    }
}

fn parse_url(matches: &clap::ArgMatches, name: &str, default: &str) -> Result<Url> {
    let raw = matches
        .get_one::<String>(name)
        .map_or(default, String::as_str);
    Url::parse(raw).with_context(|| format!("invalid --{name}: {raw}"))
}
