//! `-v` verbosity. `DASHGATE_LOG_LEVEL` accepts the same count (`0`-`5`) or a
//! level name.

use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

// index is the verbosity count for that level
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const MAX_VERBOSITY: u8 = 5;

fn parse_log_level(raw: &str) -> Result<u8, String> {
    let raw = raw.trim();

    if let Ok(count) = raw.parse::<u8>() {
        return if count <= MAX_VERBOSITY {
            Ok(count)
        } else {
            Err(format!("log level {count} is out of range 0-{MAX_VERBOSITY}"))
        };
    }

    LEVEL_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(raw))
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| format!("invalid log level: {raw}"))
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_log_level)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("DASHGATE_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
