//! Connection flags shared by every subcommand.

use crate::config::DEFAULT_API_BASE_URL;
use clap::{Arg, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_CREDENTIALS_FILE: &str = "credentials-file";

// Mirrors `config::DEFAULT_TIMEOUT_SECS`; clap wants a static str.
const DEFAULT_TIMEOUT: &str = "10";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the TastyGo API, example: https://api.tastygo.vn")
                .env("TASTYGO_API_URL")
                .default_value(DEFAULT_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .env("TASTYGO_API_TIMEOUT")
                .default_value(DEFAULT_TIMEOUT)
                .value_parser(clap::value_parser!(u64).range(1..=300))
                .global(true),
        )
        .arg(
            Arg::new(ARG_CREDENTIALS_FILE)
                .long("credentials-file")
                .help("Where the session token is stored (default: $XDG_CONFIG_HOME/tastygo-admin/token)")
                .env("TASTYGO_CREDENTIALS_FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TIMEOUT_SECS;

    #[test]
    fn default_timeout_matches_config() {
        assert_eq!(DEFAULT_TIMEOUT.parse::<u64>().ok(), Some(DEFAULT_TIMEOUT_SECS));
    }
}
