use super::with_page_args;
use chrono::FixedOffset;
use clap::{Arg, Command, builder::ValueParser};

pub const ARG_UTC_OFFSET: &str = "utc-offset";

fn validator_utc_offset() -> ValueParser {
    ValueParser::from(move |offset: &str| -> std::result::Result<FixedOffset, String> {
        offset
            .parse::<FixedOffset>()
            .map_err(|_| format!("invalid UTC offset '{offset}', expected e.g. +07:00"))
    })
}

#[must_use]
pub fn subcommand() -> Command {
    with_page_args(
        Command::new("logs")
            .about("Browse the activity log, newest first")
            .arg(
                Arg::new("user-id")
                    .short('u')
                    .long("user-id")
                    .help("Only show activity of this user id")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new(ARG_UTC_OFFSET)
                    .long(ARG_UTC_OFFSET)
                    .help("Show timestamps at this offset from UTC, e.g. +07:00")
                    .env("TASTYGO_UTC_OFFSET")
                    .default_value("+00:00")
                    .allow_hyphen_values(true)
                    .value_parser(validator_utc_offset()),
            ),
    )
}
