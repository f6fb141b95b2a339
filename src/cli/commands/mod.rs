pub mod api;
pub mod logging;

mod admins;
pub mod logs;
mod session;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PAGE: &str = "page";
pub const ARG_PAGE_SIZE: &str = "page-size";

/// `--page` / `--page-size` for list subcommands. Page size is capped like the API caps it.
fn with_page_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PAGE)
                .long("page")
                .help("Page number, starting at 1")
                .default_value("1")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_PAGE_SIZE)
                .long("page-size")
                .help("Rows per page (1-100)")
                .default_value("10")
                .value_parser(clap::value_parser!(u32).range(1..=100)),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("tastygo-admin")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(session::login())
        .subcommand(session::logout())
        .subcommand(session::profile())
        .subcommand(admins::subcommand())
        .subcommand(logs::subcommand());

    let command = api::with_args(command);
    logging::with_args(command)
}
