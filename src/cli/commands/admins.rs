use super::with_page_args;
use clap::{Arg, Command};

fn new_password() -> Arg {
    Arg::new("password")
        .short('p')
        .long("password")
        .help("New password, at least 6 characters")
        .env("TASTYGO_NEW_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn user_id() -> Arg {
    Arg::new("id")
        .help("Admin account id")
        .required(true)
        .value_parser(clap::value_parser!(u64))
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new("admins")
        .about("Manage admin accounts (superadmin only)")
        .subcommand_required(true)
        .subcommand(with_page_args(
            Command::new("list").about("List admin accounts"),
        ))
        .subcommand(
            Command::new("create")
                .about("Create an account with the admin role")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Email address of the new account")
                        .required(true),
                )
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .help("Unique username of the new account")
                        .required(true),
                )
                .arg(new_password()),
        )
        .subcommand(
            Command::new("enable")
                .about("Allow a disabled account to sign in again")
                .arg(user_id()),
        )
        .subcommand(
            Command::new("disable")
                .about("Stop an account from signing in")
                .arg(user_id()),
        )
        .subcommand(
            Command::new("reset-password")
                .about("Set a new password for an account")
                .arg(user_id())
                .arg(new_password()),
        )
        .subcommand(
            Command::new("unlock")
                .about("Clear a lockout caused by failed logins")
                .arg(user_id()),
        )
}
