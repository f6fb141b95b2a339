use clap::{Arg, Command};

#[must_use]
pub fn login() -> Command {
    Command::new("login")
        .about("Sign in and store the session token")
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Operator email")
                .env("TASTYGO_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .help("Operator password")
                .env("TASTYGO_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

#[must_use]
pub fn logout() -> Command {
    Command::new("logout").about("Revoke and forget the stored session token")
}

#[must_use]
pub fn profile() -> Command {
    Command::new("profile").about("Show the signed-in operator (dashboard)")
}
