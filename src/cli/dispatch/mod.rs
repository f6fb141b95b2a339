use crate::{
    api::PageRequest,
    cli::{
        actions::{Action, admins, logs, session},
        commands::{ARG_PAGE, ARG_PAGE_SIZE, api, logs::ARG_UTC_OFFSET},
        globals::GlobalArgs,
    },
    config::{ApiConfig, default_credentials_path},
    features::logs::LogQuery,
};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{FixedOffset, Offset, Utc};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(api::ARG_API_URL)
        .context("missing required argument: --api-url")?;
    let timeout = matches
        .get_one::<u64>(api::ARG_TIMEOUT)
        .copied()
        .context("missing required argument: --timeout")?;
    let credentials_path = matches
        .get_one::<PathBuf>(api::ARG_CREDENTIALS_FILE)
        .cloned()
        .unwrap_or_else(default_credentials_path);

    let config = ApiConfig::new(api_url)
        .map_err(|err| anyhow!(err))
        .context("invalid TASTYGO_API_URL")?
        .with_timeout(Duration::from_secs(timeout))
        .with_credentials_path(credentials_path);

    Ok(GlobalArgs::new(config))
}

fn page(matches: &ArgMatches) -> PageRequest {
    PageRequest::new(
        matches.get_one::<u32>(ARG_PAGE).copied().unwrap_or(1),
        matches.get_one::<u32>(ARG_PAGE_SIZE).copied().unwrap_or(0),
    )
}

fn user_id(matches: &ArgMatches) -> Result<u64> {
    matches
        .get_one::<u64>("id")
        .copied()
        .context("missing required argument: <id>")
}

fn text(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn secret(matches: &ArgMatches, name: &str) -> Result<SecretString> {
    matches
        .get_one::<String>(name)
        .map(|value| SecretString::from(value.clone()))
        .with_context(|| format!("missing required argument: --{name}"))
}

fn admins_command(matches: &ArgMatches) -> Result<admins::Command> {
    let command = match matches.subcommand() {
        Some(("list", sub)) => admins::Command::List(page(sub)),
        Some(("create", sub)) => admins::Command::Create {
            email: text(sub, "email")?,
            username: text(sub, "username")?,
            password: secret(sub, "password")?,
        },
        Some(("enable", sub)) => admins::Command::SetStatus {
            user_id: user_id(sub)?,
            active: true,
        },
        Some(("disable", sub)) => admins::Command::SetStatus {
            user_id: user_id(sub)?,
            active: false,
        },
        Some(("reset-password", sub)) => admins::Command::ResetPassword {
            user_id: user_id(sub)?,
            password: secret(sub, "password")?,
        },
        Some(("unlock", sub)) => admins::Command::Unlock(user_id(sub)?),
        Some((other, _)) => bail!("unknown admins command: {other}"),
        None => bail!("missing admins command"),
    };
    Ok(command)
}

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    let action = match matches.subcommand() {
        Some(("login", sub)) => Action::Login(session::LoginArgs {
            globals,
            email: text(sub, "email")?,
            password: secret(sub, "password")?,
        }),
        Some(("logout", _)) => Action::Logout(globals),
        Some(("profile", _)) => Action::Profile(globals),
        Some(("admins", sub)) => Action::Admins(admins::Args {
            globals,
            command: admins_command(sub)?,
        }),
        Some(("logs", sub)) => Action::Logs(logs::Args {
            globals,
            query: LogQuery {
                page: page(sub),
                user_id: sub.get_one::<u64>("user-id").copied(),
            },
            offset: sub
                .get_one::<FixedOffset>(ARG_UTC_OFFSET)
                .copied()
                .unwrap_or_else(|| Utc.fix()),
        }),
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("missing command, see --help"),
    };

    Ok(action)
}
