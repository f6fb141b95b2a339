use crate::cli::actions::{Action, admins, logs, session};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => session::login(args).await,
        Action::Logout(globals) => session::logout(&globals).await,
        Action::Profile(globals) => session::profile(&globals).await,
        Action::Admins(args) => admins::execute(args).await,
        Action::Logs(args) => logs::execute(args).await,
    }
}
