pub mod admins;
pub mod logs;
pub mod session;

// Internal "interpreter" for `Action`; the match lives in `run` so this file stays small.
mod run;

use crate::{app::Screen, cli::globals::GlobalArgs, views::ResourceView};
use anyhow::{Result, anyhow, bail};

#[derive(Debug)]
pub enum Action {
    Login(session::LoginArgs),
    Logout(GlobalArgs),
    Profile(GlobalArgs),
    Admins(admins::Args),
    Logs(logs::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

pub(crate) const NOT_SIGNED_IN: &str = "Not signed in. Run `tastygo-admin login` first.";

/// Prints a settled screen. A failed fetch is printed and also returned as an
/// error so the process exits non-zero.
pub(crate) fn show(screen: Option<Screen>) -> Result<()> {
    let Some(screen) = screen else {
        bail!("navigation was cancelled");
    };

    let error = match &screen {
        Screen::Login => bail!(NOT_SIGNED_IN),
        Screen::Dashboard(view) => view.error_message(),
        Screen::Admins(view) => view.error_message(),
        Screen::Logs(view) => view.error_message(),
    };

    match error {
        Some(message) => Err(anyhow!(message)),
        None => {
            print!("{}", screen.render());
            Ok(())
        }
    }
}
