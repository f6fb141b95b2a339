use crate::{
    api::PageRequest,
    cli::{
        actions::{NOT_SIGNED_IN, show},
        globals::GlobalArgs,
    },
    errors::ApiError,
    views::admins::TOGGLE_FALLBACK,
};
use anyhow::{Result, anyhow};
use secrecy::SecretString;
use std::fmt;

pub enum Command {
    List(PageRequest),
    Create {
        email: String,
        username: String,
        password: SecretString,
    },
    SetStatus { user_id: u64, active: bool },
    ResetPassword { user_id: u64, password: SecretString },
    Unlock(u64),
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(page) => f.debug_tuple("List").field(page).finish(),
            Self::Create {
                email, username, ..
            } => f
                .debug_struct("Create")
                .field("email", email)
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::SetStatus { user_id, active } => f
                .debug_struct("SetStatus")
                .field("user_id", user_id)
                .field("active", active)
                .finish(),
            Self::ResetPassword { user_id, .. } => f
                .debug_struct("ResetPassword")
                .field("user_id", user_id)
                .field("password", &"***")
                .finish(),
            Self::Unlock(user_id) => f.debug_tuple("Unlock").field(user_id).finish(),
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

fn failure(err: &ApiError, fallback: &str) -> anyhow::Error {
    if err.is_missing_credential() {
        anyhow!(NOT_SIGNED_IN)
    } else if let ApiError::Validation(fields) = err {
        anyhow!(fields.to_string())
    } else {
        anyhow!(err.message_or(fallback))
    }
}

/// # Errors
/// Returns an error if not signed in or the API call fails.
pub async fn execute(args: Args) -> Result<()> {
    let app = args.globals.app()?;

    match args.command {
        Command::List(page) => show(app.open_admins(page).await),
        Command::Create {
            email,
            username,
            password,
        } => {
            let account = app
                .create_admin(&email, &username, &password)
                .await
                .map_err(|err| failure(&err, "Could not create admin account."))?;
            println!(
                "Created admin account {} ({}, {}).",
                account.id, account.username, account.email
            );
            Ok(())
        }
        Command::SetStatus { user_id, active } => {
            app.set_status(user_id, active)
                .await
                .map_err(|err| failure(&err, TOGGLE_FALLBACK))?;
            println!(
                "Account {user_id} is now {}.",
                if active { "active" } else { "disabled" }
            );
            Ok(())
        }
        Command::ResetPassword { user_id, password } => {
            app.reset_password(user_id, &password)
                .await
                .map_err(|err| failure(&err, "Could not reset password."))?;
            println!("Password for account {user_id} was reset.");
            Ok(())
        }
        Command::Unlock(user_id) => {
            app.unlock_account(user_id)
                .await
                .map_err(|err| failure(&err, "Could not unlock account."))?;
            println!("Account {user_id} was unlocked.");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn args(dir: &tempfile::TempDir, uri: &str, command: Command) -> Args {
        let token_path = dir.path().join("token");
        Args {
            globals: GlobalArgs::new(
                ApiConfig::new(uri).unwrap().with_credentials_path(token_path),
            ),
            command,
        }
    }

    #[tokio::test]
    async fn test_disable_then_enable_across_runs() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("token"), "live")?;

        Mock::given(method("POST"))
            .and(path("/api/admin/users/update-status"))
            .and(header("Authorization", "Bearer live"))
            .and(body_json(json!({"user_id": 4, "active": false})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/admin/users/update-status"))
            .and(header("Authorization", "Bearer live"))
            .and(body_json(json!({"user_id": 4, "active": true})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        // Each run builds its own App, like separate invocations of the binary.
        let disable = Command::SetStatus {
            user_id: 4,
            active: false,
        };
        execute(args(&dir, &server.uri(), disable)).await?;
        let enable = Command::SetStatus {
            user_id: 4,
            active: true,
        };
        execute(args(&dir, &server.uri(), enable)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_reports_server_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("token"), "live")?;

        Mock::given(method("POST"))
            .and(path("/api/admin/users/update-status"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "user not found"
            })))
            .mount(&server)
            .await;

        let command = Command::SetStatus {
            user_id: 42,
            active: true,
        };
        let err = execute(args(&dir, &server.uri(), command)).await.err().unwrap();
        assert_eq!(err.to_string(), "user not found");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_requires_login() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let command = Command::Create {
            email: "new@tastygo.vn".to_string(),
            username: "newbie".to_string(),
            password: SecretString::from("s3cret!"),
        };
        let err = execute(args(&dir, "http://127.0.0.1:9", command))
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), NOT_SIGNED_IN);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_reports_field_errors() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("token"), "live")?;
        let command = Command::Create {
            email: "a@b".to_string(),
            username: "newbie".to_string(),
            password: SecretString::from("s3cret!"),
        };
        let err = execute(args(&dir, "http://127.0.0.1:9", command))
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "email: Email is invalid.");
        Ok(())
    }

    #[test]
    fn test_command_debug_hides_password() {
        let command = Command::ResetPassword {
            user_id: 3,
            password: SecretString::from("new-secret"),
        };
        assert!(!format!("{command:?}").contains("new-secret"));

        let command = Command::Create {
            email: "new@tastygo.vn".to_string(),
            username: "newbie".to_string(),
            password: SecretString::from("new-secret"),
        };
        let debug = format!("{command:?}");
        assert!(debug.contains("newbie"));
        assert!(!debug.contains("new-secret"));
    }
}
