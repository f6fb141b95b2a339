use crate::{
    app::App,
    config::ApiConfig,
    errors::ApiError,
    session::{CredentialStore, FileCredentialStore},
};
use std::sync::Arc;

/// Connection settings resolved from the global flags.
#[derive(Clone, Debug)]
pub struct GlobalArgs {
    pub config: ApiConfig,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn CredentialStore> {
        Arc::new(FileCredentialStore::new(self.config.credentials_path.clone()))
    }

    /// App backed by the on-disk credential file.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be built.
    pub fn app(&self) -> Result<App, ApiError> {
        App::with_store(self.config.clone(), self.store())
    }
}
