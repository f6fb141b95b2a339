//! Session state: where the bearer token lives and how the rest of the app
//! reaches it. The token is the only client-side authentication signal; its
//! expiry is never checked locally. Token material must never be logged.

mod context;
mod store;

pub use context::SessionContext;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
