//! Admin account management: list and create accounts, set their active flag,
//! reset passwords and unlock accounts. The API restricts these to superadmins.

pub mod client;
pub mod types;

pub use types::{AdminAccount, Role};
