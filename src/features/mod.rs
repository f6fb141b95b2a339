//! Feature modules, one per API area. Each keeps its endpoint paths in a
//! `client` module and its wire types in `types`; the backend remains the
//! authority for every authorization decision.

pub mod admins;
pub mod auth;
pub mod logs;
pub mod profile;
