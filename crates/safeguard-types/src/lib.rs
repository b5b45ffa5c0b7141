//! Safeguard shared types.
//!
//! Domain models passed between the store, the account layer and the shell.
//! Row types that mirror SQLite columns live in `safeguard-db` instead.

pub mod models;

pub use models::{Feature, Profile, SettingsRecord, UserId};
