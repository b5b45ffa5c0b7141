use std::path::PathBuf;

use anyhow::{Context, Result};

use safeguard_core::PasswordScheme;

const DEFAULT_DB_PATH: &str = "safety_app.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub password_scheme: PasswordScheme,
}

impl Config {
    /// Read `SAFEGUARD_*` variables. Call after `.env` has been loaded.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path: PathBuf = get("SAFEGUARD_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.into())
            .into();

        let password_scheme = match get("SAFEGUARD_PASSWORD_SCHEME") {
            Some(raw) if !raw.trim().is_empty() => raw
                .parse::<PasswordScheme>()
                .context("SAFEGUARD_PASSWORD_SCHEME is invalid")?,
            _ => PasswordScheme::default(),
        };

        Ok(Self {
            db_path,
            password_scheme,
        })
    }
}
