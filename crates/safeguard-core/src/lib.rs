//! Safeguard account layer.
//!
//! Registration and login over the local store, per-user preferences, the
//! in-memory session, and the not-yet-built safety features.

pub mod accounts;
pub mod error;
pub mod features;
pub mod password;
pub mod preferences;
pub mod session;

use std::sync::Arc;

use safeguard_db::Database;

pub use accounts::AccountDirectory;
pub use error::{Result, ServiceError};
pub use password::PasswordScheme;
pub use preferences::PreferencesStore;
pub use session::{Session, SessionState};

/// Services sharing one database handle.
pub struct Safeguard {
    pub accounts: AccountDirectory,
    pub preferences: PreferencesStore,
}

impl Safeguard {
    pub fn new(db: Database, scheme: PasswordScheme) -> Self {
        let db = Arc::new(db);
        Self {
            accounts: AccountDirectory::new(db.clone(), scheme),
            preferences: PreferencesStore::new(db),
        }
    }
}
