use std::sync::Arc;

use tracing::{debug, info, warn};

use safeguard_db::{Database, is_unique_violation};
use safeguard_types::{Profile, UserId};

use crate::error::{Result, ServiceError};
use crate::password::{PasswordScheme, Verification};

/// Creates and authenticates user identities.
pub struct AccountDirectory {
    db: Arc<Database>,
    scheme: PasswordScheme,
}

impl AccountDirectory {
    pub fn new(db: Arc<Database>, scheme: PasswordScheme) -> Self {
        if scheme == PasswordScheme::LegacySha256 {
            warn!("Storing new credentials as unsalted SHA-256; use argon2id outside legacy setups");
        }
        Self { db, scheme }
    }

    pub fn register(
        &self,
        username: &str,
        password: &str,
        name: &str,
        email: &str,
    ) -> Result<UserId> {
        if self.db.get_user_by_username(username)?.is_some() {
            return Err(ServiceError::DuplicateUsername);
        }

        let password_hash = self.scheme.hash(password)?;

        let user_id = self
            .db
            .create_user(username, &password_hash, name, email)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ServiceError::DuplicateUsername
                } else {
                    ServiceError::Storage(e)
                }
            })?;

        info!(%user_id, "Registered user {}", username);
        Ok(user_id)
    }

    /// Returns the identity when `password` matches the stored credential.
    /// Unknown usernames and wrong passwords are indistinguishable.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserId>> {
        let Some(user) = self.db.get_user_by_username(username)? else {
            debug!("Authentication failed for {}: no such user", username);
            return Ok(None);
        };

        match self.scheme.verify(&user.password, password)? {
            Verification::Mismatch => {
                debug!("Authentication failed for {}: wrong password", username);
                return Ok(None);
            }
            Verification::Match => {}
            Verification::Outdated => self.upgrade_hash(user.id(), password),
        }

        Ok(Some(user.id()))
    }

    pub fn profile(&self, user_id: UserId) -> Result<Option<Profile>> {
        Ok(self.db.get_user_by_id(user_id)?.map(|row| row.profile()))
    }

    pub fn update_profile(&self, user_id: UserId, name: &str, email: &str) -> Result<()> {
        if !self.db.update_user_profile(user_id, name, email)? {
            return Err(ServiceError::NotFound);
        }
        info!(%user_id, "Profile updated");
        Ok(())
    }

    // Best effort: the login already succeeded, so a failed rewrite only logs.
    fn upgrade_hash(&self, user_id: UserId, password: &str) {
        let result = self.scheme.hash(password).and_then(|hash| {
            self.db
                .update_user_password(user_id, &hash)
                .map_err(ServiceError::from)
        });

        match result {
            Ok(_) => info!(%user_id, "Upgraded stored credential to {}", self.scheme),
            Err(e) => warn!(%user_id, "Failed to upgrade stored credential: {}", e),
        }
    }
}
