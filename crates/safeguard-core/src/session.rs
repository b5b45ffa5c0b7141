use chrono::{DateTime, Utc};
use tracing::info;

use safeguard_types::UserId;

use crate::accounts::AccountDirectory;
use crate::error::{Result, ServiceError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn {
        user_id: UserId,
        since: DateTime<Utc>,
    },
}

/// The identity currently using this running instance.
/// Lives in memory only; a restart always begins logged out.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<UserId> {
        match self.state {
            SessionState::LoggedIn { user_id, .. } => Some(user_id),
            SessionState::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Authenticate and switch to that identity. On failure the session is
    /// left exactly as it was.
    pub fn login(
        &mut self,
        accounts: &AccountDirectory,
        username: &str,
        password: &str,
    ) -> Result<UserId> {
        let user_id = accounts
            .authenticate(username, password)?
            .ok_or(ServiceError::InvalidCredentials)?;

        let since = Utc::now();
        self.state = SessionState::LoggedIn { user_id, since };
        info!(%user_id, "Logged in as {}", username);
        Ok(user_id)
    }

    /// Returns the identity that was logged out, if any.
    pub fn logout(&mut self) -> Option<UserId> {
        let previous = std::mem::take(&mut self.state);
        match previous {
            SessionState::LoggedIn { user_id, since } => {
                let minutes = (Utc::now() - since).num_minutes();
                info!(%user_id, "Logged out after {} min", minutes);
                Some(user_id)
            }
            SessionState::LoggedOut => None,
        }
    }

    pub fn require_user(&self) -> Result<UserId> {
        self.current_user().ok_or(ServiceError::NotLoggedIn)
    }
}
