use std::sync::Arc;

use tracing::debug;

use safeguard_db::Database;
use safeguard_types::{SettingsRecord, UserId};

use crate::error::{Result, ServiceError};

/// One preference record per user. Writes replace the whole record.
pub struct PreferencesStore {
    db: Arc<Database>,
}

impl PreferencesStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_settings(&self, user_id: UserId) -> Result<Option<SettingsRecord>> {
        Ok(self.db.get_settings(user_id)?.map(SettingsRecord::from))
    }

    pub fn save_settings(&self, user_id: UserId, record: &SettingsRecord) -> Result<()> {
        if self.db.get_user_by_id(user_id)?.is_none() {
            return Err(ServiceError::NotFound);
        }

        self.db.upsert_settings(user_id, record)?;
        debug!(%user_id, "Settings saved");
        Ok(())
    }
}
