//! Database row types — these map directly to SQLite rows.
//! Conversions into the shared models drop the stored credential.

use safeguard_types::{Profile, SettingsRecord, UserId};

pub struct UserRow {
    pub user_id: i64,
    pub username: String,
    /// Stored credential hash (Argon2id PHC string or legacy SHA-256 hex).
    pub password: String,
    pub name: String,
    pub email: String,
}

impl UserRow {
    pub fn id(&self) -> UserId {
        UserId(self.user_id)
    }

    pub fn profile(&self) -> Profile {
        Profile {
            user_id: self.id(),
            username: self.username.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

pub struct SettingsRow {
    pub setting_id: i64,
    pub user_id: i64,
    pub notification: bool,
    pub notification_sound: String,
    pub vibration_pattern: String,
    pub location_tracking: bool,
    pub location_sharing: bool,
}

impl From<SettingsRow> for SettingsRecord {
    fn from(row: SettingsRow) -> Self {
        Self {
            notification: row.notification,
            notification_sound: row.notification_sound,
            vibration_pattern: row.vibration_pattern,
            location_tracking: row.location_tracking,
            location_sharing: row.location_sharing,
        }
    }
}
