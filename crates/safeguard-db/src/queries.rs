use crate::Database;
use crate::models::{SettingsRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;
use safeguard_types::{SettingsRecord, UserId};

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        email: &str,
    ) -> Result<UserId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, name, email) VALUES (?1, ?2, ?3, ?4)",
                (username, password_hash, name, email),
            )?;
            Ok(UserId(conn.last_insert_rowid()))
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", &username))
    }

    pub fn get_user_by_id(&self, id: UserId) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "user_id = ?1", &id.0))
    }

    /// Returns false when no such user exists.
    pub fn update_user_profile(&self, id: UserId, name: &str, email: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET name = ?1, email = ?2 WHERE user_id = ?3",
                rusqlite::params![name, email, id.0],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn update_user_password(&self, id: UserId, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET password = ?1 WHERE user_id = ?2",
                rusqlite::params![password_hash, id.0],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Settings --

    pub fn get_settings(&self, user_id: UserId) -> Result<Option<SettingsRow>> {
        self.with_conn(|conn| query_settings(conn, user_id))
    }

    /// Insert or overwrite the settings row owned by `user_id`.
    pub fn upsert_settings(&self, user_id: UserId, settings: &SettingsRecord) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO settings
                    (user_id, notification, notification_sound, vibration_pattern,
                     location_tracking, location_sharing)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id) DO UPDATE SET
                    notification = excluded.notification,
                    notification_sound = excluded.notification_sound,
                    vibration_pattern = excluded.vibration_pattern,
                    location_tracking = excluded.location_tracking,
                    location_sharing = excluded.location_sharing",
                rusqlite::params![
                    user_id.0,
                    settings.notification,
                    settings.notification_sound,
                    settings.vibration_pattern,
                    settings.location_tracking,
                    settings.location_sharing,
                ],
            )?;
            Ok(())
        })
    }
}

fn query_user(
    conn: &Connection,
    predicate: &str,
    key: &dyn rusqlite::types::ToSql,
) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT user_id, username, password, name, email FROM users WHERE {}",
        predicate
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([key], |row| {
            Ok(UserRow {
                user_id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                name: row.get(3)?,
                email: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_settings(conn: &Connection, user_id: UserId) -> Result<Option<SettingsRow>> {
    let mut stmt = conn.prepare(
        "SELECT setting_id, user_id, notification, notification_sound, vibration_pattern,
                location_tracking, location_sharing
         FROM settings WHERE user_id = ?1",
    )?;

    // Columns carry defaults but not NOT NULL, so tolerate NULLs from old files.
    let row = stmt
        .query_row([user_id.0], |row| {
            Ok(SettingsRow {
                setting_id: row.get(0)?,
                user_id: row.get(1)?,
                notification: row.get::<_, Option<bool>>(2)?.unwrap_or_default(),
                notification_sound: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                vibration_pattern: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                location_tracking: row.get::<_, Option<bool>>(5)?.unwrap_or_default(),
                location_sharing: row.get::<_, Option<bool>>(6)?.unwrap_or_default(),
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_rows(db: &Database, user_id: UserId) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM settings WHERE user_id = ?1",
                [user_id.0],
                |r| r.get(0),
            )?)
        })
        .unwrap()
    }

    #[test]
    fn user_lookup_by_name_and_id() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_user("alice", "hash", "Alice", "a@x.com").unwrap();

        let by_name = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(by_name.id(), id);
        assert_eq!(by_name.password, "hash");

        let by_id = db.get_user_by_id(id).unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert_eq!(by_id.profile().email, "a@x.com");

        assert!(db.get_user_by_username("bob").unwrap().is_none());
        assert!(db.get_user_by_id(UserId(id.0 + 100)).unwrap().is_none());
    }

    #[test]
    fn ids_are_distinct() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_user("a", "h", "A", "a@x").unwrap();
        let b = db.create_user("b", "h", "B", "b@x").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn profile_update_reports_missing_user() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_user("alice", "h", "Alice", "a@x.com").unwrap();

        assert!(db.update_user_profile(id, "Alice B", "ab@x.com").unwrap());
        let row = db.get_user_by_id(id).unwrap().unwrap();
        assert_eq!(row.name, "Alice B");
        assert_eq!(row.email, "ab@x.com");

        assert!(!db.update_user_profile(UserId(999), "X", "x@x").unwrap());
    }

    #[test]
    fn password_update() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_user("alice", "old", "Alice", "a@x.com").unwrap();

        assert!(db.update_user_password(id, "new").unwrap());
        assert_eq!(db.get_user_by_id(id).unwrap().unwrap().password, "new");
    }

    #[test]
    fn settings_upsert_keeps_single_row() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_user("alice", "h", "Alice", "a@x.com").unwrap();
        assert!(db.get_settings(id).unwrap().is_none());

        let first = SettingsRecord {
            notification: true,
            notification_sound: "chime".into(),
            ..Default::default()
        };
        db.upsert_settings(id, &first).unwrap();

        let second = SettingsRecord {
            vibration_pattern: "long-short".into(),
            location_sharing: true,
            ..Default::default()
        };
        db.upsert_settings(id, &second).unwrap();

        assert_eq!(settings_rows(&db, id), 1);
        let stored: SettingsRecord = db.get_settings(id).unwrap().unwrap().into();
        assert_eq!(stored, second);
    }

    #[test]
    fn settings_require_existing_user() {
        let db = Database::open_in_memory().unwrap();
        let result = db.upsert_settings(UserId(7), &SettingsRecord::default());
        assert!(result.is_err());
    }

    #[test]
    fn settings_null_columns_read_as_defaults() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_user("alice", "h", "Alice", "a@x.com").unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO settings (user_id, notification, notification_sound)
                 VALUES (?1, NULL, NULL)",
                [id.0],
            )?;
            Ok(())
        })
        .unwrap();

        let stored: SettingsRecord = db.get_settings(id).unwrap().unwrap().into();
        assert_eq!(stored, SettingsRecord::default());
    }
}
