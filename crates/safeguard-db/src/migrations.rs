use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

type Migration = (i64, &'static str, fn(&Connection) -> Result<()>);

const MIGRATIONS: &[Migration] = &[
    (1, "initial schema", v1_initial_schema),
    (2, "one settings row per user", v2_unique_settings),
];

/// Bring the schema up to date. Files written by earlier releases, which
/// have the tables but no `schema_version`, are adopted in place.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let mut version = current_version(conn)?;

    for &(target, name, apply) in MIGRATIONS {
        if target <= version {
            continue;
        }

        info!("Running migration v{} ({})", target, name);
        let tx = conn.unchecked_transaction()?;
        apply(&tx)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [target])?;
        tx.commit()?;
        version = target;
    }

    info!("Database migrations complete (schema v{})", version);
    Ok(())
}

pub fn current_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;
    Ok(version)
}

fn v1_initial_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT UNIQUE NOT NULL,
            password    TEXT NOT NULL,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            setting_id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id             INTEGER,
            notification        INTEGER DEFAULT 0,
            notification_sound  TEXT DEFAULT '',
            vibration_pattern   TEXT DEFAULT '',
            location_tracking   INTEGER DEFAULT 0,
            location_sharing    INTEGER DEFAULT 0,
            FOREIGN KEY (user_id) REFERENCES users (user_id)
        );

        CREATE TABLE IF NOT EXISTS checkins (
            checkin_id  INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER,
            timestamp   TEXT NOT NULL,
            location    TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (user_id)
        );

        CREATE TABLE IF NOT EXISTS alerts (
            alert_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER,
            alert_type  TEXT NOT NULL,
            timestamp   TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (user_id)
        );

        CREATE TABLE IF NOT EXISTS contacts (
            contact_id  INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER,
            name        TEXT NOT NULL,
            phone       TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (user_id)
        );
        ",
    )?;
    Ok(())
}

// Older files could hold several settings rows per user. Keep the newest.
fn v2_unique_settings(conn: &Connection) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM settings
         WHERE user_id IS NULL
            OR setting_id NOT IN (
                SELECT MAX(setting_id) FROM settings
                WHERE user_id IS NOT NULL
                GROUP BY user_id
            )",
        [],
    )?;
    if removed > 0 {
        warn!("Removed {} duplicate or ownerless settings rows", removed);
    }

    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_settings_user ON settings(user_id);",
    )?;
    Ok(())
}
