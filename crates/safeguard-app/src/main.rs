mod config;
mod shell;

use std::io;

use tracing::info;

use safeguard_core::Safeguard;
use safeguard_db::Database;

use crate::config::Config;
use crate::shell::Shell;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs to stderr; stdout belongs to the shell
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safeguard=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    info!("Password scheme: {}", config.password_scheme);

    let db = Database::open(&config.db_path)?;
    let app = Safeguard::new(db, config.password_scheme);

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(&app, stdin.lock(), stdout.lock()).run()?;

    info!("Safeguard shell closed");
    Ok(())
}
