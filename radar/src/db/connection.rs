use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Shared handle to the radar store. Cloning is cheap.
#[derive(Clone)]
pub struct Database {
    db: Arc<libsql::Database>,
}

impl Database {
    /// Open the database described by `config`, apply pragmas and make sure
    /// every table exists.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            let token = config.auth_token.clone().unwrap_or_default();
            match &config.local_path {
                Some(local_path) => {
                    Builder::new_remote_replica(local_path, config.url.clone(), token)
                        .build()
                        .await?
                }
                None => Builder::new_remote(config.url.clone(), token).build().await?,
            }
        } else if config.url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let database = Self { db: Arc::new(db) };
        database.apply_pragmas(config).await?;

        let conn = database.connect()?;
        schema::init_schema(&conn).await?;

        tracing::debug!(url = %config.url, "Database ready");
        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    /// Pragmas are best effort: remote databases reject most of them.
    async fn apply_pragmas(&self, config: &DatabaseConfig) -> Result<()> {
        let conn = self.connect()?;
        let pragmas = [
            ("busy_timeout", config.busy_timeout_ms.to_string()),
            ("journal_mode", normalize_journal_mode(&config.journal_mode).to_string()),
            ("synchronous", normalize_synchronous(&config.synchronous).to_string()),
        ];

        for (name, value) in pragmas {
            let sql = format!("PRAGMA {name} = {value}");
            if let Err(error) = conn.execute_batch(&sql).await {
                tracing::warn!(pragma = name, value = %value, error = %error, "Failed to set SQLite pragma");
            }
        }

        Ok(())
    }

    pub async fn sync(&self) -> Result<()> {
        match self.db.sync().await {
            Ok(replicated) => tracing::info!("Database synced: {:?}", replicated),
            Err(error) => tracing::debug!(error = %error, "Database sync skipped"),
        }
        Ok(())
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

fn normalize_synchronous(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "OFF" => "OFF",
        "FULL" => "FULL",
        "EXTRA" => "EXTRA",
        _ => "NORMAL",
    }
}
