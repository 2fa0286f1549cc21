use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::path::Path;

use crate::shared::config::{self, Config};

/// DDL таблиц; выполняется при каждом старте, повторный запуск безопасен
const SCHEMA: &[(&str, &str)] = &[
    (
        "a001_member",
        r#"
        CREATE TABLE IF NOT EXISTS a001_member (
            id TEXT PRIMARY KEY NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            age INTEGER NOT NULL,
            phone TEXT NOT NULL UNIQUE,
            first_enrollment_date TEXT NOT NULL,
            last_renewal_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a002_membership_type",
        r#"
        CREATE TABLE IF NOT EXISTS a002_membership_type (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE,
            days_granted INTEGER NOT NULL,
            price REAL NOT NULL DEFAULT 0,
            description TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_membership",
        r#"
        CREATE TABLE IF NOT EXISTS a003_membership (
            id TEXT PRIMARY KEY NOT NULL,
            member_id TEXT NOT NULL REFERENCES a001_member(id),
            membership_type_id TEXT NOT NULL REFERENCES a002_membership_type(id),
            acquisition_date TEXT NOT NULL,
            expiration_date TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "idx_a003_membership_member",
        "CREATE INDEX IF NOT EXISTS idx_a003_membership_member ON a003_membership(member_id);",
    ),
    (
        "idx_a003_membership_type",
        "CREATE INDEX IF NOT EXISTS idx_a003_membership_type ON a003_membership(membership_type_id);",
    ),
];

fn build_sqlite_url(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Подключение к БД по настройкам и создание схемы
pub async fn initialize_database(cfg: &Config) -> anyhow::Result<DatabaseConnection> {
    let db_url = if cfg.database.path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        let db_path = config::get_database_path(cfg);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        build_sqlite_url(&db_path)
    };

    tracing::info!("Connecting to database: {}", db_url);
    connect(&db_url).await
}

pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(db_url.to_string());
    options.sqlx_logging(false);
    if db_url.contains(":memory:") {
        // БД в памяти живёт, пока жив её единственный коннект
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (name, ddl) in SCHEMA {
        tracing::debug!("Ensuring {}", name);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }
    Ok(())
}

/// Пустая БД в памяти со схемой, для тестов
#[cfg(test)]
pub async fn connect_in_memory() -> DatabaseConnection {
    connect("sqlite::memory:")
        .await
        .expect("in-memory database")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_url_for_unix_and_windows_paths() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/lib/gym.db")),
            "sqlite:///var/lib/gym.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\gym.db")),
            "sqlite:///C:/data/gym.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn schema_bootstrap_is_idempotent() {
        let conn = connect_in_memory().await;
        ensure_schema(&conn).await.unwrap();
    }
}
