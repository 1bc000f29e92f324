//! Database helpers: schema creation, path handling and the to-do store.

use sqlx::SqlitePool;
use std::path::Path;

pub mod store;

pub use store::{StoreError, StoreResult, TodoStore};

/// Create the `todos` table if absent.
///
/// `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row again.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT 0
        )"#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Ensure SQLite file and parent folder exist for a given sqlx URL.
pub fn ensure_sqlite_path(db_url: &str) -> String {
    if !db_url.starts_with("sqlite:") {
        return db_url.to_string();
    }
    let path_part = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    if path_part.is_empty() || path_part.starts_with(":memory:") {
        return db_url.to_string();
    }
    let path_only = path_part.split_once('?').map_or(path_part, |(p, _)| p);
    if !path_only.is_empty() {
        let p = Path::new(path_only);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let _ = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(p);
    }
    db_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_foreign_urls_pass_through() {
        assert_eq!(ensure_sqlite_path("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(ensure_sqlite_path("sqlite://:memory:"), "sqlite://:memory:");
        assert_eq!(
            ensure_sqlite_path("postgres://localhost/todos"),
            "postgres://localhost/todos"
        );
    }

    #[test]
    fn file_urls_create_the_database_file() {
        let dir = std::env::temp_dir().join(format!("todo-app-db-{}", std::process::id()));
        let file = dir.join("nested").join("todo.db");
        let url = format!("sqlite://{}?mode=rwc", file.display());

        assert_eq!(ensure_sqlite_path(&url), url);
        assert!(file.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }
}
