//! The record store for to-do items.
//!
//! Every operation runs inside its own transaction. A transaction that is not
//! committed is rolled back when its guard drops, which also hands the
//! connection back to the pool, so early returns and `?` leave the table as it
//! was.

use crate::models::todo::todo_item::TodoItem;
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("todo {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Cloneable handle over the connection pool.
#[derive(Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All items, ascending by id.
    pub async fn list(&self) -> StoreResult<Vec<TodoItem>> {
        let mut tx = self.pool.begin().await?;
        let todos = sqlx::query_as::<_, TodoItem>(
            "SELECT id, title, completed FROM todos ORDER BY id ASC",
        )
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(todos)
    }

    pub async fn create(&self, title: &str, completed: bool) -> StoreResult<TodoItem> {
        let mut tx = self.pool.begin().await?;
        let todo = sqlx::query_as::<_, TodoItem>(
            "INSERT INTO todos (title, completed) VALUES (?, ?) RETURNING id, title, completed",
        )
        .bind(title)
        .bind(completed)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(todo)
    }

    /// Overwrite both fields of an existing item.
    pub async fn update(&self, id: i64, title: &str, completed: bool) -> StoreResult<TodoItem> {
        let mut tx = self.pool.begin().await?;
        let todo = sqlx::query_as::<_, TodoItem>(
            "UPDATE todos SET title = ?, completed = ? WHERE id = ? RETURNING id, title, completed",
        )
        .bind(title)
        .bind(completed)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound(id))?;
        tx.commit().await?;
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        tx.commit().await?;
        Ok(())
    }
}
