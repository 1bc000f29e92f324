//! A stored to-do item, as kept in SQLite and returned by the API.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}
