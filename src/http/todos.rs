//! To-do CRUD handlers.

use crate::{
  app::AppState,
  db::StoreError,
  http::{
    error::ApiError,
    extract::{ApiJson, ApiPath},
  },
  models::todo::{
    todo_item::TodoItem,
    todo_payload::{NewTodo, TodoUpdate},
  },
};
use axum::{Json, extract::State};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
  pub message: &'static str,
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoItem>>, ApiError> {
  let todos = state.store.list().await?;
  info!("Retrieved {} todos", todos.len());
  Ok(Json(todos))
}

pub async fn create_todo(
  State(state): State<AppState>,
  ApiJson(body): ApiJson<NewTodo>,
) -> Result<Json<TodoItem>, ApiError> {
  let todo = state.store.create(&body.title, body.completed).await?;
  info!("Created Todo: {} (ID: {})", todo.title, todo.id);
  Ok(Json(todo))
}

pub async fn update_todo(
  State(state): State<AppState>,
  ApiPath(id): ApiPath<i64>,
  ApiJson(body): ApiJson<TodoUpdate>,
) -> Result<Json<TodoItem>, ApiError> {
  match state.store.update(id, &body.title, body.completed).await {
    Ok(todo) => {
      info!("Updated Todo ID {id}");
      Ok(Json(todo))
    }
    Err(StoreError::NotFound(_)) => {
      warn!("Todo ID {id} not found for update");
      Err(ApiError::NotFound)
    }
    Err(e) => Err(e.into()),
  }
}

pub async fn delete_todo(
  State(state): State<AppState>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
  match state.store.delete(id).await {
    Ok(()) => {
      info!("Deleted Todo ID {id}");
      Ok(Json(DeleteResponse {
        message: "Todo deleted",
      }))
    }
    Err(StoreError::NotFound(_)) => {
      warn!("Todo ID {id} not found for deletion");
      Err(ApiError::NotFound)
    }
    Err(e) => Err(e.into()),
  }
}
