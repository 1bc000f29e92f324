//! todo-app library entrypoint.
//!
//! Modules:
//! - `app`: startup, configuration, shared state
//! - `http`: Axum router and handlers
//! - `db`: schema creation and the SQLite-backed to-do store
//! - `logship`: in-memory log buffering and shipping to object storage
//! - `models`: typed records used across layers
//! - `util`: tracing setup and HTML escaping

pub mod app;
pub mod db;
pub mod http;
pub mod logship;
pub mod models;
pub mod util;
