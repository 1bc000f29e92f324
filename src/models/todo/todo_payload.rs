//! Request bodies accepted by the to-do API.

use serde::{Deserialize, Deserializer, de::Error as _};

/// Body of `POST /api/todos/`. `completed` may be omitted.
#[derive(Debug, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub completed: bool,
}

/// Body of `PUT /api/todos/{id}`. Both fields overwrite the stored values.
#[derive(Debug, Deserialize)]
pub struct TodoUpdate {
    pub title: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub completed: bool,
}

/// Accepts `true`/`false`, `0`/`1`, and the usual string spellings
/// (`"true"`, `"yes"`, `"on"`, `"1"` and their negatives, any case).
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    match Loose::deserialize(deserializer)? {
        Loose::Bool(b) => Ok(b),
        Loose::Int(0) => Ok(false),
        Loose::Int(1) => Ok(true),
        Loose::Int(n) => Err(D::Error::custom(format!("invalid boolean: {n}"))),
        Loose::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
            _ => Err(D::Error::custom(format!("invalid boolean: {s:?}"))),
        },
    }
}
