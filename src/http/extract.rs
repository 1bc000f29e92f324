//! Extractors whose rejections render as [`ApiError`].

use super::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// `axum::Json` with a `{"detail": ...}` rejection body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with a `{"detail": ...}` rejection body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
