//! Success envelope helpers. Lists and single reads are returned bare; writes carry a `success` message.

use crate::error::AppError;
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{Map, Value};

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

/// `201 {"success": message, key: entity}`.
pub fn created<T: Serialize>(
    message: impl Into<String>,
    key: &str,
    entity: T,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entity = serde_json::to_value(entity)
        .map_err(|e| AppError::Internal(format!("failed to serialize {}: {}", key, e)))?;
    let mut body = Map::new();
    body.insert("success".into(), Value::String(message.into()));
    body.insert(key.into(), entity);
    Ok((StatusCode::CREATED, Json(Value::Object(body))))
}

/// `200 {"success": message}`.
pub fn deleted(message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "success": message.into() })))
}
