use anyhow::Result;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::errors::{AppError, internal_error};

/// Map a service result into the JSON envelope.
///
/// Typed `AppError`s raised inside the service layer keep their status
/// code; anything else becomes an internal error.
pub fn to_json<T: serde::Serialize>(
    result: Result<T>
) -> Result<Json<ApiResponse<T>>, AppError> {
    match result {
        Ok(value) => Ok(Json(ApiResponse::ok(value))),
        Err(err) => Err(match err.downcast::<AppError>() {
            Ok(app_err) => app_err,
            Err(other) => internal_error(other), // preserves original error string
        }),
    }
}
