pub mod install_dto;

use serde::Serialize;

/// Uniform success envelope for JSON endpoints.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}
