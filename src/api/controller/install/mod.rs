//! Install controller: connects chart routes to the install usecase

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::api::dto::install_dto::InstallRequest;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::install::service::InstallOutcome;
use crate::errors::AppError;

pub struct InstallController;

impl InstallController {
    /// Install the configured chart manifest as a new release.
    ///
    /// The body is optional; without one the release name, namespace and
    /// values all come from configuration and the manifest itself.
    pub async fn install(
        State(state): State<AppState>,
        body: Bytes,
    ) -> Result<Json<ApiResponse<InstallOutcome>>, AppError> {
        let req: InstallRequest = if body.is_empty() {
            InstallRequest::default()
        } else {
            serde_json::from_slice(&body)
                .map_err(|err| AppError::BodyParsingError(err.to_string()))?
        };
        req.validate()
            .map_err(|err| AppError::BodyParsingError(err.to_string()))?;

        to_json(state.install_service.install(req).await)
    }
}
