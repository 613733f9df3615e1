//! Chart routes (e.g., /api/v1/charts/*)

use axum::{routing::post, Router};
use crate::api::controller::install::InstallController;
use crate::app_state::AppState;

pub fn install_routes() -> Router<AppState> {
    Router::new()
        .route("/install", post(InstallController::install))
}
