use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::dto::install_dto::InstallRequest;
use crate::config::Settings;
use crate::domain::install::service::InstallOutcome;

#[derive(Clone)]
pub struct AppState {
    pub install_service: Arc<InstallService>,
    pub system_service: Arc<SystemService>,
}

pub fn build_app_state(settings: Settings) -> AppState {
    let settings = Arc::new(settings);
    AppState {
        install_service: Arc::new(InstallService::new(settings)),
        system_service: Arc::new(SystemService::new()),
    }
}

/// Facade over the install usecase; handlers stay thin.
#[derive(Clone)]
pub struct InstallService {
    settings: Arc<Settings>,
}

impl InstallService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub async fn install(&self, req: InstallRequest) -> anyhow::Result<InstallOutcome> {
        crate::domain::install::service::install(&self.settings, req).await
    }
}

#[derive(Clone)]
pub struct SystemService {
    started_at: DateTime<Utc>,
}

impl SystemService {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }

    pub async fn status(&self) -> anyhow::Result<serde_json::Value> {
        crate::domain::system::service::status(self.started_at).await
    }
}
