use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

pub async fn status(started_at: DateTime<Utc>) -> Result<Value> {
    Ok(json!({
        "service": "chartd",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": started_at.to_rfc3339(),
        "uptime_sec": (Utc::now() - started_at).num_seconds(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn status_reports_service_and_version() {
        let report = status(Utc::now()).await.unwrap();
        assert_eq!(report["service"], "chartd");
        assert_eq!(report["version"], env!("CARGO_PKG_VERSION"));
        assert!(report["uptime_sec"].as_i64().unwrap() >= 0);
    }
}
