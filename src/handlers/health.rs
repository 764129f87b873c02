use axum::extract::Extension;
use axum::Json;
use log::{debug, warn};
use std::sync::Arc;

use crate::models::{HealthResponse, VersionResponse};
use crate::t24::T24Client;

/// Default route (`GET /`). Returns a static greeting.
pub async fn default_route() -> &'static str {
    "T24 bridge up"
}

/// Return build info (`GET /version`).
pub async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build_date: env!("BUILD_DATE"),
        rustc_version: env!("RUSTC_VERSION"),
    })
}

/// Health check that probes tunnel discovery with a single round (`GET /health`).
pub async fn health_check(Extension(t24): Extension<Arc<T24Client>>) -> Json<HealthResponse> {
    let tunnel_status = match t24.probe_tunnel().await {
        Ok(base) => {
            debug!("health_check: tunnel up at {}", base);
            "ok".to_string()
        }
        Err(e) => {
            warn!("health_check: {}", e);
            "error".to_string()
        }
    };

    let overall = if tunnel_status == "ok" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: overall.to_string(),
        tunnel: tunnel_status,
    })
}
