use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "airinv-emissions-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Health plus reference cache and rule registry state.
pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let cache = state.reference.snapshot();
    let registry = state.validation.chain().registry();

    Json(json!({
        "status": "healthy",
        "service": "airinv-emissions-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "reference_cache": {
                "hits": cache.hits,
                "misses": cache.misses,
                "entries": cache.entries
            },
            "validation_rules": {
                "jurisdictions": registry.jurisdiction_codes()
            }
        }
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> String {
    crate::metrics::encode(&state.registry)
}
