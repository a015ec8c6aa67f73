use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, state::AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health/detailed", get(detailed_health_check))
        .nest("/reports", report_routes())
        .route("/emissions/calculate", post(calculate_emission))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate_report))
        .route("/recalculate", post(recalculate_report))
        .route("/bulk-entry", post(bulk_entry))
        .route("/export", post(export_report))
}
