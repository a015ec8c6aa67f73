use axum::{
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

use airinv_calculation::CalculationError;
use airinv_utils::{AirInvError, ErrorResponse};

/// Handler error: an [`AirInvError`] rendered as an `ErrorResponse` body with
/// the error's HTTP status.
#[derive(Debug)]
pub struct ApiError(pub AirInvError);

impl From<AirInvError> for ApiError {
    fn from(error: AirInvError) -> Self {
        Self(error)
    }
}

impl From<CalculationError> for ApiError {
    fn from(error: CalculationError) -> Self {
        Self(AirInvError::calculation(error.field.path(), error.to_string()))
    }
}

impl From<quick_xml::DeError> for ApiError {
    fn from(error: quick_xml::DeError) -> Self {
        Self(AirInvError::from(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            warn!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Logs responses that ended in a server error, whatever produced them.
pub async fn error_handling_middleware(request: Request<axum::body::Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;

    if response.status().is_server_error() {
        error!(%method, %uri, status = %response.status(), "Server error response");
    }
    response
}
