/**
 * Error Conversion
 *
 * IntoResponse for `ApiError` plus the conversions that do not fit a plain
 * `#[from]`. Token verification failures deliberately collapse to a uniform
 * 401 here: the caller logs the variant, the wire never sees it.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 503
 * }
 * ```
 */
use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::backend::auth::tokens::TokenError;
use crate::backend::error::types::ApiError;

impl IntoResponse for ApiError {
    /// Convert an API error into a JSON HTTP response
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap_or_else(
                |_| format!(r#"{{"error":"{}","status":{}}}"#, message, status.as_u16()),
            )))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .unwrap()
            })
    }
}

/// All three rejection kinds answer the same way; which kind it was is a
/// logging concern at the rejection site.
impl From<TokenError> for ApiError {
    fn from(_: TokenError) -> Self {
        ApiError::unauthorized("Invalid session")
    }
}
