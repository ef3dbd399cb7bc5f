use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Why an order submission was rejected before reaching the matching core.
///
/// These are caller-contract violations; the core itself never fails and is
/// never invoked for a rejected submission.
#[derive(Debug, Error)]
pub enum OrderRejection {
    #[error("invalid side `{0}`, must be `buy` or `sell`")]
    InvalidSide(String),

    #[error("invalid order_type `{0}`, must be `market`, `limit`, `ioc` or `fok`")]
    InvalidOrderType(String),

    #[error("quantity must be > 0")]
    NonPositiveQuantity,

    #[error("price must be > 0 for `{0}` orders")]
    MissingPrice(String),
}

impl IntoResponse for OrderRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
