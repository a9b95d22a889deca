pub mod types;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{error, warn};

use crate::HouseFinderError;
use crate::models::SearchRequest;
use crate::search::CheaperNearbyService;

pub use types::{
    ApiErrorBody, ApiListing, FindCheaperNearbyBody, FindCheaperNearbyResponse,
};

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub service: CheaperNearbyService,
    /// Include internal error detail in failure envelopes
    pub expose_errors: bool,
}

/// An error on its way out of the API, rendered as the failure envelope
pub struct ApiError {
    error: HouseFinderError,
    expose: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.error);
        } else {
            warn!("Rejected request: {}", self.error);
        }

        let body = ApiErrorBody {
            success: false,
            message: self.error.user_message(),
            error: (self.expose && status.is_server_error()).then(|| self.error.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/houses/find-cheaper-nearby", post(find_cheaper_nearby))
        .fallback(not_found)
        .with_state(state)
}

async fn find_cheaper_nearby(
    State(state): State<ApiState>,
    payload: Result<Json<FindCheaperNearbyBody>, JsonRejection>,
) -> Result<Json<FindCheaperNearbyResponse>, ApiError> {
    let reject = |error| ApiError {
        error,
        expose: state.expose_errors,
    };

    let Json(body) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return reject(HouseFinderError::PayloadTooLarge {
                message: "Request body is too large".to_string(),
            });
        }
        reject(HouseFinderError::validation(format!(
            "Missing or invalid required parameters: {}",
            rejection.body_text()
        )))
    })?;
    let request = SearchRequest::try_from(body).map_err(reject)?;

    let result = state
        .service
        .find_cheaper_nearby(&request)
        .await
        .map_err(reject)?;

    Ok(Json(FindCheaperNearbyResponse::from(result)))
}

async fn not_found() -> (StatusCode, Json<ApiErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorBody {
            success: false,
            message: "API Endpoint Not Found".to_string(),
            error: None,
        }),
    )
}
