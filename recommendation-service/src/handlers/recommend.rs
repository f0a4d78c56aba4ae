//! The recommendation endpoint and its debug companion.

use crate::models::{
    ReaderProfile, RecommendRequest, RecommendResponse, RecommendationSource,
};
use crate::services::catalog;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;
use uuid::Uuid;

/// `POST /api/recommend`
///
/// In mock mode the hardcoded catalog is returned directly. In live mode
/// any upstream failure downgrades to the catalog with HTTP 200 and a
/// `debug_error`; this path never surfaces a 5xx.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    if !request.profile.has_required_fields() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Invalid request. Required fields: age, reading_level"
        )));
    }

    let max_per_category = request.max_results_per_category;
    let seed = request
        .seed
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if state.config.mock_mode {
        tracing::debug!("Serving mock response (MOCK_MODE=true)");
        return Ok(Json(RecommendResponse {
            results: catalog::mock_recommendations(max_per_category),
            source: RecommendationSource::Mock,
            raw_text: None,
            debug_error: None,
        }));
    }

    tracing::debug!("Calling Gemini API");
    match state
        .gemini
        .recommend(
            &request.profile,
            max_per_category,
            &request.exclude_titles,
            &seed,
        )
        .await
    {
        Ok(live) => Ok(Json(RecommendResponse {
            results: live.results,
            source: RecommendationSource::Gemini,
            raw_text: Some(live.raw_text),
            debug_error: None,
        })),
        Err(e) => {
            tracing::error!(error = %e, "Gemini API call failed, serving mock fallback");
            Ok(Json(RecommendResponse {
                results: catalog::mock_recommendations(max_per_category),
                source: RecommendationSource::FallbackMock,
                raw_text: None,
                debug_error: Some(e.to_string()),
            }))
        }
    }
}

/// `GET /api/test-gemini`
///
/// Debug endpoint driving the live path with a fixed sample profile.
/// The one place where an upstream failure propagates as HTTP 500.
pub async fn test_gemini(State(state): State<AppState>) -> impl IntoResponse {
    let sample_profile: ReaderProfile =
        serde_json::from_value(json!({"age": 8, "reading_level": "Beginner"}))
            .unwrap_or_default();

    if state.config.mock_mode {
        return (
            StatusCode::OK,
            Json(json!({
                "warning": "MOCK_MODE is true",
                "result": { "results": catalog::mock_recommendations(1) },
                "source": "mock"
            })),
        );
    }

    let seed = Uuid::new_v4().to_string();
    match state.gemini.recommend(&sample_profile, 1, &[], &seed).await {
        Ok(live) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "result": { "results": live.results, "raw_text": live.raw_text },
                "source": "gemini"
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "test-gemini failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
        }
    }
}
