use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::CatalogSnapshot;
use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{CourseRecommendation, RecommendationRequest};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogStatus {
    pub loaded_at: DateTime<Utc>,
    pub courses: usize,
    pub students: usize,
}

impl From<&CatalogSnapshot> for CatalogStatus {
    fn from(snapshot: &CatalogSnapshot) -> Self {
        Self {
            loaded_at: snapshot.loaded_at(),
            courses: snapshot.courses().len(),
            students: snapshot.student_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub catalog: CatalogStatus,
}

/// Health check with the age and size of the snapshot in service
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.snapshots.current().await;
    Json(HealthResponse {
        status: "healthy",
        catalog: CatalogStatus::from(snapshot.as_ref()),
    })
}

/// Ranked course recommendations for one student
///
/// A body that is not a valid request is answered with a JSON error.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<Vec<CourseRecommendation>>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(
            request_id = %request_id,
            error = %rejection.body_text(),
            "Rejected recommendation request"
        );
        AppError::from(rejection)
    })?;

    let student_id = request.student_id.trim();
    tracing::info!(request_id = %request_id, student_id, "Processing recommendation request");

    let snapshot = state.snapshots.current().await;
    Ok(Json(state.recommender.recommend(&snapshot, student_id)))
}

/// Reloads all tables and swaps in a freshly repaired snapshot
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<CatalogStatus>> {
    let snapshot = state.reload().await?;
    Ok(Json(CatalogStatus::from(snapshot.as_ref())))
}
