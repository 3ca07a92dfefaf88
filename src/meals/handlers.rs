use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::state::AppState;

use super::dto::{
    Pagination, PostGlucoseRequest, PostGlucoseResponse, RecordDetails, RecordListItem,
    SaveMealRequest, SavedMealResponse,
};
use super::record::{format_iso_date, parse_iso_date, MealSlot};
use super::services::{record_post_meal, save_meal, PostMealError, SaveMealError};

// --- public routers ---

pub fn read_router() -> Router<AppState> {
    Router::new()
        .route("/records", get(list_records))
        .route("/records/:date/:slot", get(get_record))
}

pub fn write_router() -> Router<AppState> {
    Router::new()
        .route("/records", post(create_record))
        .route("/records/:date/:slot/post-glucose", put(put_post_glucose))
}

// --- handlers ---

#[instrument(skip(state))]
async fn list_records(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<RecordListItem>>, (StatusCode, String)> {
    let records = state
        .store
        .list_meal_records(p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(records.into_iter().map(RecordListItem::from).collect()))
}

#[instrument(skip(state))]
async fn get_record(
    State(state): State<AppState>,
    Path((date, slot)): Path<(String, MealSlot)>,
) -> Result<Json<RecordDetails>, (StatusCode, String)> {
    let date = parse_iso_date(&date).map_err(bad_date)?;

    let Some(record) = state
        .store
        .find_meal_record(date, slot)
        .await
        .map_err(internal)?
    else {
        return Err((StatusCode::NOT_FOUND, "Record not found".into()));
    };
    let items = state
        .store
        .list_meal_items(record.id)
        .await
        .map_err(internal)?;

    Ok(Json(RecordDetails { record, items }))
}

/// POST /records
/// Doses the meal from the submitted items and glucose parameters and appends
/// a new record; Location points at the day-and-slot lookup for it.
#[instrument(skip(state, body))]
async fn create_record(
    State(state): State<AppState>,
    Json(body): Json<SaveMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<SavedMealResponse>), (StatusCode, String)> {
    let record = match save_meal(state.store.as_ref(), body).await {
        Ok(record) => record,
        Err(SaveMealError::Store(e)) => {
            error!(error = %e, "save meal failed");
            return Err(internal(e));
        }
        Err(e) => {
            warn!(error = %e, "meal request rejected");
            return Err((StatusCode::BAD_REQUEST, e.to_string()));
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::LOCATION,
        format!(
            "/api/v1/records/{}/{}",
            format_iso_date(record.meal_date),
            record.slot
        )
        .parse()
        .unwrap(),
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(SavedMealResponse::from(record)),
    ))
}

/// PUT /records/:date/:slot/post-glucose
/// Overwrites the post-meal reading on the newest record for the key and
/// returns the ratio recommendation, null when none is defined.
#[instrument(skip(state, body))]
async fn put_post_glucose(
    State(state): State<AppState>,
    Path((date, slot)): Path<(String, MealSlot)>,
    Json(body): Json<PostGlucoseRequest>,
) -> Result<Json<PostGlucoseResponse>, (StatusCode, String)> {
    let date = parse_iso_date(&date).map_err(bad_date)?;

    match record_post_meal(state.store.as_ref(), date, slot, body.post_meal_glucose).await {
        Ok(outcome) => Ok(Json(PostGlucoseResponse {
            date,
            slot,
            post_meal_glucose: outcome.post_meal_glucose,
            recommended_ratio: outcome.recommended_ratio,
        })),
        Err(PostMealError::RecordNotFound { .. }) => {
            Err((StatusCode::NOT_FOUND, "Record not found".into()))
        }
        Err(e @ PostMealError::NegativeGlucose) => {
            warn!(error = %e, "post-glucose request rejected");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(PostMealError::Store(e)) => {
            error!(error = %e, %date, %slot, "post-glucose update failed");
            Err(internal(e))
        }
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn bad_date(_: time::error::Parse) -> (StatusCode, String) {
    (
        StatusCode::BAD_REQUEST,
        "date must look like 2025-12-08".into(),
    )
}
