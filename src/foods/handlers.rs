use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::state::AppState;

use super::catalog::{FoodItem, NewFood};
use super::search::filter_foods;

#[derive(Debug, Deserialize)]
pub struct FoodQuery {
    /// Fuzzy keyword; blank or absent returns the whole catalog.
    pub q: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", delete(delete_food))
}

#[instrument(skip(state))]
async fn list_foods(
    State(state): State<AppState>,
    Query(query): Query<FoodQuery>,
) -> Result<Json<Vec<FoodItem>>, (StatusCode, String)> {
    let foods = state.store.list_foods().await.map_err(internal)?;
    let foods = match query.q.as_deref() {
        Some(keyword) => filter_foods(foods, keyword, state.config.food_match_threshold),
        None => foods,
    };
    Ok(Json(foods))
}

#[instrument(skip(state, body))]
async fn create_food(
    State(state): State<AppState>,
    Json(mut body): Json<NewFood>,
) -> Result<(StatusCode, Json<FoodItem>), (StatusCode, String)> {
    if let Err(e) = body.validate() {
        warn!(error = %e, "food entry rejected");
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }
    let food = state.store.add_food(body).await.map_err(internal)?;
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state))]
async fn delete_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.store.delete_food(id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Food not found".into()))
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
