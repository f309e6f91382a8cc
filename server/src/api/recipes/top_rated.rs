use crate::api::recipes::{store_error_response, RecipeSummaryResponse};
use crate::api::ErrorResponse;
use crate::get_conn;
use crate::store;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TopRatedParams {
    /// Number of recipes to return (default: 10, clamped to 1..=50)
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/top-rated",
    tag = "recipes",
    params(TopRatedParams),
    responses(
        (status = 200, description = "Recipes ordered by mean rating descending", body = Vec<RecipeSummaryResponse>),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn top_rated_recipes(
    State(state): State<AppState>,
    Query(params): Query<TopRatedParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let mut conn = get_conn!(state.pool);

    match store::top_rated(&mut conn, limit) {
        Ok(rows) => {
            let items: Vec<RecipeSummaryResponse> = rows
                .into_iter()
                .map(|(recipe, rating)| RecipeSummaryResponse::from_row(recipe, rating))
                .collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => store_error_response(e, "load top rated recipes"),
    }
}
