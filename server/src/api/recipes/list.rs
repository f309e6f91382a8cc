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
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: 20, clamped to 1..=100)
    pub page_size: Option<i64>,
    /// Case-insensitive substring match against the title
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub items: Vec<RecipeSummaryResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Paginated recipe list", body = ListRecipesResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut conn = get_conn!(state.pool);

    match store::list(&mut conn, page, page_size, search) {
        Ok((rows, total)) => {
            let items = rows
                .into_iter()
                .map(|(recipe, rating)| RecipeSummaryResponse::from_row(recipe, rating))
                .collect();
            (
                StatusCode::OK,
                Json(ListRecipesResponse {
                    items,
                    total,
                    page,
                    page_size,
                }),
            )
                .into_response()
        }
        Err(e) => store_error_response(e, "list recipes"),
    }
}
