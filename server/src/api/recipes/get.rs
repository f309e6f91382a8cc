use crate::api::recipes::{store_error_response, RecipeDetailsResponse};
use crate::api::ErrorResponse;
use crate::get_conn;
use crate::store;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Full recipe aggregate", body = RecipeDetailsResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match store::get_one_with_details(&mut conn, id) {
        Ok(details) => {
            (StatusCode::OK, Json(RecipeDetailsResponse::from(details))).into_response()
        }
        Err(e) => store_error_response(e, "fetch recipe"),
    }
}
