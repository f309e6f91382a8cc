use crate::api::recipes::store_error_response;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::store;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RateRecipeRequest {
    /// Rating value, 1 to 5
    pub rating: i32,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}/rating",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RateRecipeRequest,
    responses(
        (status = 204, description = "Rating recorded"),
        (status = 400, description = "Invalid rating", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn rate_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RateRecipeRequest>,
) -> impl IntoResponse {
    if !(1..=5).contains(&request.rating) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Rating must be between 1 and 5".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(state.pool);

    // One rating per user per recipe; repeat calls overwrite
    match store::set_rating(&mut conn, user.id, id, request.rating) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(e, "rate recipe"),
    }
}
