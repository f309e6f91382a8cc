use crate::api::recipes::{store_error_response, RecipeDetailsBody};
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
use plateful_core::validate::validate_update;
use uuid::Uuid;

#[utoipa::path(
    put,
    path = "/api/recipes/{id}/with-details",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeDetailsBody,
    responses(
        (status = 204, description = "Recipe aggregate replaced atomically"),
        (status = 400, description = "Aggregate failed validation", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe_with_details(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecipeDetailsBody>,
) -> impl IntoResponse {
    let details = body.into_details();

    if let Err(e) = validate_update(&id.to_string(), &details) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(state.pool);

    match store::update_with_details(&mut conn, user.id, id, &details) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(e, "update recipe"),
    }
}
