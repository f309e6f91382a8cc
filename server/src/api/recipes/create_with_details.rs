use crate::api::recipes::{store_error_response, RecipeDetailsBody};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::store;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use plateful_core::validate::validate_insert;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeWithDetailsResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/recipes/with-details",
    tag = "recipes",
    request_body = RecipeDetailsBody,
    responses(
        (status = 201, description = "Recipe aggregate created atomically", body = CreateRecipeWithDetailsResponse),
        (status = 400, description = "Aggregate failed validation", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe_with_details(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<RecipeDetailsBody>,
) -> impl IntoResponse {
    let details = body.into_details();

    if let Err(e) = validate_insert(&details) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(state.pool);

    match store::create_with_details(&mut conn, user.id, &details) {
        Ok(recipe) => (
            StatusCode::CREATED,
            Json(CreateRecipeWithDetailsResponse { id: recipe.id }),
        )
            .into_response(),
        Err(e) => store_error_response(e, "create recipe"),
    }
}
