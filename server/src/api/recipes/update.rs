use crate::api::recipes::create::scalar_field_error;
use crate::api::recipes::store_error_response;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::store::{self, RecipeScalars};
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
pub struct UpdateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub time: Option<i32>,
    #[serde(default)]
    pub hero_image: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 204, description = "Recipe updated successfully"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> impl IntoResponse {
    if let Some(message) = scalar_field_error(
        &request.title,
        request.servings,
        request.time,
        request.hero_image.as_deref(),
    ) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    let fields = RecipeScalars {
        title: request.title,
        description: request.description,
        servings: request.servings,
        time: request.time,
        hero_image: request.hero_image,
    };

    let mut conn = get_conn!(state.pool);

    match store::update(&mut conn, user.id, id, &fields) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(e, "update recipe"),
    }
}
