use crate::api::recipes::store_error_response;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::store::{self, RecipeScalars};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateRecipeRequest {
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

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
}

/// Check the flat scalar fields shared by create and update.
pub(super) fn scalar_field_error(
    title: &str,
    servings: Option<i32>,
    time: Option<i32>,
    hero_image: Option<&str>,
) -> Option<String> {
    if title.trim().is_empty() {
        return Some("Title cannot be empty".to_string());
    }
    if let Some(servings) = servings {
        if servings < 1 {
            return Some("Servings must be at least 1".to_string());
        }
    }
    if let Some(time) = time {
        if time < 0 {
            return Some("Time must be 0 or more".to_string());
        }
    }
    if let Some(hero_image) = hero_image {
        if !plateful_core::validate::is_valid_url(hero_image) {
            return Some("Hero image must be a valid URL".to_string());
        }
    }
    None
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeRequest>,
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

    match store::create(&mut conn, user.id, &fields) {
        Ok(recipe) => (
            StatusCode::CREATED,
            Json(CreateRecipeResponse { id: recipe.id }),
        )
            .into_response(),
        Err(e) => store_error_response(e, "create recipe"),
    }
}
