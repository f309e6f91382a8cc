use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use plateful_core::ai::VisionError;
use plateful_core::types::RecipeDetails;
use plateful_core::ParseImageError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ParseImageRequest {
    /// Durable URL of a previously-uploaded recipe photo
    pub image_url: String,
}

/// The extracted aggregate in insert shape, with `hero_image` forced to the
/// analyzed image. Nothing is persisted; the client reviews and then calls
/// the with-details endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParsedRecipeResponse {
    pub title: String,
    pub description: Option<String>,
    pub servings: Option<i32>,
    pub time: Option<i32>,
    pub hero_image: Option<String>,
    pub ingredient_groups: Vec<ParsedIngredientGroup>,
    pub steps: Vec<ParsedStep>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParsedIngredientGroup {
    pub name: Option<String>,
    pub sort_order: i32,
    pub ingredients: Vec<ParsedIngredient>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParsedIngredient {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParsedStep {
    pub description: String,
    pub sort_order: i32,
}

impl From<RecipeDetails> for ParsedRecipeResponse {
    fn from(details: RecipeDetails) -> Self {
        Self {
            title: details.title,
            description: details.description,
            servings: details.servings,
            time: details.time,
            hero_image: details.hero_image,
            ingredient_groups: details
                .ingredient_groups
                .into_iter()
                .enumerate()
                .map(|(i, g)| ParsedIngredientGroup {
                    name: g.name,
                    sort_order: g.sort_order.unwrap_or(i as i32),
                    ingredients: g
                        .ingredients
                        .into_iter()
                        .map(|ing| ParsedIngredient {
                            description: ing.description,
                        })
                        .collect(),
                })
                .collect(),
            steps: details
                .steps
                .into_iter()
                .enumerate()
                .map(|(i, s)| ParsedStep {
                    description: s.description,
                    sort_order: s.sort_order.unwrap_or(i as i32),
                })
                .collect(),
        }
    }
}

fn error_response(err: ParseImageError) -> Response {
    let (status, message) = match err {
        ParseImageError::BadInput(message) => (StatusCode::BAD_REQUEST, message),
        ParseImageError::Vision(VisionError::Config(message)) => {
            tracing::error!("Vision service misconfigured: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Recipe extraction is not configured".to_string(),
            )
        }
        ParseImageError::Vision(VisionError::BadInput(message)) => {
            (StatusCode::BAD_REQUEST, message)
        }
        ParseImageError::Vision(VisionError::RateLimited { .. }) => (
            StatusCode::TOO_MANY_REQUESTS,
            "The extraction service is rate limited, try again shortly".to_string(),
        ),
        ParseImageError::Vision(VisionError::Upstream(message)) => {
            tracing::error!("Vision extraction failed: {}", message);
            (
                StatusCode::BAD_GATEWAY,
                "Recipe extraction failed, try again".to_string(),
            )
        }
        ParseImageError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            format!("Extracted recipe failed validation: {}", e),
        ),
    };

    (status, Json(ErrorResponse { error: message })).into_response()
}

#[utoipa::path(
    post,
    path = "/api/recipes/parse-image",
    tag = "recipes",
    request_body = ParseImageRequest,
    responses(
        (status = 200, description = "Extracted recipe aggregate (not persisted)", body = ParsedRecipeResponse),
        (status = 400, description = "Bad image reference or extraction failed validation", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 429, description = "Extraction service rate limited", body = ErrorResponse),
        (status = 502, description = "Extraction service failed", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn parse_image(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<ParseImageRequest>,
) -> impl IntoResponse {
    let Some(vision) = state.vision.clone() else {
        tracing::error!("Recipe extraction requested but no vision client is configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Recipe extraction is not configured".to_string(),
            }),
        )
            .into_response();
    };

    match plateful_core::parse_image(vision.as_ref(), &request.image_url).await {
        Ok(details) => (StatusCode::OK, Json(ParsedRecipeResponse::from(details))).into_response(),
        Err(e) => error_response(e),
    }
}
