pub mod create;
pub mod create_with_details;
pub mod delete;
pub mod get;
pub mod list;
pub mod parse_image;
pub mod rate;
pub mod top_rated;
pub mod update;
pub mod update_with_details;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use plateful_core::types::{self as core_types, RecipeDetails};

use crate::api::ErrorResponse;
use crate::models::Recipe;
use crate::store::{RecipeWithDetails, StoreError};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes",
            get(list::list_recipes).post(create::create_recipe),
        )
        .route("/api/recipes/top-rated", get(top_rated::top_rated_recipes))
        .route("/api/recipes/parse-image", post(parse_image::parse_image))
        .route(
            "/api/recipes/with-details",
            post(create_with_details::create_recipe_with_details),
        )
        .route(
            "/api/recipes/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/api/recipes/{id}/with-details",
            put(update_with_details::update_recipe_with_details),
        )
        .route("/api/recipes/{id}/rating", put(rate::rate_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        top_rated::top_rated_recipes,
        get::get_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        create_with_details::create_recipe_with_details,
        update_with_details::update_recipe_with_details,
        rate::rate_recipe,
        parse_image::parse_image,
    ),
    components(schemas(
        RecipeSummaryResponse,
        RecipeDetailsResponse,
        IngredientGroupResponse,
        IngredientResponse,
        RecipeStepResponse,
        RecipeDetailsBody,
        IngredientGroupBody,
        IngredientBody,
        RecipeStepBody,
        list::ListRecipesResponse,
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        create_with_details::CreateRecipeWithDetailsResponse,
        update::UpdateRecipeRequest,
        rate::RateRecipeRequest,
        parse_image::ParseImageRequest,
        parse_image::ParsedRecipeResponse,
        parse_image::ParsedIngredientGroup,
        parse_image::ParsedIngredient,
        parse_image::ParsedStep,
    ))
)]
pub struct ApiDoc;

/// Map a store failure to an HTTP response. Database errors are logged and
/// reported generically; not-found keeps one message for "absent" and "not
/// yours".
pub(crate) fn store_error_response(err: StoreError, context: &str) -> Response {
    match err {
        StoreError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response(),
        StoreError::Database(e) => {
            tracing::error!("Failed to {}: {}", context, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to {}", context),
                }),
            )
                .into_response()
        }
    }
}

/// Recipe aggregate payload for the with-details endpoints. Closed: unknown
/// keys are rejected rather than silently dropped.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RecipeDetailsBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub time: Option<i32>,
    #[serde(default)]
    pub hero_image: Option<String>,
    pub ingredient_groups: Vec<IngredientGroupBody>,
    pub steps: Vec<RecipeStepBody>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct IngredientGroupBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    pub ingredients: Vec<IngredientBody>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct IngredientBody {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RecipeStepBody {
    pub description: String,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

impl RecipeDetailsBody {
    pub fn into_details(self) -> RecipeDetails {
        RecipeDetails {
            title: self.title,
            description: self.description,
            servings: self.servings,
            time: self.time,
            hero_image: self.hero_image,
            ingredient_groups: self
                .ingredient_groups
                .into_iter()
                .map(|g| core_types::IngredientGroup {
                    name: g.name,
                    sort_order: g.sort_order,
                    ingredients: g
                        .ingredients
                        .into_iter()
                        .map(|i| core_types::Ingredient {
                            description: i.description,
                        })
                        .collect(),
                })
                .collect(),
            steps: self
                .steps
                .into_iter()
                .map(|s| core_types::RecipeStep {
                    description: s.description,
                    sort_order: s.sort_order,
                })
                .collect(),
        }
    }
}

/// Recipe scalar fields plus computed mean rating, as returned by list
/// views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub servings: Option<i32>,
    pub time: Option<i32>,
    pub hero_image: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeSummaryResponse {
    pub fn from_row(recipe: Recipe, rating: f64) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            servings: recipe.servings,
            time: recipe.time_minutes,
            hero_image: recipe.hero_image,
            rating,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetailsResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub servings: Option<i32>,
    pub time: Option<i32>,
    pub hero_image: Option<String>,
    pub rating: f64,
    pub ingredient_groups: Vec<IngredientGroupResponse>,
    pub steps: Vec<RecipeStepResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientGroupResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub sort_order: i32,
    pub ingredients: Vec<IngredientResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeStepResponse {
    pub id: Uuid,
    pub description: String,
    pub sort_order: i32,
}

impl From<RecipeWithDetails> for RecipeDetailsResponse {
    fn from(details: RecipeWithDetails) -> Self {
        Self {
            id: details.recipe.id,
            title: details.recipe.title,
            description: details.recipe.description,
            servings: details.recipe.servings,
            time: details.recipe.time_minutes,
            hero_image: details.recipe.hero_image,
            rating: details.rating,
            ingredient_groups: details
                .ingredient_groups
                .into_iter()
                .map(|g| IngredientGroupResponse {
                    id: g.group.id,
                    name: g.group.name,
                    sort_order: g.group.sort_order,
                    ingredients: g
                        .ingredients
                        .into_iter()
                        .map(|i| IngredientResponse {
                            id: i.id,
                            description: i.description,
                        })
                        .collect(),
                })
                .collect(),
            steps: details
                .steps
                .into_iter()
                .map(|s| RecipeStepResponse {
                    id: s.id,
                    description: s.description,
                    sort_order: s.sort_order,
                })
                .collect(),
            created_at: details.recipe.created_at,
            updated_at: details.recipe.updated_at,
        }
    }
}
