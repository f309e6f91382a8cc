//! The recipe ingestion orchestrator.
//!
//! `parse_image` turns an uploaded image URL into a validated recipe
//! aggregate: vision extraction, normalization, strict validation, then the
//! analyzed image becomes the recipe's photo. Persistence is a separate,
//! explicit call made by the caller once the extracted data has been
//! reviewed.

use thiserror::Error;

use crate::ai::{ImageSource, VisionClient, VisionError};
use crate::normalize::normalize;
use crate::types::RecipeDetails;
use crate::validate::{candidate_from_value, validate_insert, ValidationError};

#[derive(Debug, Error)]
pub enum ParseImageError {
    /// Caller-supplied image reference was missing or empty.
    #[error("{0}")]
    BadInput(String),

    /// The vision service call failed; carries its own taxonomy.
    #[error(transparent)]
    Vision(#[from] VisionError),

    /// Normalized extraction failed the closed schema. Names the mismatch,
    /// never the raw model output.
    #[error("Extracted recipe failed validation: {0}")]
    Validation(#[from] ValidationError),
}

/// Extract, normalize and validate a recipe from an image URL.
///
/// On success the returned aggregate has every sort order populated (input
/// array order where the extraction omitted one) and `hero_image` forced to
/// `image_url` regardless of what the model returned.
pub async fn parse_image(
    client: &dyn VisionClient,
    image_url: &str,
) -> Result<RecipeDetails, ParseImageError> {
    if image_url.trim().is_empty() {
        return Err(ParseImageError::BadInput(
            "An image URL is required".to_string(),
        ));
    }

    let raw = client
        .extract(&ImageSource::Url(image_url.to_string()))
        .await?;

    let candidate = candidate_from_value(raw)?;
    let mut details = normalize(candidate);
    validate_insert(&details)?;

    details.assign_default_sort_orders();
    details.hero_image = Some(image_url.to_string());

    tracing::debug!(
        model = client.model_name(),
        groups = details.ingredient_groups.len(),
        steps = details.steps.len(),
        "parsed recipe from image"
    );

    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeVisionClient;
    use serde_json::json;

    fn extraction_response() -> serde_json::Value {
        json!({
            "title": "  Shakshuka ",
            "description": "",
            "servings": 4,
            "time": 35,
            "ingredient_groups": [
                {
                    "name": "Sauce",
                    "sort_order": 0,
                    "ingredients": [
                        { "description": "1 can crushed tomatoes" },
                        { "description": "1 onion, diced" }
                    ]
                },
                {
                    "name": "To finish",
                    "sort_order": 1,
                    "ingredients": [
                        { "description": "4 eggs" }
                    ]
                }
            ],
            "steps": [
                { "description": "Soften the onion.", "sort_order": 0 },
                { "description": "Add tomatoes and simmer.", "sort_order": 1 },
                { "description": "Crack in the eggs and cover.", "sort_order": 2 }
            ]
        })
    }

    #[tokio::test]
    async fn happy_path_normalizes_and_forces_hero_image() {
        let client = FakeVisionClient::with_response(extraction_response());

        let details = parse_image(&client, "https://img.example.com/shakshuka.jpg")
            .await
            .unwrap();

        assert_eq!(details.title, "Shakshuka");
        // empty description collapsed to absent
        assert_eq!(details.description, None);
        // the analyzed image becomes the recipe's photo
        assert_eq!(
            details.hero_image.as_deref(),
            Some("https://img.example.com/shakshuka.jpg")
        );
        assert_eq!(details.ingredient_groups.len(), 2);
        assert_eq!(details.steps.len(), 3);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn empty_image_url_fails_without_a_network_call() {
        let client = FakeVisionClient::with_response(extraction_response());

        let err = parse_image(&client, "").await.unwrap_err();

        assert!(matches!(err, ParseImageError::BadInput(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn response_missing_steps_surfaces_a_validation_error() {
        let client = FakeVisionClient::with_response(json!({
            "title": "Mystery dish",
            "ingredient_groups": [
                {
                    "name": null,
                    "sort_order": 0,
                    "ingredients": [{ "description": "something" }]
                }
            ]
        }));

        let err = parse_image(&client, "https://img.example.com/x.jpg")
            .await
            .unwrap_err();

        match err {
            ParseImageError::Validation(e) => assert!(e.to_string().contains("steps")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn omitted_sort_orders_get_array_index_defaults() {
        let client = FakeVisionClient::with_response(json!({
            "title": "Flatbread",
            "ingredient_groups": [
                { "ingredients": [{ "description": "flour" }] },
                { "ingredients": [{ "description": "yogurt" }] }
            ],
            "steps": [
                { "description": "Mix." },
                { "description": "Rest and roll." }
            ]
        }));

        let details = parse_image(&client, "https://img.example.com/bread.jpg")
            .await
            .unwrap();

        assert_eq!(details.ingredient_groups[0].sort_order, Some(0));
        assert_eq!(details.ingredient_groups[1].sort_order, Some(1));
        assert_eq!(details.steps[0].sort_order, Some(0));
        assert_eq!(details.steps[1].sort_order, Some(1));
    }

    #[tokio::test]
    async fn upstream_failure_passes_through_with_its_kind() {
        let client = FakeVisionClient::failing("model exploded");

        let err = parse_image(&client, "https://img.example.com/x.jpg")
            .await
            .unwrap_err();

        match err {
            ParseImageError::Vision(VisionError::Upstream(message)) => {
                assert!(message.contains("model exploded"));
            }
            other => panic!("expected upstream VisionError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn model_supplied_hero_image_is_overwritten() {
        let mut response = extraction_response();
        response["hero_image"] = json!("https://model-invented.example.com/wrong.jpg");
        let client = FakeVisionClient::with_response(response);

        let details = parse_image(&client, "https://img.example.com/real.jpg")
            .await
            .unwrap();

        assert_eq!(
            details.hero_image.as_deref(),
            Some("https://img.example.com/real.jpg")
        );
    }
}
