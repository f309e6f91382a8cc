//! Validation rules for the recipe-with-details aggregate.
//!
//! The rules mirror the persistence constraints: a non-empty title, at least
//! one ingredient group with at least one ingredient, and at least one step.
//! Violations are collected per field so the caller can surface the most
//! relevant one.

use std::fmt;

use crate::types::RecipeDetails;

/// A single field-level rule failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path to the offending field, e.g. `ingredient_groups[1].ingredients`.
    pub field: String,
    pub message: String,
}

/// Aggregate validation failure. Display names the first violation, which is
/// what API callers see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violations.first() {
            Some(v) => write!(f, "{}: {}", v.field, v.message),
            None => write!(f, "validation failed"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Deserialize a candidate aggregate from raw JSON.
///
/// The aggregate types are closed (`deny_unknown_fields`), so extraneous keys
/// and mistyped values are reported here rather than silently dropped.
pub fn candidate_from_value(value: serde_json::Value) -> Result<RecipeDetails, ValidationError> {
    serde_json::from_value(value)
        .map_err(|e| ValidationError::single("$", format!("Malformed recipe payload: {}", e)))
}

/// Validate an aggregate for insertion (no id).
pub fn validate_insert(details: &RecipeDetails) -> Result<(), ValidationError> {
    let violations = collect_violations(details);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Validate an aggregate for update. Identical to the insert rules plus a
/// required non-empty id.
pub fn validate_update(id: &str, details: &RecipeDetails) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    if id.trim().is_empty() {
        violations.push(Violation {
            field: "id".to_string(),
            message: "ID is required".to_string(),
        });
    }
    violations.extend(collect_violations(details));
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Whether a string parses as an absolute URL.
pub fn is_valid_url(url: &str) -> bool {
    reqwest::Url::parse(url).is_ok()
}

fn collect_violations(details: &RecipeDetails) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut push = |field: String, message: &str| {
        violations.push(Violation {
            field,
            message: message.to_string(),
        });
    };

    if details.title.trim().is_empty() {
        push("title".to_string(), "Title is required");
    }

    if let Some(servings) = details.servings {
        if servings < 1 {
            push("servings".to_string(), "Servings must be at least 1");
        }
    }

    if let Some(time) = details.time {
        if time < 0 {
            push("time".to_string(), "Time must be 0 or more");
        }
    }

    if let Some(ref hero_image) = details.hero_image {
        if !is_valid_url(hero_image) {
            push("hero_image".to_string(), "Hero image must be a valid URL");
        }
    }

    if details.ingredient_groups.is_empty() {
        push(
            "ingredient_groups".to_string(),
            "At least one ingredient group is required",
        );
    }
    for (i, group) in details.ingredient_groups.iter().enumerate() {
        if let Some(sort_order) = group.sort_order {
            if sort_order < 0 {
                push(
                    format!("ingredient_groups[{}].sort_order", i),
                    "Sort order must be 0 or more",
                );
            }
        }
        if group.ingredients.is_empty() {
            push(
                format!("ingredient_groups[{}].ingredients", i),
                "At least one ingredient is required",
            );
        }
        for (j, ingredient) in group.ingredients.iter().enumerate() {
            if ingredient.description.trim().is_empty() {
                push(
                    format!("ingredient_groups[{}].ingredients[{}].description", i, j),
                    "Ingredient description is required",
                );
            }
        }
    }

    if details.steps.is_empty() {
        push("steps".to_string(), "At least one step is required");
    }
    for (i, step) in details.steps.iter().enumerate() {
        if step.description.trim().is_empty() {
            push(
                format!("steps[{}].description", i),
                "Step description is required",
            );
        }
        if let Some(sort_order) = step.sort_order {
            if sort_order < 0 {
                push(
                    format!("steps[{}].sort_order", i),
                    "Sort order must be 0 or more",
                );
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ingredient, IngredientGroup, RecipeStep};
    use serde_json::json;

    fn valid_details() -> RecipeDetails {
        RecipeDetails {
            title: "Lemon Tart".to_string(),
            description: Some("Bright and sharp".to_string()),
            servings: Some(8),
            time: Some(90),
            hero_image: Some("https://example.com/tart.jpg".to_string()),
            ingredient_groups: vec![IngredientGroup {
                name: Some("Crust".to_string()),
                sort_order: Some(0),
                ingredients: vec![Ingredient {
                    description: "200g flour".to_string(),
                }],
            }],
            steps: vec![RecipeStep {
                description: "Blind bake the crust.".to_string(),
                sort_order: Some(0),
            }],
        }
    }

    #[test]
    fn valid_aggregate_passes_unchanged() {
        let details = valid_details();
        assert!(validate_insert(&details).is_ok());
    }

    #[test]
    fn empty_title_fails() {
        let mut details = valid_details();
        details.title = "   ".to_string();
        let err = validate_insert(&details).unwrap_err();
        assert_eq!(err.violations[0].field, "title");
    }

    #[test]
    fn missing_ingredient_groups_fails() {
        let mut details = valid_details();
        details.ingredient_groups.clear();
        let err = validate_insert(&details).unwrap_err();
        assert_eq!(err.violations[0].field, "ingredient_groups");
    }

    #[test]
    fn empty_steps_fails() {
        let mut details = valid_details();
        details.steps.clear();
        let err = validate_insert(&details).unwrap_err();
        assert_eq!(err.violations[0].field, "steps");
        assert!(err.to_string().contains("steps"));
    }

    #[test]
    fn empty_group_ingredients_fails() {
        let mut details = valid_details();
        details.ingredient_groups[0].ingredients.clear();
        let err = validate_insert(&details).unwrap_err();
        assert_eq!(err.violations[0].field, "ingredient_groups[0].ingredients");
    }

    #[test]
    fn zero_servings_fails() {
        let mut details = valid_details();
        details.servings = Some(0);
        assert!(validate_insert(&details).is_err());
    }

    #[test]
    fn zero_time_is_allowed() {
        let mut details = valid_details();
        details.time = Some(0);
        assert!(validate_insert(&details).is_ok());
    }

    #[test]
    fn malformed_hero_image_fails() {
        let mut details = valid_details();
        details.hero_image = Some("not a url".to_string());
        let err = validate_insert(&details).unwrap_err();
        assert_eq!(err.violations[0].field, "hero_image");
    }

    #[test]
    fn negative_sort_order_fails() {
        let mut details = valid_details();
        details.steps[0].sort_order = Some(-1);
        let err = validate_insert(&details).unwrap_err();
        assert_eq!(err.violations[0].field, "steps[0].sort_order");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = candidate_from_value(json!({
            "title": "Soup",
            "ingredient_groups": [],
            "steps": [],
            "cuisine": "French"
        }))
        .unwrap_err();
        assert_eq!(err.violations[0].field, "$");
    }

    #[test]
    fn update_requires_id() {
        let details = valid_details();
        let err = validate_update("", &details).unwrap_err();
        assert_eq!(err.violations[0].field, "id");
        assert!(validate_update("r_123", &details).is_ok());
    }

    #[test]
    fn update_collects_detail_violations_too() {
        let mut details = valid_details();
        details.steps.clear();
        let err = validate_update("", &details).unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "steps"]);
    }
}
