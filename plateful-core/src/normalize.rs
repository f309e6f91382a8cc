//! Cleanup pass between the raw model output and strict validation.
//!
//! A model's literal output needs defensive cleanup before the closed-schema
//! rules run: "required vs optional" differs between loosely-typed JSON and
//! the internal schema, so present-but-empty optional text must collapse to
//! absent or the optionality checks misfire.

use crate::types::RecipeDetails;

/// Normalize a candidate aggregate in place:
/// - trim all text fields
/// - collapse empty-after-trim optional text to `None`
/// - pass arrays and sort orders through structurally unchanged
pub fn normalize(mut details: RecipeDetails) -> RecipeDetails {
    details.title = details.title.trim().to_string();
    details.description = collapse(details.description);
    details.hero_image = collapse(details.hero_image);

    for group in &mut details.ingredient_groups {
        group.name = collapse(group.name.take());
        for ingredient in &mut group.ingredients {
            ingredient.description = ingredient.description.trim().to_string();
        }
    }

    for step in &mut details.steps {
        step.description = step.description.trim().to_string();
    }

    details
}

/// Trim, mapping empty-after-trim to absent.
fn collapse(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ingredient, IngredientGroup, RecipeStep};

    #[test]
    fn collapses_empty_optional_text_to_absent() {
        let details = RecipeDetails {
            title: "  Pho  ".to_string(),
            description: Some("   ".to_string()),
            servings: None,
            time: None,
            hero_image: Some("".to_string()),
            ingredient_groups: vec![IngredientGroup {
                name: Some("  ".to_string()),
                sort_order: Some(0),
                ingredients: vec![Ingredient {
                    description: " 1 onion ".to_string(),
                }],
            }],
            steps: vec![RecipeStep {
                description: " Simmer the broth. ".to_string(),
                sort_order: Some(0),
            }],
        };

        let normalized = normalize(details);
        assert_eq!(normalized.title, "Pho");
        assert_eq!(normalized.description, None);
        assert_eq!(normalized.hero_image, None);
        assert_eq!(normalized.ingredient_groups[0].name, None);
        assert_eq!(normalized.ingredient_groups[0].ingredients[0].description, "1 onion");
        assert_eq!(normalized.steps[0].description, "Simmer the broth.");
    }

    #[test]
    fn sort_orders_pass_through_verbatim() {
        let details = RecipeDetails {
            title: "Toast".to_string(),
            description: None,
            servings: None,
            time: None,
            hero_image: None,
            ingredient_groups: vec![IngredientGroup {
                name: None,
                sort_order: Some(7),
                ingredients: vec![Ingredient {
                    description: "bread".to_string(),
                }],
            }],
            steps: vec![RecipeStep {
                description: "Toast it.".to_string(),
                sort_order: None,
            }],
        };

        let normalized = normalize(details);
        assert_eq!(normalized.ingredient_groups[0].sort_order, Some(7));
        assert_eq!(normalized.steps[0].sort_order, None);
    }

    #[test]
    fn non_empty_text_is_kept() {
        let details = RecipeDetails {
            title: "Stew".to_string(),
            description: Some(" hearty ".to_string()),
            servings: Some(4),
            time: Some(120),
            hero_image: Some("https://example.com/stew.jpg".to_string()),
            ingredient_groups: vec![IngredientGroup {
                name: Some(" Base ".to_string()),
                sort_order: Some(0),
                ingredients: vec![Ingredient {
                    description: "beef".to_string(),
                }],
            }],
            steps: vec![RecipeStep {
                description: "Brown the beef.".to_string(),
                sort_order: Some(0),
            }],
        };

        let normalized = normalize(details);
        assert_eq!(normalized.description.as_deref(), Some("hearty"));
        assert_eq!(normalized.hero_image.as_deref(), Some("https://example.com/stew.jpg"));
        assert_eq!(normalized.ingredient_groups[0].name.as_deref(), Some("Base"));
    }
}
