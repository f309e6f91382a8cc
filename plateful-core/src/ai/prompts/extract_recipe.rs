//! Prompt and output contract for extracting a recipe from a photo.

use serde_json::{json, Value};

pub const EXTRACT_RECIPE_PROMPT_NAME: &str = "extract_recipe";

pub fn render_extract_recipe_prompt() -> String {
    r#"You are a recipe extraction assistant. You are given a photo of a recipe from a cookbook, a printed page, or a handwritten card.

Extract the complete recipe and decompose it as follows:
- title: the recipe title
- description: a brief description if one is present, otherwise null
- servings: number of servings as an integer if present, otherwise null
- time: total time in minutes as an integer if present, otherwise null
- ingredient_groups: the ingredients, grouped the way the recipe groups them (e.g. "Cake Batter", "Frosting"). If the recipe does not group its ingredients, use a single group named "Ingredients". Each ingredient is one free-text line with quantity and unit embedded, exactly as written.
- steps: the preparation steps in order, one entry per step.

Rules:
- Extract text EXACTLY as written - do not paraphrase or modify
- Number sort_order from 0 in the order items appear
- If information is not present in the photo, use null for that field"#
        .to_string()
}

/// JSON Schema the service is constrained to. Matches the closed aggregate
/// shape, so contract enforcement stays local and deterministic.
pub fn extract_recipe_schema() -> Value {
    let ingredient = json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["description"],
        "properties": {
            "description": { "type": "string" }
        }
    });

    let ingredient_group = json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["name", "sort_order", "ingredients"],
        "properties": {
            "name": { "type": ["string", "null"] },
            "sort_order": { "type": "integer", "minimum": 0 },
            "ingredients": { "type": "array", "items": ingredient, "minItems": 1 }
        }
    });

    let step = json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["description", "sort_order"],
        "properties": {
            "description": { "type": "string" },
            "sort_order": { "type": "integer", "minimum": 0 }
        }
    });

    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["title", "description", "servings", "time", "ingredient_groups", "steps"],
        "properties": {
            "title": { "type": "string" },
            "description": { "type": ["string", "null"] },
            "servings": { "type": ["integer", "null"], "minimum": 1 },
            "time": { "type": ["integer", "null"], "minimum": 0 },
            "ingredient_groups": { "type": "array", "items": ingredient_group, "minItems": 1 },
            "steps": { "type": "array", "items": step, "minItems": 1 }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_closed_at_every_level() {
        let schema = extract_recipe_schema();
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(
            schema["properties"]["ingredient_groups"]["items"]["additionalProperties"],
            false
        );
        assert_eq!(schema["properties"]["steps"]["items"]["additionalProperties"], false);
    }

    #[test]
    fn schema_requires_groups_and_steps() {
        let schema = extract_recipe_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"ingredient_groups"));
        assert!(required.contains(&"steps"));
    }
}
