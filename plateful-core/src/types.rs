use serde::{Deserialize, Serialize};

/// A recipe together with its full set of ingredient groups and steps,
/// treated as one unit for create/update.
///
/// The schema is closed: unknown keys fail deserialization so that drift in
/// the extraction contract surfaces as a validation error instead of being
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeDetails {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of servings, at least 1 when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<i32>,
    /// Total time in minutes, 0 allowed (no-cook recipes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    pub ingredient_groups: Vec<IngredientGroup>,
    pub steps: Vec<RecipeStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngredientGroup {
    /// Display name, e.g. "Cake Batter" or "Frosting". Absent for the
    /// default group of an ungrouped recipe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Position within the recipe. When absent the caller's array order is
    /// used, assigned by the orchestrator or the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    pub ingredients: Vec<Ingredient>,
}

/// A single ingredient line. Quantity and unit are embedded in the text
/// ("2 cups flour, sifted"), not separate fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ingredient {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeStep {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl RecipeDetails {
    /// Fill in missing sort orders with the array index, preserving input
    /// order. Explicit values pass through untouched.
    pub fn assign_default_sort_orders(&mut self) {
        for (i, group) in self.ingredient_groups.iter_mut().enumerate() {
            if group.sort_order.is_none() {
                group.sort_order = Some(i as i32);
            }
        }
        for (i, step) in self.steps.iter_mut().enumerate() {
            if step.sort_order.is_none() {
                step.sort_order = Some(i as i32);
            }
        }
    }
}
