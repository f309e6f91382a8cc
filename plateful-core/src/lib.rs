//! Core library for Plateful: the recipe aggregate model, its validation
//! rules, and the AI photo-ingestion pipeline.
//!
//! Nothing in this crate touches a database. The server crate owns
//! persistence; this crate owns the shape of a "recipe with details"
//! aggregate and the procedure that extracts one from a photo.

pub mod ai;
pub mod extract;
pub mod normalize;
pub mod types;
pub mod validate;

pub use extract::{parse_image, ParseImageError};
pub use types::{Ingredient, IngredientGroup, RecipeDetails, RecipeStep};
