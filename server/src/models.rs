use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub servings: Option<i32>,
    pub time_minutes: Option<i32>,
    pub hero_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub servings: Option<i32>,
    pub time_minutes: Option<i32>,
    pub hero_image: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ingredient_groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct IngredientGroupRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub name: Option<String>,
    pub sort_order: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredient_groups)]
pub struct NewIngredientGroup<'a> {
    pub recipe_id: Uuid,
    pub name: Option<&'a str>,
    pub sort_order: i32,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct IngredientRow {
    pub id: Uuid,
    pub group_id: Uuid,
    pub description: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub group_id: Uuid,
    pub description: &'a str,
    pub sort_order: i32,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct RecipeStepRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub description: String,
    pub sort_order: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_steps)]
pub struct NewRecipeStep<'a> {
    pub recipe_id: Uuid,
    pub description: &'a str,
    pub sort_order: i32,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct RecipeRating {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ratings)]
pub struct NewRecipeRating {
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
}
