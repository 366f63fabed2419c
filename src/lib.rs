//! Client for a recipe management REST backend.
//!
//! [`ApiClient`] is the JSON facade every other piece goes through.
//! [`ListController`] holds a fetched collection, filters it locally and
//! applies creates, updates and deletes only once the server confirms them.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod insight;
pub mod list;
pub mod model;
pub mod resources;

pub use client::{ApiClient, Method};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use filter::RecipeFilter;
pub use form::{EditableRows, FormMode, RecipeForm, SubrecipeForm};
pub use insight::{nutrition_prompt, NutritionSession};
pub use list::{
    Confirm, Keyed, ListController, ListSource, ListState, LoadTicket, MutationPolicy, Removal,
};
pub use model::{Category, NutritionResult, Recipe, RecipeId, Subrecipe};
pub use resources::{
    CategoryList, CategoryResource, RecipeList, RecipeResource, SubrecipeList, SubrecipeResource,
};

/// Client built from [`ClientConfig::load`]
pub fn client_from_env() -> Result<ApiClient> {
    let config = ClientConfig::load()?;
    ApiClient::from_config(&config)
}

/// Fetch all recipes and keep the ones matching `filter`
pub async fn search_recipes(client: &ApiClient, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
    let recipes: Vec<Recipe> = RecipeResource::new(client.clone()).list().await?;
    Ok(filter.apply(&recipes))
}
