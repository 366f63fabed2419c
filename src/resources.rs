//! Typed endpoints of the recipe backend.

use async_trait::async_trait;
use serde_json::Value;
use urlencoding::encode;

use crate::client::ApiClient;
use crate::error::Result;
use crate::filter::RecipeFilter;
use crate::list::{Keyed, ListController, ListSource, MutationPolicy};
use crate::model::{Category, NewCategory, Recipe, Subrecipe};

impl Keyed for Recipe {
    fn key(&self) -> &str {
        self.id.as_ref().map(|id| id.as_str()).unwrap_or_default()
    }
}

impl Keyed for Category {
    fn key(&self) -> &str {
        self.name()
    }
}

impl Keyed for Subrecipe {
    fn key(&self) -> &str {
        &self.name
    }
}

fn item_path(collection: &str, key: &str) -> String {
    format!("/{}/{}", collection, encode(key))
}

/// `/recipes`
#[derive(Debug, Clone)]
pub struct RecipeResource {
    client: ApiClient,
}

impl RecipeResource {
    pub fn new(client: ApiClient) -> Self {
        RecipeResource { client }
    }

    pub async fn get(&self, id: &str) -> Result<Recipe> {
        self.client.fetch_json(&item_path("recipes", id)).await
    }
}

#[async_trait]
impl ListSource for RecipeResource {
    type Item = Recipe;

    fn noun(&self) -> &str {
        "recipe"
    }

    async fn list(&self) -> Result<Vec<Recipe>> {
        self.client.fetch_json("/recipes").await
    }

    async fn create(&self, recipe: &Recipe) -> Result<Recipe> {
        let body = Recipe {
            id: None,
            ..recipe.sanitized()
        };
        self.client.create_json("/recipes", &body).await
    }

    async fn replace(&self, id: &str, recipe: &Recipe) -> Result<Recipe> {
        self.client
            .replace_json(&item_path("recipes", id), &recipe.sanitized())
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete_json::<Value>(&item_path("recipes", id))
            .await?;
        Ok(())
    }
}

/// `/categories`. The server only confirms writes, so the confirmed item
/// is the one that was sent.
#[derive(Debug, Clone)]
pub struct CategoryResource {
    client: ApiClient,
}

impl CategoryResource {
    pub fn new(client: ApiClient) -> Self {
        CategoryResource { client }
    }
}

#[async_trait]
impl ListSource for CategoryResource {
    type Item = Category;

    fn noun(&self) -> &str {
        "category"
    }

    async fn list(&self) -> Result<Vec<Category>> {
        self.client.fetch_json("/categories").await
    }

    async fn create(&self, category: &Category) -> Result<Category> {
        self.client
            .create_json::<Value, _>(
                "/categories",
                &NewCategory {
                    name: category.name(),
                },
            )
            .await?;
        Ok(category.clone())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.client
            .delete_json::<Value>(&item_path("categories", name))
            .await?;
        Ok(())
    }
}

/// `/subrecipes`. Writes are followed by a reload since a rename changes
/// the key.
#[derive(Debug, Clone)]
pub struct SubrecipeResource {
    client: ApiClient,
}

impl SubrecipeResource {
    pub fn new(client: ApiClient) -> Self {
        SubrecipeResource { client }
    }
}

#[async_trait]
impl ListSource for SubrecipeResource {
    type Item = Subrecipe;

    fn noun(&self) -> &str {
        "subrecipe"
    }

    fn policy(&self) -> MutationPolicy {
        MutationPolicy::Refetch
    }

    async fn list(&self) -> Result<Vec<Subrecipe>> {
        self.client.fetch_json("/subrecipes").await
    }

    async fn create(&self, subrecipe: &Subrecipe) -> Result<Subrecipe> {
        self.client
            .create_json("/subrecipes", &subrecipe.sanitized())
            .await
    }

    async fn replace(&self, name: &str, subrecipe: &Subrecipe) -> Result<Subrecipe> {
        self.client
            .replace_json(&item_path("subrecipes", name), &subrecipe.sanitized())
            .await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.client
            .delete_json::<Value>(&item_path("subrecipes", name))
            .await?;
        Ok(())
    }
}

pub type RecipeList = ListController<RecipeResource>;
pub type CategoryList = ListController<CategoryResource>;
pub type SubrecipeList = ListController<SubrecipeResource>;

impl ListController<RecipeResource> {
    /// Held recipes matching `filter`
    pub fn filtered(&self, filter: &RecipeFilter) -> Vec<Recipe> {
        filter.apply(self.items())
    }
}
