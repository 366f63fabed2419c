//! Client-side recipe search.
//!
//! Each predicate is optional and the present ones are combined with
//! logical AND. They are applied in a fixed order (name, category,
//! ingredient) so results are deterministic, although the order has no
//! effect on which recipes survive.

use crate::model::Recipe;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    name: Option<String>,
    category: Option<String>,
    ingredient: Option<String>,
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring of the recipe name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = present(name.into());
        self
    }

    /// Exact category membership
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = present(category.into());
        self
    }

    /// Case-insensitive substring of any ingredient
    pub fn ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredient = present(ingredient.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.ingredient.is_none()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_name(recipe) && self.matches_category(recipe) && self.matches_ingredient(recipe)
    }

    /// Recipes from `items` that satisfy every present predicate, in their
    /// original order
    pub fn apply<'a, I>(&self, items: I) -> Vec<Recipe>
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        items
            .into_iter()
            .filter(|r| self.matches_name(r))
            .filter(|r| self.matches_category(r))
            .filter(|r| self.matches_ingredient(r))
            .cloned()
            .collect()
    }

    fn matches_name(&self, recipe: &Recipe) -> bool {
        match &self.name {
            Some(needle) => contains_ignore_case(&recipe.name, needle),
            None => true,
        }
    }

    fn matches_category(&self, recipe: &Recipe) -> bool {
        match &self.category {
            Some(category) => recipe.in_category(category),
            None => true,
        }
    }

    fn matches_ingredient(&self, recipe: &Recipe) -> bool {
        match &self.ingredient {
            Some(needle) => recipe
                .ingredients
                .iter()
                .any(|ing| contains_ignore_case(ing, needle)),
            None => true,
        }
    }
}

// An empty input box means "no filter".
fn present(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
