use log::debug;

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::list::ListSource;
use crate::model::{non_blank, Category, Recipe, RecipeId, Subrecipe};
use crate::resources::{CategoryResource, RecipeResource, SubrecipeResource};

/// Ordered text rows edited one at a time.
///
/// There is always at least one row; the last remaining row cannot be
/// removed, only cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableRows {
    rows: Vec<String>,
}

impl Default for EditableRows {
    fn default() -> Self {
        EditableRows {
            rows: vec![String::new()],
        }
    }
}

impl EditableRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing values; an empty list becomes a single blank row
    pub fn from_values(values: Vec<String>) -> Self {
        if values.is_empty() {
            Self::default()
        } else {
            EditableRows { rows: values }
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_blank(&mut self) {
        self.rows.push(String::new());
    }

    /// Overwrite row `idx`. Returns `false` if there is no such row.
    pub fn set(&mut self, idx: usize, value: impl Into<String>) -> bool {
        match self.rows.get_mut(idx) {
            Some(row) => {
                *row = value.into();
                true
            }
            None => false,
        }
    }

    /// Drop row `idx`. Refused for the last row and for unknown indexes.
    pub fn remove(&mut self, idx: usize) -> bool {
        if self.rows.len() <= 1 || idx >= self.rows.len() {
            return false;
        }
        self.rows.remove(idx);
        true
    }

    /// Rows as they should be sent, blanks stripped
    pub fn submitted(&self) -> Vec<String> {
        non_blank(&self.rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecipeId),
}

/// State behind the create/edit recipe form
#[derive(Debug, Clone)]
pub struct RecipeForm {
    pub mode: FormMode,
    pub name: String,
    pub categories: Vec<String>,
    pub subrecipes: Vec<String>,
    pub ingredients: EditableRows,
    pub instructions: EditableRows,
    /// Choices offered for `categories`
    pub available_categories: Vec<Category>,
    /// Choices offered for `subrecipes`
    pub available_subrecipes: Vec<Subrecipe>,
}

impl RecipeForm {
    pub fn new(mode: FormMode) -> Self {
        RecipeForm {
            mode,
            name: String::new(),
            categories: Vec::new(),
            subrecipes: Vec::new(),
            ingredients: EditableRows::new(),
            instructions: EditableRows::new(),
            available_categories: Vec::new(),
            available_subrecipes: Vec::new(),
        }
    }

    /// Fetch the selectable categories and subrecipes, and in edit mode the
    /// recipe being edited
    pub async fn load(&mut self, client: &ApiClient) -> Result<()> {
        self.available_categories = CategoryResource::new(client.clone()).list().await?;
        self.available_subrecipes = SubrecipeResource::new(client.clone()).list().await?;

        if let FormMode::Edit(id) = self.mode.clone() {
            let recipe = RecipeResource::new(client.clone()).get(id.as_str()).await?;
            debug!("editing recipe {} ({})", id, recipe.name);
            self.fill_from(recipe);
        }
        Ok(())
    }

    pub fn fill_from(&mut self, recipe: Recipe) {
        self.name = recipe.name;
        self.categories = recipe.categories;
        self.subrecipes = recipe.subrecipes;
        self.ingredients = EditableRows::from_values(recipe.ingredients);
        self.instructions = EditableRows::from_values(recipe.instructions);
    }

    /// The body that will be submitted
    pub fn to_recipe(&self) -> Result<Recipe> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation(
                "recipe name cannot be empty".to_string(),
            ));
        }

        Ok(Recipe {
            id: None,
            name: self.name.clone(),
            ingredients: self.ingredients.submitted(),
            instructions: self.instructions.submitted(),
            categories: self.categories.clone(),
            subrecipes: self.subrecipes.clone(),
        })
    }

    /// POST a new recipe or PUT over the edited one
    pub async fn submit(&self, client: &ApiClient) -> Result<Recipe> {
        let recipe = self.to_recipe()?;
        let resource = RecipeResource::new(client.clone());
        match &self.mode {
            FormMode::Create => resource.create(&recipe).await,
            FormMode::Edit(id) => resource.replace(id.as_str(), &recipe).await,
        }
    }
}

/// State behind the subrecipe create/edit form
#[derive(Debug, Clone, Default)]
pub struct SubrecipeForm {
    pub name: String,
    pub ingredients: EditableRows,
    /// Name the subrecipe had when editing started
    original_name: Option<String>,
}

impl SubrecipeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(subrecipe: &Subrecipe) -> Self {
        SubrecipeForm {
            name: subrecipe.name.clone(),
            ingredients: EditableRows::from_values(subrecipe.ingredients.clone()),
            original_name: Some(subrecipe.name.clone()),
        }
    }

    /// Key to update under, `None` when creating
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn to_subrecipe(&self) -> Result<Subrecipe> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation(
                "subrecipe name cannot be empty".to_string(),
            ));
        }

        Ok(Subrecipe {
            name: self.name.clone(),
            ingredients: self.ingredients.submitted(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_start_with_one_blank() {
        let rows = EditableRows::new();
        assert_eq!(rows.rows(), &[String::new()]);
        assert!(rows.submitted().is_empty());
    }

    #[test]
    fn test_last_row_cannot_be_removed() {
        let mut rows = EditableRows::new();
        assert!(!rows.remove(0));
        rows.push_blank();
        assert!(rows.remove(0));
        assert_eq!(rows.len(), 1);
        assert!(!rows.remove(5));
    }

    #[test]
    fn test_set_and_submit() {
        let mut rows = EditableRows::new();
        rows.set(0, "a");
        rows.push_blank();
        rows.push_blank();
        rows.set(2, "  ");
        rows.push_blank();
        rows.set(3, "b");
        assert!(!rows.set(9, "nope"));

        assert_eq!(rows.rows(), &["a", "", "  ", "b"]);
        assert_eq!(rows.submitted(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut rows = EditableRows::from_values(vec!["a".into(), "b".into(), "c".into()]);
        rows.remove(1);
        assert_eq!(rows.rows(), &["a", "c"]);
    }

    #[test]
    fn test_form_strips_blank_rows() {
        let mut form = RecipeForm::new(FormMode::Create);
        form.name = "Soup".into();
        form.ingredients = EditableRows::from_values(vec!["a".into(), "".into(), "  ".into(), "b".into()]);
        form.categories = vec!["dinner".into()];

        let recipe = form.to_recipe().unwrap();
        assert_eq!(recipe.ingredients, vec!["a", "b"]);
        assert!(recipe.instructions.is_empty());
        assert!(recipe.id.is_none());
    }

    #[test]
    fn test_form_requires_a_name() {
        let mut form = RecipeForm::new(FormMode::Create);
        form.name = "   ".into();
        assert!(matches!(form.to_recipe(), Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_fill_from_keeps_one_editable_row() {
        let mut form = RecipeForm::new(FormMode::Edit(RecipeId::new("1")));
        form.fill_from(Recipe {
            ingredients: vec!["salt".into()],
            ..Recipe::new("Soup")
        });
        assert_eq!(form.ingredients.rows(), &["salt"]);
        assert_eq!(form.instructions.rows(), &[""]);
    }

    #[test]
    fn test_subrecipe_form_from_existing() {
        let existing = Subrecipe {
            name: "Roux".into(),
            ingredients: vec!["butter".into(), "flour".into()],
        };
        let mut form = SubrecipeForm::from_existing(&existing);
        form.name = "Dark roux".into();
        form.ingredients.push_blank();

        assert_eq!(form.original_name(), Some("Roux"));
        let sub = form.to_subrecipe().unwrap();
        assert_eq!(sub.name, "Dark roux");
        assert_eq!(sub.ingredients, vec!["butter", "flour"]);
        assert!(SubrecipeForm::new().to_subrecipe().is_err());
    }
}
