//! AI nutrition estimates for a recipe or free-form text.

use log::{debug, warn};

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::model::Recipe;
use crate::resources::RecipeResource;

/// Render a recipe as the plain-text prompt the nutrition endpoint expects
pub fn nutrition_prompt(recipe: &Recipe) -> String {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|ing| format!("- {}", ing))
        .collect::<Vec<_>>()
        .join("\n");
    let steps = recipe
        .instructions
        .iter()
        .enumerate()
        .map(|(idx, step)| format!("{}. {}", idx + 1, step))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Recipe: {}\nIngredients:\n{}\nSteps:\n{}",
        recipe.name, ingredients, steps
    )
}

/// One analysis round trip: input text, pending flag, result or error
#[derive(Debug, Clone, Default)]
pub struct NutritionSession {
    pub input: String,
    output: Option<String>,
    error: Option<String>,
    pending: bool,
}

impl NutritionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl Into<String>) -> Self {
        NutritionSession {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether an analysis request is in flight
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Analysis is only offered for non-blank input with nothing in flight
    pub fn can_submit(&self) -> bool {
        !self.pending && !self.input.trim().is_empty()
    }

    /// Replace the input with the prompt for recipe `id`
    pub async fn prefill_from_recipe(&mut self, client: &ApiClient, id: &str) -> Result<()> {
        match RecipeResource::new(client.clone()).get(id).await {
            Ok(recipe) => {
                self.input = nutrition_prompt(&recipe);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Send the input for analysis and keep the display text
    pub async fn analyze(&mut self, client: &ApiClient) -> Result<&str> {
        if self.input.trim().is_empty() {
            return Err(ClientError::Validation(
                "nothing to analyze".to_string(),
            ));
        }

        self.pending = true;
        self.output = None;
        self.error = None;
        debug!("requesting nutrition insight ({} chars)", self.input.len());

        let result = client.request_nutritional_insight(&self.input).await;
        self.pending = false;

        match result {
            Ok(answer) => Ok(self.output.insert(answer.display_text()).as_str()),
            Err(e) => {
                warn!("nutrition insight failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
