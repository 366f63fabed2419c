use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Server-assigned recipe identifier.
///
/// Backends hand these out as strings or integers; both are accepted and
/// kept as text since the client never does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        RecipeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        RecipeId::new(id)
    }
}

impl From<String> for RecipeId {
    fn from(id: String) -> Self {
        RecipeId(id)
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => RecipeId(text),
            RawId::Number(number) => RecipeId(number.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecipeId>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subrecipes: Vec<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Recipe {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Copy of the recipe with blank ingredient and instruction rows removed
    pub fn sanitized(&self) -> Recipe {
        Recipe {
            ingredients: non_blank(&self.ingredients),
            instructions: non_blank(&self.instructions),
            ..self.clone()
        }
    }

    /// Whether the recipe is tagged with `category` (exact match)
    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// A category is just its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Category(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /categories`
#[derive(Debug, Serialize)]
pub struct NewCategory<'a> {
    pub name: &'a str,
}

/// Reusable building block referenced by name from recipes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subrecipe {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<String>,
}

impl Subrecipe {
    pub fn sanitized(&self) -> Subrecipe {
        Subrecipe {
            name: self.name.clone(),
            ingredients: non_blank(&self.ingredients),
        }
    }
}

/// Body of `POST /nutritional`
#[derive(Debug, Serialize)]
pub struct NutritionPrompt<'a> {
    pub prompt: &'a str,
}

/// Answer of the nutrition endpoint, which is either a bare string or an
/// object that normally carries a `nutrition` field.
///
/// Objects are kept whole so the fallback rendering shows every field the
/// server sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NutritionResult {
    Text(String),
    Object(Map<String, Value>),
    Other(Value),
}

impl NutritionResult {
    /// The `nutrition` field, when the answer is an object carrying one
    pub fn nutrition(&self) -> Option<&Value> {
        match self {
            NutritionResult::Object(fields) => fields.get("nutrition"),
            _ => None,
        }
    }

    /// Text to show the user: the bare string, a meaningful `nutrition`
    /// field, or else the whole answer as JSON
    pub fn display_text(&self) -> String {
        match self {
            NutritionResult::Text(text) => text.clone(),
            NutritionResult::Object(fields) => match fields.get("nutrition") {
                Some(Value::String(text)) if !text.is_empty() => text.clone(),
                Some(value) if is_meaningful(value) => value.to_string(),
                _ => Value::Object(fields.clone()).to_string(),
            },
            NutritionResult::Other(value) => value.to_string(),
        }
    }
}

// null, false, 0 and "" do not count as an answer.
fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accepts a missing key, `null` or a list; the first two become empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn non_blank(rows: &[String]) -> Vec<String> {
    rows.iter()
        .filter(|row| !row.trim().is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_id_accepts_numbers() {
        let recipe: Recipe = serde_json::from_value(json!({"id": 7, "name": "Soup"})).unwrap();
        assert_eq!(recipe.id, Some(RecipeId::new("7")));
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.categories.is_empty());
    }

    #[test]
    fn test_new_recipe_omits_id() {
        let body = serde_json::to_value(Recipe::new("Soup")).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["name"], "Soup");
    }

    #[test]
    fn test_sanitized_strips_blank_rows() {
        let recipe = Recipe {
            ingredients: vec!["a".into(), "".into(), "  ".into(), "b".into()],
            instructions: vec!["\t".into(), "boil".into()],
            ..Recipe::new("Soup")
        };
        let clean = recipe.sanitized();
        assert_eq!(clean.ingredients, vec!["a", "b"]);
        assert_eq!(clean.instructions, vec!["boil"]);
        assert_eq!(clean.name, "Soup");
    }

    #[test]
    fn test_category_is_a_plain_string() {
        let categories: Vec<Category> = serde_json::from_value(json!(["dinner", "lunch"])).unwrap();
        assert_eq!(categories[1].name(), "lunch");
        assert_eq!(serde_json::to_value(&categories[0]).unwrap(), json!("dinner"));
    }

    #[test]
    fn test_null_lists_become_empty() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": "2",
            "name": "Toast",
            "ingredients": null,
            "instructions": null,
            "categories": null,
            "subrecipes": null
        }))
        .unwrap();
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());
        assert!(recipe.categories.is_empty());
        assert!(recipe.subrecipes.is_empty());

        let sub: Subrecipe =
            serde_json::from_value(json!({"name": "Roux", "ingredients": null})).unwrap();
        assert!(sub.ingredients.is_empty());
    }

    #[test]
    fn test_nutrition_result_shapes() {
        let text: NutritionResult = serde_json::from_value(json!("200 kcal")).unwrap();
        assert_eq!(text, NutritionResult::Text("200 kcal".into()));
        assert_eq!(text.display_text(), "200 kcal");

        let report: NutritionResult =
            serde_json::from_value(json!({"nutrition": "Protein: 12g", "model": "x"})).unwrap();
        assert_eq!(report.nutrition(), Some(&json!("Protein: 12g")));
        assert_eq!(report.display_text(), "Protein: 12g");

        let number: NutritionResult = serde_json::from_value(json!({"nutrition": 42})).unwrap();
        assert_eq!(number.display_text(), "42");

        let other: NutritionResult = serde_json::from_value(json!([1, 2])).unwrap();
        assert!(matches!(other, NutritionResult::Other(_)));
        assert_eq!(other.display_text(), "[1,2]");
    }

    #[test]
    fn test_nutrition_fallback_keeps_every_field() {
        let empty: NutritionResult =
            serde_json::from_value(json!({"error": "quota", "nutrition": ""})).unwrap();
        let shown: Value = serde_json::from_str(&empty.display_text()).unwrap();
        assert_eq!(shown, json!({"error": "quota", "nutrition": ""}));

        let missing: NutritionResult = serde_json::from_value(json!({"calories": 300})).unwrap();
        assert!(missing.nutrition().is_none());
        assert_eq!(missing.display_text(), r#"{"calories":300}"#);

        let zero: NutritionResult =
            serde_json::from_value(json!({"nutrition": 0, "note": "n/a"})).unwrap();
        let shown: Value = serde_json::from_str(&zero.display_text()).unwrap();
        assert_eq!(shown, json!({"note": "n/a", "nutrition": 0}));
    }
}
