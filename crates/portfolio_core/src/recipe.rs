use serde::{Deserialize, Serialize};

pub const MAX_INGREDIENTS: usize = 20;
pub const MAX_STEPS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub likes: u64,
}

/// Client payload for a new recipe. Any `id` the client sends is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRecipeRequest {
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
            likes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeValidationError {
    message: String,
}

impl RecipeValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RecipeValidationError {}

pub fn build_recipe(
    request: NewRecipeRequest,
    id: impl Into<String>,
) -> Result<Recipe, RecipeValidationError> {
    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(RecipeValidationError::new("title cannot be empty"));
    }

    if request.ingredients.len() > MAX_INGREDIENTS {
        return Err(RecipeValidationError::new(format!(
            "a recipe can have at most {MAX_INGREDIENTS} ingredients"
        )));
    }

    if request.steps.len() > MAX_STEPS {
        return Err(RecipeValidationError::new(format!(
            "a recipe can have at most {MAX_STEPS} steps"
        )));
    }

    Ok(Recipe {
        id: id.into(),
        title,
        ingredients: request.ingredients,
        steps: request.steps,
        likes: request.likes,
    })
}

pub fn generate_recipe_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> NewRecipeRequest {
        NewRecipeRequest {
            title: "  Pancakes ".to_string(),
            ingredients: vec![Ingredient {
                id: 1,
                description: "2 eggs".to_string(),
            }],
            steps: vec![Step {
                id: 1,
                description: "Whisk".to_string(),
            }],
            likes: 3,
        }
    }

    #[test]
    fn client_supplied_id_is_ignored_during_parsing() {
        let request: NewRecipeRequest = serde_json::from_str(
            r#"{"id":"client-id","title":"Soup","ingredients":[],"steps":[]}"#,
        )
        .expect("request should parse");

        let recipe = build_recipe(request, "server-id").expect("recipe should build");
        assert_eq!(recipe.id, "server-id");
        assert_eq!(recipe.likes, 0);
    }

    #[test]
    fn build_recipe_trims_title_and_keeps_order() {
        let recipe = build_recipe(sample_request(), "abc").expect("recipe should build");
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.ingredients[0].description, "2 eggs");
        assert_eq!(recipe.likes, 3);
    }

    #[test]
    fn build_recipe_rejects_blank_title() {
        let mut request = sample_request();
        request.title = "   ".to_string();
        let error = build_recipe(request, "abc").expect_err("blank title should fail");
        assert_eq!(error.message(), "title cannot be empty");
    }

    #[test]
    fn build_recipe_enforces_step_limit() {
        let mut request = sample_request();
        request.steps = (0..=MAX_STEPS as i64)
            .map(|id| Step {
                id,
                description: format!("step {id}"),
            })
            .collect();
        let error = build_recipe(request, "abc").expect_err("too many steps should fail");
        assert_eq!(error.message(), "a recipe can have at most 10 steps");
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_recipe_id(), generate_recipe_id());
    }
}
