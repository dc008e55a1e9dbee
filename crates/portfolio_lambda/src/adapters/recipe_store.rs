use portfolio_core::recipe::Recipe;

/// One page of a table scan; `next_start_key` is set while more pages remain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePage {
    pub items: Vec<Recipe>,
    pub next_start_key: Option<String>,
}

pub trait RecipeStore {
    fn scan_page(&self, start_key: Option<&str>) -> Result<RecipePage, String>;
    fn put_recipe(&self, recipe: &Recipe) -> Result<(), String>;
    /// Returns the new like count, or `None` when no recipe has `recipe_id`.
    fn increment_likes(&self, recipe_id: &str) -> Result<Option<u64>, String>;
    fn delete_recipe(&self, recipe_id: &str) -> Result<(), String>;
}
