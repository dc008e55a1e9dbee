//! Environment configuration for each Lambda function.
//!
//! Loaders take a lookup function so tests never touch the process
//! environment; binaries pass [`env_lookup`].

pub const DEFAULT_RECIPES_TABLE: &str = "recipes";
pub const DEFAULT_RESULTS_TABLE: &str = "profile_results";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeApiConfig {
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub bucket: String,
    pub queue_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsTableConfig {
    pub table_name: String,
}

pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl RecipeApiConfig {
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: optional(&lookup, "RECIPES_TABLE_NAME", DEFAULT_RECIPES_TABLE),
        }
    }
}

impl UploadConfig {
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        Ok(Self {
            bucket: required(&lookup, "IMAGE_BUCKET_NAME")?,
            queue_url: required(&lookup, "REKOGNITION_QUEUE_URL")?,
        })
    }
}

impl ResultsTableConfig {
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: optional(&lookup, "DYNAMODB_TABLE_NAME", DEFAULT_RESULTS_TABLE),
        }
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, String> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| format!("{key} must be configured"))
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
