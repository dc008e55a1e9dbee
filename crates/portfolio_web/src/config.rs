use std::{fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub port: u16,
}

impl WebConfig {
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            port: try_load(&lookup, "PORT", "8080")?,
        })
    }
}

/// Where the email directory's MySQL database lives.
///
/// `url` (from `DATABASE_URL`) wins when present; otherwise the connection
/// is assembled from the endpoint parts and a Secrets Manager secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub endpoint: String,
    pub name: String,
    pub user: String,
    pub secret_arn: Option<String>,
}

impl DatabaseConfig {
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let url = non_empty(&lookup, "DATABASE_URL");
        let secret_arn = non_empty(&lookup, "DB_SECRET_ARN");
        if url.is_none() && secret_arn.is_none() {
            return Err(AppError::Config(
                "DB_SECRET_ARN must be configured when DATABASE_URL is not set".to_string(),
            ));
        }

        Ok(Self {
            url,
            endpoint: try_load(&lookup, "DB_ENDPOINT", "localhost")?,
            name: try_load(&lookup, "DB_NAME", "default_db")?,
            user: try_load(&lookup, "DB_USER", "admin")?,
            secret_arn,
        })
    }
}

pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = non_empty(lookup, key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|error| {
        warn!("Invalid {key} value: {error}");
        AppError::Config(format!("invalid {key} value '{raw}': {error}"))
    })
}
