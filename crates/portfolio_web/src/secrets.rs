use std::str::FromStr;

use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::AppError;

const DEFAULT_MYSQL_PORT: u16 = 3306;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
struct ManagedSecret {
    username: Option<String>,
    password: String,
}

/// RDS-managed secrets are JSON objects; hand-made ones are often just the
/// password. Both shapes are accepted.
pub fn parse_secret_string(secret: &str, default_user: &str) -> DbCredentials {
    match serde_json::from_str::<ManagedSecret>(secret) {
        Ok(managed) => DbCredentials {
            username: managed
                .username
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| default_user.to_string()),
            password: managed.password,
        },
        Err(_) => DbCredentials {
            username: default_user.to_string(),
            password: secret.trim().to_string(),
        },
    }
}

pub async fn fetch_secret_string(
    client: &aws_sdk_secretsmanager::Client,
    secret_arn: &str,
) -> Result<String, AppError> {
    let output = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|error| AppError::Secret(format!("failed to read {secret_arn}: {error}")))?;

    output
        .secret_string()
        .map(str::to_string)
        .ok_or_else(|| AppError::Secret(format!("{secret_arn} has no string value")))
}

/// Builds connection options from `DATABASE_URL`, or from the endpoint parts
/// plus credentials read out of Secrets Manager.
pub async fn connect_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions, AppError> {
    if let Some(url) = &config.url {
        info!("Using DATABASE_URL for the email directory");
        return Ok(MySqlConnectOptions::from_str(url)?);
    }

    let secret_arn = config
        .secret_arn
        .as_deref()
        .ok_or_else(|| AppError::Config("DB_SECRET_ARN must be configured".to_string()))?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_secretsmanager::Client::new(&aws_config);
    let secret = fetch_secret_string(&client, secret_arn).await?;
    let credentials = parse_secret_string(&secret, &config.user);

    info!(
        endpoint = %config.endpoint,
        database = %config.name,
        user = %credentials.username,
        "Resolved database credentials from Secrets Manager"
    );
    endpoint_options(config, &credentials)
}

pub fn endpoint_options(
    config: &DatabaseConfig,
    credentials: &DbCredentials,
) -> Result<MySqlConnectOptions, AppError> {
    let (host, port) = split_endpoint(&config.endpoint)?;
    Ok(MySqlConnectOptions::new()
        .host(host)
        .port(port)
        .username(&credentials.username)
        .password(&credentials.password)
        .database(&config.name))
}

/// RDS endpoints sometimes carry the port (`host:3306`).
pub fn split_endpoint(endpoint: &str) -> Result<(&str, u16), AppError> {
    match endpoint.rsplit_once(':') {
        Some((host, port)) => port
            .parse()
            .map(|port| (host, port))
            .map_err(|_| AppError::Config(format!("invalid DB_ENDPOINT port in '{endpoint}'"))),
        None => Ok((endpoint, DEFAULT_MYSQL_PORT)),
    }
}
