use std::sync::Arc;

use tracing::info;

use portfolio_web::config::{env_lookup, DatabaseConfig, WebConfig};
use portfolio_web::directory::MySqlDirectory;
use portfolio_web::email::{self, EmailState};
use portfolio_web::error::AppError;
use portfolio_web::secrets::connect_options;
use portfolio_web::serve;
use portfolio_web::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_tracing();
    let web = WebConfig::load(env_lookup)?;
    let database = DatabaseConfig::load(env_lookup)?;

    info!("Connecting to the email directory database...");
    let directory = MySqlDirectory::connect(connect_options(&database).await?).await?;
    directory.ensure_schema().await?;

    let state = EmailState {
        directory: Arc::new(directory),
    };
    serve(email::router(state), web.port).await
}
