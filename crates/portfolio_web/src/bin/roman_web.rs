use portfolio_web::config::{env_lookup, WebConfig};
use portfolio_web::error::AppError;
use portfolio_web::telemetry::init_tracing;
use portfolio_web::{roman, serve};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_tracing();
    let config = WebConfig::load(env_lookup)?;
    serve(roman::router(), config.port).await
}
