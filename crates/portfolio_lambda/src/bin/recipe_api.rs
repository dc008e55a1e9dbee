use lambda_runtime::{service_fn, Error, LambdaEvent};
use portfolio_lambda::adapters::aws::DynamoRecipeStore;
use portfolio_lambda::config::{env_lookup, RecipeApiConfig};
use portfolio_lambda::handlers::recipes::route_recipe_request;
use portfolio_lambda::http::{ApiGatewayResponse, ProxyRequest};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let config = RecipeApiConfig::load(env_lookup);
    let store = DynamoRecipeStore {
        table_name: config.table_name,
        dynamo_client: aws_sdk_dynamodb::Client::new(&aws_config),
    };

    Ok(route_recipe_request(
        ProxyRequest::from_event(&event.payload),
        &store,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
