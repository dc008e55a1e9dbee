use lambda_runtime::{service_fn, Error, LambdaEvent};
use portfolio_lambda::adapters::aws::DynamoResultStore;
use portfolio_lambda::config::{env_lookup, ResultsTableConfig};
use portfolio_lambda::handlers::result::handle_result_event;
use portfolio_lambda::http::ApiGatewayResponse;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let config = ResultsTableConfig::load(env_lookup);
    let results = DynamoResultStore {
        table_name: config.table_name,
        dynamo_client: aws_sdk_dynamodb::Client::new(&aws_config),
    };

    Ok(handle_result_event(&event.payload, &results))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
