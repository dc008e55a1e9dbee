use lambda_runtime::{service_fn, Error, LambdaEvent};
use portfolio_lambda::adapters::aws::{DynamoResultStore, RekognitionAnalyzer};
use portfolio_lambda::config::{env_lookup, ResultsTableConfig};
use portfolio_lambda::handlers::analyze::handle_analysis_event;
use serde_json::{json, Value};

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let config = ResultsTableConfig::load(env_lookup);

    let vision = RekognitionAnalyzer {
        rekognition_client: aws_sdk_rekognition::Client::new(&aws_config),
    };
    let results = DynamoResultStore {
        table_name: config.table_name,
        dynamo_client: aws_sdk_dynamodb::Client::new(&aws_config),
    };

    let response = handle_analysis_event(&event.payload, &vision, &results);
    Ok(json!({
        "statusCode": 200,
        "body": serde_json::to_string(&response)?,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
