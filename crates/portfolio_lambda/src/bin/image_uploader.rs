use lambda_runtime::{service_fn, Error, LambdaEvent};
use portfolio_lambda::adapters::aws::{S3ObjectStore, SqsMessageQueue};
use portfolio_lambda::config::{env_lookup, UploadConfig};
use portfolio_lambda::handlers::upload::handle_upload_event;
use portfolio_lambda::http::ApiGatewayResponse;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let config = UploadConfig::load(env_lookup).map_err(Error::from)?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let object_store = S3ObjectStore {
        bucket: config.bucket.clone(),
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };
    let queue = SqsMessageQueue {
        queue_url: config.queue_url,
        sqs_client: aws_sdk_sqs::Client::new(&aws_config),
    };

    Ok(handle_upload_event(
        &event.payload,
        &config.bucket,
        &object_store,
        &queue,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
