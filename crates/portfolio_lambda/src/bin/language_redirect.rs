use lambda_runtime::{service_fn, Error, LambdaEvent};
use portfolio_lambda::handlers::language::handle_viewer_request;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    handle_viewer_request(&event.payload).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
