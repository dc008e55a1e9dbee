use serde_json::{json, Value};

use portfolio_core::analysis::AnalysisResultResponse;

use crate::adapters::result_store::AnalysisResultStore;
use crate::http::{
    json_response, message_response, text_response, ApiGatewayResponse, ProxyRequest,
};
use crate::logging::{log_error, log_info};

const COMPONENT: &str = "analysis_result";

/// Looks up the analysis for `?image_id=`. A missing row means the
/// analyzer has not written it yet, so the caller gets 202 and polls again.
pub fn handle_result_event(
    event: &Value,
    results: &impl AnalysisResultStore,
) -> ApiGatewayResponse {
    let request = ProxyRequest::from_event(event);
    let Some(image_id) = request
        .query_parameters
        .get("image_id")
        .filter(|value| !value.is_empty())
    else {
        return text_response(400, "query param image_id is required");
    };

    match results.get_result(image_id) {
        Ok(Some(record)) => {
            log_info(
                COMPONENT,
                "result_found",
                json!({ "image_id": image_id, "status": record.status.as_str() }),
            );
            json_response(
                200,
                AnalysisResultResponse {
                    ready: true,
                    data: Some(record),
                },
            )
        }
        Ok(None) => json_response(
            202,
            AnalysisResultResponse {
                ready: false,
                data: None,
            },
        ),
        Err(error) => {
            log_error(
                COMPONENT,
                "lookup_failed",
                json!({ "image_id": image_id, "error": error.clone() }),
            );
            message_response(500, error)
        }
    }
}
