use serde_json::{json, Value};

use portfolio_core::upload::{
    decode_upload, s3_uri, AnalysisQueueMessage, UploadAcceptedResponse,
};

use crate::adapters::object_store::ObjectStore;
use crate::adapters::queue::MessageQueue;
use crate::http::{
    cors_headers, json_response_with_headers, ApiGatewayResponse, ProxyRequest,
};
use crate::logging::{event_preview, log_error, log_info};

const COMPONENT: &str = "image_uploader";
const ALLOWED_METHODS: &str = "POST,OPTIONS";
const EVENT_PREVIEW_CHARS: usize = 1_000;

pub fn handle_upload_event(
    event: &Value,
    bucket: &str,
    object_store: &impl ObjectStore,
    queue: &impl MessageQueue,
) -> ApiGatewayResponse {
    log_info(
        COMPONENT,
        "event_received",
        json!({ "event": event_preview(event, EVENT_PREVIEW_CHARS) }),
    );

    let request = ProxyRequest::from_event(event);
    if request.method == "OPTIONS" {
        return ApiGatewayResponse {
            status_code: 200,
            headers: cors_headers(Some(ALLOWED_METHODS)),
            body: String::new(),
        };
    }

    let body = request.body_text();
    let upload = match decode_upload(
        body.as_deref(),
        request.is_base64_encoded,
        &request.headers,
    ) {
        Ok(value) => value,
        Err(error) => return upload_error(400, "invalid_upload", &error.message()),
    };

    log_info(
        COMPONENT,
        "upload_started",
        json!({
            "file_name": upload.file_name.clone(),
            "bytes": upload.bytes.len(),
            "bucket": bucket,
        }),
    );

    if let Err(error) =
        object_store.put_object(&upload.file_name, &upload.bytes, &upload.content_type)
    {
        log_error(
            COMPONENT,
            "upload_failed",
            json!({ "file_name": upload.file_name.clone(), "error": error.clone() }),
        );
        return upload_error(502, "storage_failed", &error);
    }

    let s3_path = s3_uri(bucket, &upload.file_name);
    let message = AnalysisQueueMessage {
        s3_path: s3_path.clone(),
    };
    let message_body = match serde_json::to_string(&message) {
        Ok(value) => value,
        Err(error) => return upload_error(500, "serialization_error", &error.to_string()),
    };

    if let Err(error) = queue.send_message(&message_body) {
        log_error(
            COMPONENT,
            "enqueue_failed",
            json!({ "s3_path": s3_path.clone(), "error": error.clone() }),
        );
        return upload_error(502, "enqueue_failed", &error);
    }

    log_info(COMPONENT, "upload_completed", json!({ "s3_path": s3_path.clone() }));
    json_response_with_headers(
        200,
        UploadAcceptedResponse {
            message: "upload ok".to_string(),
            s3_path,
        },
        cors_headers(Some(ALLOWED_METHODS)),
    )
}

fn upload_error(status_code: u16, error: &str, message: &str) -> ApiGatewayResponse {
    json_response_with_headers(
        status_code,
        json!({ "error": error, "message": message }),
        cors_headers(Some(ALLOWED_METHODS)),
    )
}
