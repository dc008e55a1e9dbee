use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const CORS_ALLOW_ORIGIN: &str = "*";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// The parts of an API gateway proxy event the handlers read.
///
/// Accepts both REST (v1) and HTTP API (v2) shapes. Header names are
/// lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub path_parameters: BTreeMap<String, String>,
    pub query_parameters: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub is_base64_encoded: bool,
}

impl ProxyRequest {
    pub fn from_event(event: &Value) -> Self {
        let method = event
            .get("httpMethod")
            .and_then(Value::as_str)
            .or_else(|| {
                event
                    .pointer("/requestContext/http/method")
                    .and_then(Value::as_str)
            })
            .unwrap_or_default()
            .to_ascii_uppercase();

        let path = match event.get("path").and_then(Value::as_str) {
            Some(path) => path.to_string(),
            None => raw_path_without_stage(event),
        };

        let headers = string_map(event.get("headers"))
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        Self {
            method,
            path,
            headers,
            path_parameters: string_map(event.get("pathParameters")),
            query_parameters: string_map(event.get("queryStringParameters")),
            body: event.get("body").filter(|body| !body.is_null()).cloned(),
            is_base64_encoded: event
                .get("isBase64Encoded")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn body_text(&self) -> Option<String> {
        match &self.body {
            None => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Body as a JSON value; string bodies are parsed, a missing body is `{}`.
    pub fn json_body(&self) -> Result<Value, String> {
        match &self.body {
            None => Ok(json!({})),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(json!({})),
            Some(Value::String(text)) => {
                serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
            }
            Some(value @ Value::Object(_)) => Ok(value.clone()),
            Some(_) => Err("Request body must be a JSON object".to_string()),
        }
    }
}

/// HTTP API `rawPath` carries the stage name unless the stage is `$default`.
fn raw_path_without_stage(event: &Value) -> String {
    let raw_path = event
        .get("rawPath")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let stage = event
        .pointer("/requestContext/stage")
        .and_then(Value::as_str)
        .filter(|stage| !stage.is_empty() && *stage != "$default");

    let Some(stage) = stage else {
        return raw_path.to_string();
    };
    match raw_path
        .strip_prefix('/')
        .and_then(|rest| rest.strip_prefix(stage))
    {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => raw_path.to_string(),
    }
}

fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(entries)) = value else {
        return BTreeMap::new();
    };

    entries
        .iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key.clone(), text.clone())),
            Value::Null => None,
            other => Some((key.clone(), other.to_string())),
        })
        .collect()
}

pub fn cors_headers(allow_methods: Option<&str>) -> Value {
    let mut headers = Map::new();
    headers.insert("Content-Type".to_string(), json!("application/json"));
    headers.insert(
        "Access-Control-Allow-Origin".to_string(),
        json!(CORS_ALLOW_ORIGIN),
    );
    if let Some(methods) = allow_methods {
        headers.insert("Access-Control-Allow-Methods".to_string(), json!(methods));
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            json!("Content-Type"),
        );
    }
    Value::Object(headers)
}

pub fn json_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    json_response_with_headers(status_code, payload, cors_headers(None))
}

pub fn json_response_with_headers(
    status_code: u16,
    payload: impl Serialize,
    headers: Value,
) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers,
        body: serde_json::to_string(&payload).expect("response payload should serialize"),
    }
}

pub fn message_response(status_code: u16, message: impl Into<String>) -> ApiGatewayResponse {
    json_response(status_code, json!({ "message": message.into() }))
}

pub fn text_response(status_code: u16, body: impl Into<String>) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({
            "Content-Type": "text/plain",
            "Access-Control-Allow-Origin": CORS_ALLOW_ORIGIN,
        }),
        body: body.into(),
    }
}
