use serde_json::{json, Value};

use portfolio_core::language::{
    decide, LanguageDecision, LanguageRedirect, REDIRECT_CACHE_CONTROL,
};

use crate::logging::log_info;

const COMPONENT: &str = "language_redirect";

/// Handles a CloudFront viewer-request event. Returns either the original
/// request, to let it through, or a redirect response.
pub fn handle_viewer_request(event: &Value) -> Result<Value, String> {
    let request = event
        .pointer("/Records/0/cf/request")
        .ok_or_else(|| "event is missing Records[0].cf.request".to_string())?;

    let uri = request.get("uri").and_then(Value::as_str).unwrap_or("/");
    let cookie_header = joined_header_values(request, "cookie");
    let accept_language = request
        .pointer("/headers/accept-language/0/value")
        .and_then(Value::as_str);

    match decide(uri, cookie_header.as_deref(), accept_language) {
        LanguageDecision::PassThrough => Ok(request.clone()),
        LanguageDecision::Redirect(redirect) => {
            log_info(
                COMPONENT,
                "redirect",
                json!({
                    "uri": uri,
                    "location": redirect.location.clone(),
                    "status": redirect.status(),
                }),
            );
            Ok(redirect_response(&redirect))
        }
    }
}

/// CloudFront delivers repeated headers as separate entries; cookies are
/// rejoined into a single `Cookie` value.
fn joined_header_values(request: &Value, name: &str) -> Option<String> {
    let entries = request.get("headers")?.get(name)?.as_array()?;
    let values: Vec<&str> = entries
        .iter()
        .filter_map(|entry| entry.get("value").and_then(Value::as_str))
        .collect();
    (!values.is_empty()).then(|| values.join("; "))
}

fn redirect_response(redirect: &LanguageRedirect) -> Value {
    let mut headers = json!({
        "location": [{ "key": "Location", "value": redirect.location }],
        "cache-control": [{ "key": "Cache-Control", "value": REDIRECT_CACHE_CONTROL }],
    });
    if let Some(cookie) = &redirect.set_cookie {
        headers["set-cookie"] = json!([{ "key": "Set-Cookie", "value": cookie }]);
    }

    json!({
        "status": redirect.status(),
        "statusDescription": redirect.status_description(),
        "headers": headers,
    })
}
