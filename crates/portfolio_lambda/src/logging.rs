use serde_json::{json, Value};

pub fn log_info(component: &str, event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": component,
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

pub fn log_error(component: &str, event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": component,
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

/// Truncates a raw event for logging; payloads may carry whole images.
pub fn event_preview(event: &Value, limit: usize) -> String {
    let rendered = event.to_string();
    match rendered.char_indices().nth(limit) {
        Some((cut, _)) => rendered[..cut].to_string(),
        None => rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_preview_truncates_long_payloads() {
        let event = json!({"body": "x".repeat(50)});
        let preview = event_preview(&event, 10);
        assert_eq!(preview.chars().count(), 10);
        assert!(preview.starts_with("{\"body\""));
    }

    #[test]
    fn event_preview_keeps_short_payloads() {
        let event = json!({"a": 1});
        assert_eq!(event_preview(&event, 1_000), "{\"a\":1}");
    }
}
