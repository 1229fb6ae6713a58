use serde_json::Value;

/// Extract a human-readable failure explanation from an error response
/// body. The backend answers with either `{"detail": "..."}` or
/// `{"detail": {"error": "...", "traceback": ["...", ...]}}`; anything
/// else falls back to a generic status-code message.
pub fn extract_error_detail(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = value.get("detail") {
            if let Some(text) = detail.as_str() {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
            if detail.is_object() {
                let mut lines = Vec::new();
                if let Some(error) = detail.get("error").and_then(Value::as_str) {
                    if !error.trim().is_empty() {
                        lines.push(error.trim().to_string());
                    }
                }
                if let Some(frames) = detail.get("traceback").and_then(Value::as_array) {
                    lines.extend(
                        frames
                            .iter()
                            .filter_map(Value::as_str)
                            .map(|frame| frame.trim_end().to_string()),
                    );
                }
                if !lines.is_empty() {
                    return lines.join("\n");
                }
            }
        }
    }
    format!("request failed with status code {status}")
}
