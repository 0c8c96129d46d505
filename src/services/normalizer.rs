use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{NormalizationError, NormalizationErrorKind};

const FENCE: &str = "```";

/// Extract the JSON object embedded in raw model text.
///
/// Strips surrounding code fences, then parses the slice from the first `{`
/// to the last `}`. Prose before or after the object is ignored; a stray brace
/// in that prose will corrupt the slice and surface as `invalid_json`.
pub fn normalize(raw_text: &str) -> Result<Map<String, Value>, NormalizationError> {
    let cleaned = strip_fences(raw_text);

    let (start, end) = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            debug!(target: "itinerary::normalize", len = raw_text.len(), "no JSON object found");
            return Err(NormalizationError::new(
                NormalizationErrorKind::NoJsonFound,
                "response contains no JSON object",
                raw_text,
            ));
        }
    };

    match serde_json::from_str::<Value>(&cleaned[start..=end]) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(NormalizationError::new(
            NormalizationErrorKind::InvalidJson,
            format!("expected a JSON object, found {}", json_kind(&other)),
            raw_text,
        )),
        Err(err) => {
            debug!(target: "itinerary::normalize", error = %err, "failed to parse JSON slice");
            Err(NormalizationError::new(
                NormalizationErrorKind::InvalidJson,
                err.to_string(),
                raw_text,
            ))
        }
    }
}

/// Drop a leading fence (with optional language tag) and a trailing fence.
fn strip_fences(raw_text: &str) -> &str {
    let mut text = raw_text.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }

    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RAW_EXCERPT_CHARS;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_fenced_json_matches_unwrapped() {
        let fenced = normalize("```json\n{\"a\":1}\n```").unwrap();
        let bare = normalize("{\"a\":1}").unwrap();
        assert_eq!(fenced, bare);
        assert_eq!(fenced, object(json!({"a": 1})));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let parsed = normalize("```\n{\"city\": \"Paris\"}\n```").unwrap();
        assert_eq!(parsed["city"], "Paris");
    }

    #[test]
    fn test_prose_around_object_is_ignored() {
        let parsed =
            normalize("Sure! Here is your plan:\n{\"day\": 1, \"meals\": []}\nEnjoy your trip.")
                .unwrap();
        assert_eq!(parsed["day"], 1);
    }

    #[test]
    fn test_nested_objects_use_outer_braces() {
        let parsed = normalize(r#"{"a": {"b": {"c": 1}}}"#).unwrap();
        assert_eq!(parsed["a"]["b"]["c"], 1);
    }

    #[test]
    fn test_no_braces_is_no_json_found() {
        let err = normalize("I cannot help with that request.").unwrap_err();
        assert_eq!(err.kind, NormalizationErrorKind::NoJsonFound);
        assert_eq!(err.raw_excerpt, "I cannot help with that request.");

        let err = normalize("").unwrap_err();
        assert_eq!(err.kind, NormalizationErrorKind::NoJsonFound);

        let err = normalize("} backwards {").unwrap_err();
        assert_eq!(err.kind, NormalizationErrorKind::NoJsonFound);
    }

    #[test]
    fn test_trailing_comma_is_invalid_json() {
        let err = normalize(r#"{"a": 1,}"#).unwrap_err();
        assert_eq!(err.kind, NormalizationErrorKind::InvalidJson);
        assert_eq!(err.kind.to_string(), "invalid_json");
    }

    #[test]
    fn test_spurious_leading_brace_corrupts_slice() {
        let err = normalize(r#"Use {curly} quotes: {"a": 1}"#).unwrap_err();
        assert_eq!(err.kind, NormalizationErrorKind::InvalidJson);
    }

    #[test]
    fn test_excerpt_is_truncated_on_char_boundary() {
        let raw = format!("{{ {}", "é".repeat(RAW_EXCERPT_CHARS * 2));
        let err = normalize(&raw).unwrap_err();
        assert_eq!(err.raw_excerpt.chars().count(), RAW_EXCERPT_CHARS);
    }
}
