use serde_json::Value;

/// Best-effort JSON object extraction from model output.
///
/// Takes the span from the first `{` to the last `}` (inclusive) and parses
/// it. Prose or code fences around the object are tolerated; malformed JSON
/// inside the span is not repaired.
pub fn extract_json(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_object_surrounded_by_noise() {
        assert_eq!(
            extract_json("noise {\"a\":1} trailing"),
            Some(json!({"a": 1}))
        );
    }

    #[test]
    fn extracts_from_code_fence() {
        let text = "Here you go:\n```json\n{\"languages\":[\"Go\"]}\n```";
        assert_eq!(extract_json(text), Some(json!({"languages": ["Go"]})));
    }

    #[test]
    fn no_braces_is_none() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json(""), None);
    }

    #[test]
    fn end_before_start_is_none() {
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn malformed_span_is_none() {
        assert_eq!(extract_json("{\"a\":1,}"), None);
        assert_eq!(extract_json("{\"a\":1} and {\"b\":2}"), None);
    }
}
