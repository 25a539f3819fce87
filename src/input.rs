//! Forgiving request-body handling for the JSON endpoints.
//!
//! Clients send loosely shaped JSON (`null` lists, mixed arrays, empty
//! bodies). Bodies are read as bytes and every field is coerced, so the
//! handlers always see a complete request value.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::convert::Infallible;

/// Body extractor that never rejects. Anything that is not a JSON object
/// matching `T` becomes `T::default()`.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.unwrap_or_default();
        Ok(LenientJson(parse_body(&bytes)))
    }
}

pub fn parse_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> T {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .filter(Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// String items of an array; `null` or any non-array is empty.
pub fn strings_in(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(strings_in(&Value::deserialize(d)?))
}

/// Scalars as text; `null`, arrays and objects are absent.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Integers, floats (truncated) and numeric strings.
pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default, deserialize_with = "string_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "text")]
        label: Option<String>,
        #[serde(default, deserialize_with = "integer")]
        count: Option<i64>,
    }

    #[test]
    fn null_and_mixed_lists() {
        let s: Sample = parse_body(br#"{"items": null}"#);
        assert!(s.items.is_empty());
        let s: Sample = parse_body(br#"{"items": ["a", 1, null, "b"]}"#);
        assert_eq!(s.items, vec!["a", "b"]);
        let s: Sample = parse_body(br#"{"items": "a"}"#);
        assert!(s.items.is_empty());
    }

    #[test]
    fn scalars_coerce() {
        let s: Sample = parse_body(br#"{"label": 42, "count": "7"}"#);
        assert_eq!(s.label.as_deref(), Some("42"));
        assert_eq!(s.count, Some(7));
        let s: Sample = parse_body(br#"{"label": {"x": 1}, "count": 2.9}"#);
        assert_eq!(s.label, None);
        assert_eq!(s.count, Some(2));
    }

    #[test]
    fn empty_or_non_object_bodies_default() {
        assert_eq!(parse_body::<Sample>(b""), Sample::default());
        assert_eq!(parse_body::<Sample>(b"[1,2]"), Sample::default());
        assert_eq!(parse_body::<Sample>(b"not json"), Sample::default());
        assert_eq!(strings_in(&json!(null)), Vec::<String>::new());
    }
}
