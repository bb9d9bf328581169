//! Raw-payload access helpers.
//!
//! Every entity constructor funnels its field extraction through this
//! module, so the three recurring payload shapes are handled in exactly one
//! place: multi-representation text containers, optional scalars with the
//! service's "falsy means absent" convention, and the id-or-api-path
//! identity rule.
//!
//! Payloads are `serde_json::Value`s straight off the wire; nothing here
//! assumes a fixed schema.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::MaterializeError;
use crate::model::Stats;
use crate::text::unix_to_datetime;

/// The service's absence convention: `null`, empty strings, empty
/// containers and missing keys are all "not there". Boolean `false` is a
/// real value, not an absence.
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// First non-absent representation of a multi-format text container,
/// in `plain`, `dom`, `html`, `markdown` priority order.
pub fn resolve_text(container: Option<&Value>) -> Option<String> {
    let container = container?;
    for key in ["plain", "dom", "html", "markdown"] {
        if let Some(text) = container.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Collapse an assembled [`Stats`] aggregate: all counters absent means the
/// aggregate itself is absent, never a near-empty object.
pub fn collapse_stats(stats: Stats) -> Option<Stats> {
    if stats.is_empty() { None } else { Some(stats) }
}

pub(crate) fn str_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn u64_field(payload: &Value, key: &str) -> Option<u64> {
    payload.get(key).and_then(Value::as_u64)
}

pub(crate) fn i64_field(payload: &Value, key: &str) -> Option<i64> {
    payload.get(key).and_then(Value::as_i64)
}

pub(crate) fn f64_field(payload: &Value, key: &str) -> Option<f64> {
    payload.get(key).and_then(Value::as_f64)
}

pub(crate) fn bool_field(payload: &Value, key: &str) -> Option<bool> {
    payload.get(key).and_then(Value::as_bool)
}

/// Non-absent nested object under `key`.
pub(crate) fn obj_field<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
    payload.get(key).filter(|v| v.is_object() && !is_absent(v))
}

/// Non-empty array under `key`.
pub(crate) fn arr_field<'a>(payload: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
}

/// Value kept verbatim (annotation sources, previews and similar
/// fields the service serves in several shapes).
pub(crate) fn raw_field(payload: &Value, key: &str) -> Option<Value> {
    payload.get(key).filter(|v| !is_absent(v)).cloned()
}

/// Unix-seconds timestamp under `key`.
pub(crate) fn datetime_field(payload: &Value, key: &str) -> Option<NaiveDateTime> {
    payload
        .get(key)
        .and_then(Value::as_i64)
        .and_then(unix_to_datetime)
}

/// Resolve an entity id: an explicit `id` wins, otherwise the numeric tail
/// of the canonical `api_path` (e.g. `/songs/123`). Neither present is a
/// construction error, never silently coerced.
pub(crate) fn require_id(
    payload: &Value,
    api_prefix: &str,
    kind: &'static str,
) -> Result<u64, MaterializeError> {
    if let Some(id) = payload.get("id").and_then(Value::as_u64) {
        return Ok(id);
    }

    if let Some(id) = payload
        .get("api_path")
        .and_then(Value::as_str)
        .and_then(|path| path.strip_prefix(api_prefix))
        .and_then(|tail| tail.parse().ok())
    {
        return Ok(id);
    }

    Err(MaterializeError::MissingIdentity { kind })
}

/// Materialize every element of the array under `key` with `build`.
/// Returns absent when the key is missing or empty; construction errors
/// propagate.
pub(crate) fn vec_of<T>(
    payload: &Value,
    key: &str,
    build: impl Fn(&Value) -> Result<T, MaterializeError>,
) -> Result<Option<Vec<T>>, MaterializeError> {
    let Some(items) = arr_field(payload, key) else {
        return Ok(None);
    };

    let built = items
        .iter()
        .filter(|v| !is_absent(v))
        .map(&build)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((!built.is_empty()).then_some(built))
}

/// Materialize the nested object under `key` with `build`, or absent.
pub(crate) fn one_of<T>(
    payload: &Value,
    key: &str,
    build: impl FnOnce(&Value) -> Result<T, MaterializeError>,
) -> Result<Option<T>, MaterializeError> {
    match obj_field(payload, key) {
        Some(nested) => build(nested).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_absent() {
        assert!(is_absent(&Value::Null));
        assert!(is_absent(&json!("")));
        assert!(is_absent(&json!([])));
        assert!(is_absent(&json!({})));
        // `false` is a real value, distinct from "missing".
        assert!(!is_absent(&json!(false)));
        assert!(!is_absent(&json!(0)));
    }

    #[test]
    fn test_resolve_text_priority() {
        let body = json!({"html": "<p>h</p>", "plain": "p", "markdown": "m"});
        assert_eq!(resolve_text(Some(&body)), Some("p".to_string()));

        let body = json!({"html": "<p>h</p>", "markdown": "m"});
        assert_eq!(resolve_text(Some(&body)), Some("<p>h</p>".to_string()));
    }

    #[test]
    fn test_resolve_text_absent() {
        assert_eq!(resolve_text(None), None);
        assert_eq!(resolve_text(Some(&json!({}))), None);
        assert_eq!(resolve_text(Some(&json!({"plain": ""}))), None);
    }

    #[test]
    fn test_collapse_stats_all_absent() {
        assert!(collapse_stats(Stats::default()).is_none());
    }

    #[test]
    fn test_collapse_stats_one_counter() {
        let stats = Stats {
            views: Some(5),
            ..Stats::default()
        };
        let collapsed = collapse_stats(stats).expect("one populated counter keeps the aggregate");
        assert_eq!(collapsed.views, Some(5));
    }

    #[test]
    fn test_require_id_explicit() {
        let payload = json!({"id": 42, "api_path": "/songs/99"});
        assert_eq!(require_id(&payload, "/songs/", "Track").unwrap(), 42);
    }

    #[test]
    fn test_require_id_from_api_path() {
        let payload = json!({"api_path": "/songs/99"});
        assert_eq!(require_id(&payload, "/songs/", "Track").unwrap(), 99);
    }

    #[test]
    fn test_require_id_missing() {
        let payload = json!({"title": "x"});
        let err = require_id(&payload, "/songs/", "Track").unwrap_err();
        assert!(matches!(err, MaterializeError::MissingIdentity { kind: "Track" }));
    }

    #[test]
    fn test_require_id_wrong_prefix() {
        let payload = json!({"api_path": "/albums/7"});
        assert!(require_id(&payload, "/songs/", "Track").is_err());
    }

    #[test]
    fn test_str_field_empty_is_absent() {
        let payload = json!({"a": "", "b": "x"});
        assert_eq!(str_field(&payload, "a"), None);
        assert_eq!(str_field(&payload, "b"), Some("x".to_string()));
    }

    #[test]
    fn test_vec_of_skips_null_elements() {
        let payload = json!({"items": [{"v": 1}, null, {"v": 2}]});
        let built = vec_of(&payload, "items", |v| Ok(v["v"].as_u64().unwrap()))
            .unwrap()
            .unwrap();
        assert_eq!(built, vec![1, 2]);
    }

    #[test]
    fn test_datetime_field() {
        let payload = json!({"created_at": 86_400});
        let dt = datetime_field(&payload, "created_at").unwrap();
        assert_eq!(dt.format("%d/%m/%Y").to_string(), "02/01/1970");
    }
}
