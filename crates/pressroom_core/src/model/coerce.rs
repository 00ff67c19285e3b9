//! Best-effort JSON field coercion shared by lenient decoders.

use serde_json::{Map, Value};

/// Integer view of a JSON number; integral floats (`2.0`) count as integers.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    if value.is_u64() {
        return None;
    }
    value
        .as_f64()
        .filter(|float| float.is_finite() && float.fract() == 0.0)
        .filter(|float| *float >= i64::MIN as f64 && *float <= i64::MAX as f64)
        .map(|float| float as i64)
}

/// String view of a scalar; objects, arrays and `null` yield `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Like `scalar_text`, but empty strings, `0` and `false` count as absent.
pub(crate) fn present_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if text.is_empty() => None,
        Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => scalar_text(other),
    }
}

/// String field of an object, coerced from any scalar; missing becomes `""`.
pub(crate) fn text_field(object: &Map<String, Value>, key: &str) -> String {
    object.get(key).and_then(scalar_text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{as_integer, present_text, scalar_text};
    use serde_json::json;

    #[test]
    fn integral_floats_are_integers_but_fractions_are_not() {
        assert_eq!(as_integer(&json!(3)), Some(3));
        assert_eq!(as_integer(&json!(-2)), Some(-2));
        assert_eq!(as_integer(&json!(2.0)), Some(2));
        assert_eq!(as_integer(&json!(2.5)), None);
        assert_eq!(as_integer(&json!("2")), None);
        assert_eq!(as_integer(&json!(u64::MAX)), None);
    }

    #[test]
    fn scalars_are_stringified() {
        assert_eq!(scalar_text(&json!(12)).as_deref(), Some("12"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(&json!([1])), None);
    }

    #[test]
    fn falsy_scalars_are_not_present() {
        assert_eq!(present_text(Some(&json!(""))), None);
        assert_eq!(present_text(Some(&json!(0))), None);
        assert_eq!(present_text(Some(&json!(false))), None);
        assert_eq!(present_text(None), None);
        assert_eq!(present_text(Some(&json!(7))).as_deref(), Some("7"));
    }
}
