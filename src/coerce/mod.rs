//! Document coercion: tolerant decoding of weakly-typed remote fields.
//!
//! The remote store delivers every scalar as whatever type the last writer
//! happened to use (a string where an integer is expected, a float where a
//! bool is expected, and so on). All field access goes through this module;
//! no decode failure ever escapes, the caller-supplied default is
//! substituted instead and sibling fields keep decoding.

use serde_json::Value;
use tracing::debug;

/// Render any scalar as text. Non-scalars (arrays, objects, null) yield None.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode a string-kind field. Accepts any scalar via its text rendition;
/// an absent or non-scalar field yields `default`.
pub fn decode_string(node: &Value, field: &str, default: &str) -> String {
    match node.get(field).and_then(scalar_to_string) {
        Some(s) => s,
        None => {
            debug!(field, "string field absent or non-scalar, using default");
            default.to_string()
        }
    }
}

/// Decode an integer-kind field. Accepts an integer, a float (truncated),
/// or a parseable string; anything else yields `default`.
pub fn decode_i64(node: &Value, field: &str, default: i64) -> i64 {
    let value = match node.get(field) {
        Some(v) => v,
        None => return default,
    };

    if let Some(n) = value.as_i64() {
        return n;
    }
    if let Some(f) = value.as_f64() {
        return f.trunc() as i64;
    }
    if let Some(s) = value.as_str() {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return n;
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return f.trunc() as i64;
        }
    }

    debug!(field, %value, "integer field unparseable, using default");
    default
}

/// Decode a non-negative counter field. Negative or unparseable values
/// yield `default`.
pub fn decode_u32(node: &Value, field: &str, default: u32) -> u32 {
    let n = decode_i64(node, field, i64::from(default));
    if (0..=i64::from(u32::MAX)).contains(&n) {
        n as u32
    } else {
        debug!(field, n, "counter field out of range, using default");
        default
    }
}

/// Decode a boolean-kind field. Accepts a boolean, or a string where
/// `"true"`/`"1"` (case-insensitive) is true and any other text is false;
/// an absent field yields `default`.
pub fn decode_bool(node: &Value, field: &str, default: bool) -> bool {
    let value = match node.get(field) {
        Some(v) => v,
        None => return default,
    };

    if let Some(b) = value.as_bool() {
        return b;
    }
    if let Some(s) = value.as_str() {
        let trimmed = s.trim();
        return trimmed.eq_ignore_ascii_case("true") || trimmed == "1";
    }

    debug!(field, %value, "boolean field not a bool or string, treating as false");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_i64_accepts_all_natural_representations() {
        let node = json!({
            "as_string": "42",
            "as_int": 42,
            "as_float": 42.0,
            "as_large": 42i64,
        });

        assert_eq!(decode_i64(&node, "as_string", 0), 42);
        assert_eq!(decode_i64(&node, "as_int", 0), 42);
        assert_eq!(decode_i64(&node, "as_float", 0), 42);
        assert_eq!(decode_i64(&node, "as_large", 0), 42);
    }

    #[test]
    fn test_decode_i64_absent_and_unparseable_yield_default() {
        let node = json!({ "garbage": "not a number" });

        assert_eq!(decode_i64(&node, "missing", -7), -7);
        assert_eq!(decode_i64(&node, "garbage", 13), 13);
    }

    #[test]
    fn test_decode_i64_truncates_floats() {
        let node = json!({ "f": 3.9, "fs": "3.9" });
        assert_eq!(decode_i64(&node, "f", 0), 3);
        assert_eq!(decode_i64(&node, "fs", 0), 3);
    }

    #[test]
    fn test_decode_bool_variants() {
        let node = json!({
            "plain": true,
            "text_true": "TRUE",
            "text_one": "1",
            "text_other": "yes",
            "number": 1,
        });

        assert!(decode_bool(&node, "plain", false));
        assert!(decode_bool(&node, "text_true", false));
        assert!(decode_bool(&node, "text_one", false));
        assert!(!decode_bool(&node, "text_other", true));
        // present but neither bool nor string: false, not the default
        assert!(!decode_bool(&node, "number", true));
        // absent: default
        assert!(decode_bool(&node, "missing", true));
    }

    #[test]
    fn test_decode_string_renders_any_scalar() {
        let node = json!({
            "text": "hello",
            "number": 7,
            "flag": false,
            "nested": { "x": 1 },
        });

        assert_eq!(decode_string(&node, "text", ""), "hello");
        assert_eq!(decode_string(&node, "number", ""), "7");
        assert_eq!(decode_string(&node, "flag", ""), "false");
        assert_eq!(decode_string(&node, "nested", "fallback"), "fallback");
        assert_eq!(decode_string(&node, "missing", "fallback"), "fallback");
    }

    #[test]
    fn test_decode_u32_rejects_negative() {
        let node = json!({ "neg": -3, "ok": "11" });
        assert_eq!(decode_u32(&node, "neg", 2), 2);
        assert_eq!(decode_u32(&node, "ok", 0), 11);
    }

    #[test]
    fn test_failed_field_does_not_affect_siblings() {
        let node = json!({ "bad": [1, 2], "good": "5" });
        assert_eq!(decode_i64(&node, "bad", 0), 0);
        assert_eq!(decode_i64(&node, "good", 0), 5);
    }
}
