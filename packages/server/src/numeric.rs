//! Numeric normalization for outbound payloads.
//!
//! Every floating value that leaves the server is rounded to a fixed number
//! of decimal digits so the wire output stays stable and compact across
//! broadcast ticks.

use serde_json::Value;

/// Decimal digits kept on every outbound floating value.
pub const WIRE_PRECISION: u32 = 3;

/// Round a floating value to `digits` decimal digits.
///
/// Idempotent: `truncate(truncate(x, d), d) == truncate(x, d)`.
pub fn truncate(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Recursively round every floating value inside a JSON value.
///
/// Floats are rounded to `digits` decimal digits, sequences and `{x,y,z}`
/// style objects are normalized element-wise, and everything else (strings,
/// booleans, integers, null) passes through unchanged.
pub fn truncate_value(value: &Value, digits: u32) -> Value {
    match value {
        Value::Number(n) => {
            if n.is_f64() {
                n.as_f64()
                    .and_then(|f| serde_json::Number::from_f64(truncate(f, digits)))
                    .map(Value::Number)
                    .unwrap_or_else(|| value.clone())
            } else {
                value.clone()
            }
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| truncate_value(v, digits)).collect())
        }
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), truncate_value(v, digits)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_rounds_to_three_decimals() {
        // given (precondition):
        let value = 1.23456789;

        // when (operation):
        let result = truncate(value, 3);

        // then (expected result):
        assert_eq!(result, 1.235);
    }

    #[test]
    fn test_truncate_is_idempotent() {
        // given (precondition):
        let value = 0.0004999;

        // when (operation):
        let once = truncate(value, 3);
        let twice = truncate(once, 3);

        // then (expected result):
        assert_eq!(once, twice);
    }

    #[test]
    fn test_truncate_negative_values() {
        // given (precondition):
        let value = -2.71828;

        // when (operation):
        let result = truncate(value, 3);

        // then (expected result):
        assert_eq!(result, -2.718);
    }

    #[test]
    fn test_truncate_value_normalizes_floats() {
        // given (precondition):
        let value = json!(3.14159265);

        // when (operation):
        let result = truncate_value(&value, 3);

        // then (expected result):
        assert_eq!(result, json!(3.142));
    }

    #[test]
    fn test_truncate_value_preserves_sequence_shape() {
        // given (precondition):
        let value = json!([1.00049, 2.5, 3.99999]);

        // when (operation):
        let result = truncate_value(&value, 3);

        // then (expected result):
        assert_eq!(result, json!([1.0, 2.5, 4.0]));
    }

    #[test]
    fn test_truncate_value_normalizes_vector_objects() {
        // given (precondition):
        let value = json!({"x": 0.12345, "y": -0.98765, "z": 1.0});

        // when (operation):
        let result = truncate_value(&value, 3);

        // then (expected result):
        assert_eq!(result, json!({"x": 0.123, "y": -0.988, "z": 1.0}));
    }

    #[test]
    fn test_truncate_value_passes_non_numeric_through() {
        // given (precondition):
        let values = [json!("player"), json!(true), json!(null), json!(42)];

        // when (operation) / then (expected result):
        for value in values {
            assert_eq!(truncate_value(&value, 3), value);
        }
    }

    #[test]
    fn test_truncate_value_is_idempotent() {
        // given (precondition):
        let value = json!({"nested": [1.23456, {"x": 9.87654}]});

        // when (operation):
        let once = truncate_value(&value, 3);
        let twice = truncate_value(&once, 3);

        // then (expected result):
        assert_eq!(once, twice);
    }
}
