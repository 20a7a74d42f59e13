//! Forgiving number parsing for form submissions.
//!
//! Form fields arrive as JSON numbers, numeric strings, `null`, or not at all.
//! Anything that does not start with a number becomes 0, and negatives are
//! clamped to 0, so stored entries never carry null or negative nutrients.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(coerce_int(v.as_ref()))
}

pub fn real<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(coerce_real(v.as_ref()))
}

pub fn coerce_int(v: Option<&Value>) -> i32 {
    let n = match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading(s, false).parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    n.clamp(0, i64::from(i32::MAX)) as i32
}

pub fn coerce_real(v: Option<&Value>) -> f64 {
    let n = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => leading(s, true).parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

/// Longest numeric prefix of `s` after leading whitespace.
fn leading(s: &str, allow_fraction: bool) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if allow_fraction && end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        if frac > end + 1 {
            end = frac;
        }
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ints() {
        assert_eq!(coerce_int(Some(&json!(250))), 250);
        assert_eq!(coerce_int(Some(&json!("250"))), 250);
        assert_eq!(coerce_int(Some(&json!(" 12.7 kcal"))), 12);
        assert_eq!(coerce_int(Some(&json!(99.9))), 99);
        assert_eq!(coerce_int(Some(&json!("abc"))), 0);
        assert_eq!(coerce_int(Some(&json!(""))), 0);
        assert_eq!(coerce_int(Some(&json!(-3))), 0);
        assert_eq!(coerce_int(Some(&Value::Null)), 0);
        assert_eq!(coerce_int(None), 0);
    }

    #[test]
    fn reals() {
        assert_eq!(coerce_real(Some(&json!("12.5"))), 12.5);
        assert_eq!(coerce_real(Some(&json!("7.25g"))), 7.25);
        assert_eq!(coerce_real(Some(&json!(".5"))), 0.5);
        assert_eq!(coerce_real(Some(&json!("."))), 0.0);
        assert_eq!(coerce_real(Some(&json!(3))), 3.0);
        assert_eq!(coerce_real(Some(&json!("-1.5"))), 0.0);
        assert_eq!(coerce_real(Some(&json!(true))), 0.0);
        assert_eq!(coerce_real(None), 0.0);
    }

    #[test]
    fn deserialize_with_defaults() {
        #[derive(Deserialize)]
        struct Form {
            #[serde(default, deserialize_with = "int")]
            calories: i32,
            #[serde(default, deserialize_with = "real")]
            protein: f64,
        }
        let f: Form = serde_json::from_str(r#"{"calories":"120","protein":null}"#).unwrap();
        assert_eq!(f.calories, 120);
        assert_eq!(f.protein, 0.0);

        let f: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(f.calories, 0);
        assert_eq!(f.protein, 0.0);
    }
}
