//! Bridge between [`Value`] and `serde_json`, used by the CLI, the WASM
//! bindings and anything else that speaks JSON.
//!
//! JSON objects only have string keys, so non-string map keys are coerced the
//! way a JavaScript object coerces property names: `1` becomes `"1"`, `true`
//! becomes `"true"`, nil becomes `"null"`. Duplicate keys collapse last-wins
//! with the first key position kept (requires the `preserve_order` feature of
//! `serde_json`, enabled in the workspace).
//!
//! Going the other way, a JSON number is an integer whenever its value is
//! whole and fits the 32-bit integer tiers, however it was written.

use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::Result;
use crate::marker;
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Nil, json_number),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// JSON has a single number type, so a whole number written as `2.0` or `1e3`
/// is still an integer and takes the integer tiers when it fits them.
fn json_number(f: f64) -> Value {
    let int_range = marker::INT_MIN as f64..=marker::INT_MAX as f64;
    if f.fract() == 0.0 && int_range.contains(&f) {
        Value::Integer(f as i64)
    } else {
        Value::Float(f)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(&key_string(k), v)?;
                }
                map.end()
            }
        }
    }
}

impl Value {
    /// Parse JSON text into a value tree.
    pub fn from_json_str(json: &str) -> Result<Value> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Ok(Value::from(parsed))
    }

    /// Convert to a `serde_json::Value`. Non-finite floats become `null`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Encode JSON text straight to packet bytes.
pub fn encode_json(json: &str) -> Result<Vec<u8>> {
    encode(&Value::from_json_str(json)?)
}

/// Decode one packet and render it as compact JSON text.
pub fn decode_to_json(bytes: &[u8]) -> Result<String> {
    let value = decode(bytes)?.to_json()?;
    Ok(serde_json::to_string(&value)?)
}

/// Property-name coercion for map keys.
fn key_string(key: &Value) -> Cow<'_, str> {
    match key {
        Value::String(s) => Cow::Borrowed(s),
        Value::Nil => Cow::Borrowed("null"),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::Integer(n) => Cow::Owned(n.to_string()),
        Value::Float(f) if f.is_nan() => Cow::Borrowed("NaN"),
        Value::Float(f) if f.is_infinite() => {
            Cow::Borrowed(if *f > 0.0 { "Infinity" } else { "-Infinity" })
        }
        Value::Float(f) => Cow::Owned(js_number_string(*f)),
        Value::Array(_) | Value::Map(_) => {
            Cow::Owned(serde_json::to_string(key).unwrap_or_default())
        }
    }
}

/// Render a finite float the way JavaScript's `Number::toString` does: plain
/// decimal for exponents in `[-7, 21)`, scientific (`1e+21`, `1.5e-7`) outside.
fn js_number_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e3"
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(n.unsigned_abs() as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let frac = if rest.is_empty() {
            String::new()
        } else {
            format!(".{rest}")
        };
        format!("{first}{frac}e{sign}{}", (n - 1).unsigned_abs())
    };
    if f < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}
