//! # YAML → JSON Conversion
//!
//! The schema validator operates on `serde_json::Value`. User data is YAML,
//! whose data model is wider (non-string keys, tags, non-finite floats).
//! This module maps the JSON-compatible subset across and rejects the rest.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

/// Convert a `serde_yaml::Value` tree into the equivalent `serde_json::Value`.
///
/// Scalar mapping keys (numbers, booleans) are stringified, matching how
/// they would appear as JSON object keys. Tags are dropped and the tagged
/// value is converted in place.
///
/// # Errors
///
/// Returns the JSON Pointer of the offending node plus a description, for
/// non-finite floats and for mapping keys that are null, sequences, or
/// mappings.
pub fn yaml_to_json_value(yaml: &Yaml) -> Result<Value, String> {
    let mut pointer = String::new();
    convert(yaml, &mut pointer).map_err(|reason| {
        if pointer.is_empty() {
            format!("(root): {reason}")
        } else {
            format!("{pointer}: {reason}")
        }
    })
}

/// JSON type name of `value`, as used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// On error `pointer` is left pointing at the failing node.
fn convert(yaml: &Yaml, pointer: &mut String) -> Result<Value, String> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => number(n).map(Value::Number),
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Sequence(items) => {
            let mut array = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let depth = pointer.len();
                pointer.push_str(&format!("/{index}"));
                array.push(convert(item, pointer)?);
                pointer.truncate(depth);
            }
            Ok(Value::Array(array))
        }
        Yaml::Mapping(map) => {
            let mut object = Map::with_capacity(map.len());
            for (k, v) in map {
                let key = mapping_key(k)?;
                let depth = pointer.len();
                pointer.push('/');
                pointer.push_str(&key.replace('~', "~0").replace('/', "~1"));
                let value = convert(v, pointer)?;
                pointer.truncate(depth);
                object.insert(key, value);
            }
            Ok(Value::Object(object))
        }
        Yaml::Tagged(tagged) => convert(&tagged.value, pointer),
    }
}

fn number(n: &serde_yaml::Number) -> Result<Number, String> {
    if let Some(i) = n.as_i64() {
        Ok(i.into())
    } else if let Some(u) = n.as_u64() {
        Ok(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .ok_or_else(|| format!("cannot represent float {n} in JSON"))
    }
}

fn mapping_key(key: &Yaml) -> Result<String, String> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Tagged(tagged) => mapping_key(&tagged.value),
        other => Err(format!("unsupported YAML mapping key: {other:?}")),
    }
}
