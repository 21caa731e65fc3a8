//! Attribute Aggregation
//!
//! Pure algorithm merging a sequence of heterogeneous values (scalars, nulls,
//! or nested objects) into a shape where every leaf becomes an ordered
//! sequence of corresponding values. Used by the `get_for_*` accessors to
//! combine an attribute read off many outcomes into one value.

use serde_json::Value;

/// Aggregate a sequence of values.
///
/// If every non-null input is an object, the result is an object over the
/// union of keys, where each value is the recursive aggregate of the per-input
/// values at that key (a missing key or null input contributes an explicit
/// null). Otherwise the result is a flat array: scalars and nulls as-is,
/// arrays spliced one level, input order preserved.
///
/// ```
/// use serde_json::json;
///
/// let merged = upshot::aggregate::call(vec![json!({"id": 1}), json!({"id": 2})]);
/// assert_eq!(merged, json!({"id": [1, 2]}));
/// ```
pub fn call<I>(values: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    combine(values.into_iter().collect())
}

fn combine(values: Vec<Value>) -> Value {
    // Normalize each element to a sequence, then flatten one level. Nested
    // arrays beyond the first level stay opaque.
    let flattened: Vec<Value> = values
        .into_iter()
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        })
        .collect();

    if all_object_values(&flattened) {
        combine_objects(flattened)
    } else {
        Value::Array(flattened)
    }
}

/// True when the null-filtered sequence is non-empty and entirely objects.
fn all_object_values(values: &[Value]) -> bool {
    let mut saw_object = false;
    for value in values {
        match value {
            Value::Null => {}
            Value::Object(_) => saw_object = true,
            _ => return false,
        }
    }
    saw_object
}

fn combine_objects(values: Vec<Value>) -> Value {
    // Union of keys in first-seen order.
    let mut keys: Vec<&String> = Vec::new();
    for value in &values {
        if let Value::Object(fields) = value {
            for key in fields.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
    }

    let mut merged = serde_json::Map::new();
    for key in keys {
        // Every input contributes one slot per key; nulls and missing keys
        // contribute an explicit null.
        let per_input: Vec<Value> = values
            .iter()
            .map(|value| match value {
                Value::Object(fields) => fields.get(key).cloned().unwrap_or(Value::Null),
                _ => Value::Null,
            })
            .collect();
        merged.insert(key.clone(), combine(per_input));
    }
    Value::Object(merged)
}
