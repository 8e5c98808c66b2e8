use crate::value::{type_name, Value};

/// Merge `source` into `target` in place.
///
/// Two maps merge by key and two lists merge by index. An entry the target
/// lacks is added, an entry of a different type is overwritten, nested maps
/// merge recursively and nested lists are appended to. Any other pair of
/// values is overwritten by the source.
///
/// ```
/// use filth_rust::{compare, merge, Value};
///
/// let mut target = Value::from_json_str(r#"{"a": 1, "list": [1]}"#).unwrap();
/// let source = Value::from_json_str(r#"{"a": 2, "b": 3, "list": [2]}"#).unwrap();
/// merge(&mut target, &source);
///
/// let expected = Value::from_json_str(r#"{"a": 2, "b": 3, "list": [1, 2]}"#).unwrap();
/// assert!(compare(&target, &expected));
/// ```
pub fn merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Map(target), Value::Map(source)) => {
            for (key, incoming) in source {
                match target.get_mut(key) {
                    Some(existing) => merge_field(existing, incoming),
                    None => {
                        target.insert(key.clone(), incoming.clone());
                    }
                }
            }
        }
        (Value::List(target), Value::List(source)) => {
            for (index, incoming) in source.iter().enumerate() {
                match target.get_mut(index) {
                    Some(existing) => merge_field(existing, incoming),
                    None => target.push(incoming.clone()),
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

fn merge_field(existing: &mut Value, incoming: &Value) {
    if type_name(existing) != type_name(incoming) {
        *existing = incoming.clone();
        return;
    }
    match (existing, incoming) {
        (Value::List(items), Value::List(more)) => items.extend(more.iter().cloned()),
        (existing, incoming) => merge(existing, incoming),
    }
}
