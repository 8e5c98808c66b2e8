use super::CloneError;
use crate::value::{Map, Value};

/// Copy `value` into a new tree that is structurally equal to it and shares
/// no lists, maps or buffers with it.
///
/// Fails on functions and foreign values anywhere in the tree.
pub fn deep_clone(value: &Value) -> Result<Value, CloneError> {
    Ok(match value {
        Value::Undefined => Value::Undefined,
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Number(*n),
        Value::String(s) => Value::String(s.clone()),
        Value::Buffer(bytes) => Value::Buffer(bytes.clone()),
        Value::List(items) => Value::List(
            items
                .iter()
                .map(deep_clone)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(key, item)| Ok((key.clone(), deep_clone(item)?)))
                .collect::<Result<Map, CloneError>>()?,
        ),
        Value::Function(_) => return Err(CloneError::Function),
        Value::Foreign(foreign) => {
            return Err(CloneError::Unsupported(foreign.type_name().to_string()))
        }
    })
}
