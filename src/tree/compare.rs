use crate::value::Value;

/// Structural equality that ignores map key order.
///
/// Numbers compare by value (`NaN` never equals itself); functions and
/// foreign values compare by identity.
pub fn compare(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Buffer(a), Value::Buffer(b)) => a == b,
        (Value::List(a), Value::List(b)) => compare_lists(a, b),
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, item)| b.get(key).is_some_and(|other| compare(item, other)))
        }
        (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
        (Value::Foreign(a), Value::Foreign(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// Element-wise [`compare`] of two lists.
pub fn compare_lists(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| compare(a, b))
}
