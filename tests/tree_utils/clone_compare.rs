use filth_rust::{compare, deep_clone, type_name, CloneError, Foreign, Function, Value};

use crate::support::{document, json};

#[test]
fn clone_compares_equal_to_original() {
    let original = document();
    let copy = deep_clone(&original).unwrap();
    assert!(compare(&copy, &original));
    assert!(compare(&original, &copy));
    assert_eq!(copy, original);
}

#[test]
fn mutating_clone_leaves_original_alone() {
    let original = document();
    let mut copy = deep_clone(&original).unwrap();

    if let Value::Map(map) = &mut copy {
        if let Some(Value::Map(shipping)) = map.get_mut("shipping") {
            shipping.insert("express".into(), Value::Bool(true));
        }
        if let Some(Value::Buffer(bytes)) = map.get_mut("signature") {
            bytes[0] = 0;
        }
    }

    assert!(!compare(&copy, &original));
    assert!(original
        .get("shipping")
        .and_then(|s| s.get("express"))
        .is_none());
    match original.get("signature") {
        Some(Value::Buffer(bytes)) => assert_eq!(bytes[0], 0xde),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn cloning_a_function_fails() {
    let f = Value::Function(Function::new(|_| Value::Undefined));
    assert_eq!(deep_clone(&f).unwrap_err(), CloneError::Function);
    assert_eq!(CloneError::Function.to_string(), "cannot clone functions");
}

#[test]
fn cloning_a_foreign_value_fails_with_its_type() {
    let mut value = json(r#"{"when": null}"#);
    if let Value::Map(map) = &mut value {
        map.insert("when".into(), Value::Foreign(Foreign::new("date", 0u64)));
    }
    assert_eq!(
        deep_clone(&value).unwrap_err(),
        CloneError::Unsupported("date".into())
    );
}

#[test]
fn compare_ignores_key_order_but_not_values() {
    let a = json(r#"{"x": 1, "y": {"p": [1, 2], "q": "s"}}"#);
    let b = json(r#"{"y": {"q": "s", "p": [1, 2]}, "x": 1}"#);
    let c = json(r#"{"y": {"q": "s", "p": [2, 1]}, "x": 1}"#);
    assert!(compare(&a, &b));
    assert!(!compare(&a, &c));
}

#[test]
fn type_names_of_document_fields() {
    let doc = document();
    let names: Vec<(&str, &str)> = doc
        .as_map()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.as_str(), type_name(v)))
        .collect();
    assert_eq!(
        names,
        vec![
            ("id", "string"),
            ("lines", "array"),
            ("notes", "null"),
            ("paid", "boolean"),
            ("shipping", "object"),
            ("signature", "buffer"),
            ("total", "number"),
        ]
    );
}
