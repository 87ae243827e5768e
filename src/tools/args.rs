//! Field readers for loosely typed tool arguments.
//!
//! Tool inputs keep every field as raw JSON so a wrong type becomes one more
//! `field: rule` violation instead of aborting deserialization at the first
//! bad field.

use serde_json::Value;

pub(super) fn required(field: &str, value: Option<Value>, violations: &mut Vec<String>) -> Option<Value> {
    if value.is_none() {
        violations.push(format!("{field}: is required"));
    }
    value
}

pub(super) fn string(field: &str, value: Option<Value>, violations: &mut Vec<String>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Null => None,
        _ => {
            violations.push(format!("{field}: must be a string"));
            None
        }
    }
}

pub(super) fn integer(field: &str, value: Option<Value>, violations: &mut Vec<String>) -> Option<i64> {
    match value? {
        Value::Null => None,
        Value::Number(n) if n.is_i64() => n.as_i64(),
        _ => {
            violations.push(format!("{field}: must be an integer"));
            None
        }
    }
}

pub(super) fn number(field: &str, value: Option<Value>, violations: &mut Vec<String>) -> Option<f64> {
    match value? {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        _ => {
            violations.push(format!("{field}: must be a number"));
            None
        }
    }
}

pub(super) fn boolean(field: &str, value: Option<Value>, violations: &mut Vec<String>) -> Option<bool> {
    match value? {
        Value::Null => None,
        Value::Bool(b) => Some(b),
        _ => {
            violations.push(format!("{field}: must be a boolean"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrong_types_are_reported_by_field() {
        let mut violations = Vec::new();
        assert_eq!(integer("page", Some(json!("two")), &mut violations), None);
        assert_eq!(integer("limit", Some(json!(2.5)), &mut violations), None);
        assert_eq!(number("minPrice", Some(json!(true)), &mut violations), None);
        assert_eq!(boolean("includeImages", Some(json!("yes")), &mut violations), None);
        assert_eq!(string("query", Some(json!(7)), &mut violations), None);
        assert_eq!(
            violations,
            vec![
                "page: must be an integer",
                "limit: must be an integer",
                "minPrice: must be a number",
                "includeImages: must be a boolean",
                "query: must be a string",
            ]
        );
    }

    #[test]
    fn absent_and_null_are_not_violations() {
        let mut violations = Vec::new();
        assert_eq!(integer("page", None, &mut violations), None);
        assert_eq!(string("query", Some(Value::Null), &mut violations), None);
        assert_eq!(number("maxPrice", Some(json!(12)), &mut violations), Some(12.0));
        assert!(violations.is_empty());

        assert_eq!(required("domain", None, &mut violations), None);
        assert_eq!(violations, vec!["domain: is required"]);
    }
}
