//! Canonicalization of assembled documents into strict JSON.
//!
//! [`canonicalize`] behaves like encoding the document as strict JSON and
//! decoding it again:
//!
//! - NaN and infinite numbers become `null`
//! - absent object entries are dropped, including inside combinator documents
//! - integral numbers with `|n| <= 2^53` are written as JSON integers, other
//!   finite numbers as JSON floats, and `-0` as `0`
//! - structure and key order are otherwise unchanged
//!
//! This is the only place numeric parse failures turn into `null`.

use serde_json::{Map, Number, Value};

use crate::document::{DocNode, QueryDocument};
use crate::value::{Numeric, TypedValue};

/// The canonical, strict-JSON form of a compiled document.
pub type FinalDocument = Map<String, Value>;

/// Largest magnitude up to which every integer is exactly representable.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Normalizes a document into its strict-JSON form.
pub fn canonicalize(doc: &QueryDocument) -> FinalDocument {
    canonical_object(doc)
}

fn canonical_object(doc: &QueryDocument) -> FinalDocument {
    doc.iter()
        .filter_map(|(key, node)| canonical_node(node).map(|value| (key.to_string(), value)))
        .collect()
}

/// Returns `None` for nodes that encode to nothing.
fn canonical_node(node: &DocNode) -> Option<Value> {
    match node {
        DocNode::Value(value) => Some(canonical_value(value)),
        DocNode::Operator { operator, operand } => match operator.token() {
            Some(token) => {
                let mut tagged = Map::new();
                if let Some(inner) = canonical_node(operand) {
                    tagged.insert(token.to_string(), inner);
                }
                Some(Value::Object(tagged))
            }
            // Equality has no token; its operand is written bare.
            None => canonical_node(operand),
        },
        DocNode::Combinator(parts) => Some(Value::Array(
            parts
                .iter()
                .map(|part| Value::Object(canonical_object(part)))
                .collect(),
        )),
        DocNode::Absent => None,
    }
}

fn canonical_value(value: &TypedValue) -> Value {
    match value {
        TypedValue::Text(s) => Value::String(s.clone()),
        TypedValue::Number(n) => canonical_number(*n),
        TypedValue::Array(items) => Value::Array(items.iter().map(canonical_json).collect()),
        TypedValue::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), canonical_json(v)))
                .collect(),
        ),
    }
}

fn canonical_number(n: Numeric) -> Value {
    match n.as_f64() {
        Some(f) => number_from_f64(f),
        None => Value::Null,
    }
}

fn number_from_f64(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER {
        // `as` maps -0.0 to 0.
        Value::Number(Number::from(f as i64))
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Re-normalizes numbers inside already-parsed JSON the same way.
fn canonical_json(value: &Value) -> Value {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) if (i as f64).abs() <= MAX_EXACT_INTEGER => Value::Number(Number::from(i)),
            (None, Some(u)) if (u as f64) <= MAX_EXACT_INTEGER => Value::Number(Number::from(u)),
            _ => n.as_f64().map(number_from_f64).unwrap_or(Value::Null),
        },
        Value::Array(items) => Value::Array(items.iter().map(canonical_json).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), canonical_json(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::ComparisonOperator;
    use serde_json::json;

    fn doc(pairs: Vec<(&str, DocNode)>) -> QueryDocument {
        pairs.into_iter().collect()
    }

    fn num(n: f64) -> DocNode {
        DocNode::Value(TypedValue::from(n))
    }

    #[test]
    fn invalid_numbers_become_null() {
        let out = canonicalize(&doc(vec![
            ("nan", DocNode::Value(TypedValue::Number(Numeric::INVALID))),
            ("inf", num(f64::INFINITY)),
            ("neg", num(f64::NEG_INFINITY)),
        ]));
        assert_eq!(Value::Object(out), json!({"nan": null, "inf": null, "neg": null}));
    }

    #[test]
    fn integral_numbers_are_integers() {
        let out = canonicalize(&doc(vec![
            ("a", num(5.0)),
            ("b", num(-0.0)),
            ("c", num(2.5)),
            ("d", num(1e20)),
        ]));
        assert_eq!(out["a"], json!(5));
        assert!(out["a"].is_i64());
        assert_eq!(out["b"], json!(0));
        assert_eq!(out["c"], json!(2.5));
        assert!(out["d"].is_f64());
    }

    #[test]
    fn absent_entries_are_dropped() {
        let out = canonicalize(&doc(vec![
            ("kept", num(1.0)),
            ("gone", DocNode::Absent),
            (
                "op",
                DocNode::Operator {
                    operator: ComparisonOperator::Gt,
                    operand: Box::new(DocNode::Absent),
                },
            ),
        ]));
        assert_eq!(Value::Object(out), json!({"kept": 1, "op": {}}));
    }

    #[test]
    fn absent_entries_inside_combinators_are_dropped() {
        let pair = DocNode::Combinator(vec![
            QueryDocument::single("a", DocNode::Absent),
            QueryDocument::single("a", num(1.0)),
        ]);
        let out = canonicalize(&doc(vec![("$or", pair)]));
        assert_eq!(Value::Object(out), json!({"$or": [{}, {"a": 1}]}));
    }

    #[test]
    fn operator_wraps_invalid_number_as_null() {
        let node = DocNode::Operator {
            operator: ComparisonOperator::Lte,
            operand: Box::new(DocNode::Value(TypedValue::Number(Numeric::INVALID))),
        };
        let out = canonicalize(&doc(vec![("age", node)]));
        assert_eq!(Value::Object(out), json!({"age": {"$lte": null}}));
    }

    #[test]
    fn nested_json_numbers_are_normalized() {
        let parsed: Value = serde_json::from_str(r#"[5.0, 1.5, {"n": 2.0}]"#).unwrap();
        let items = parsed.as_array().unwrap().clone();
        let out = canonicalize(&doc(vec![("xs", DocNode::Value(TypedValue::Array(items)))]));
        assert_eq!(out["xs"], json!([5, 1.5, {"n": 2}]));
        assert!(out["xs"][0].is_i64());
    }

    #[test]
    fn key_order_is_preserved() {
        let out = canonicalize(&doc(vec![("z", num(1.0)), ("a", num(2.0)), ("m", num(3.0))]));
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }
}
