//! The assembled query document, before canonicalization.
//!
//! A [`QueryDocument`] is an insertion-ordered map from key to [`DocNode`].
//! Inserting an existing key replaces its node in place, so a key keeps the
//! position of its first insertion while carrying the value of its last.

use crate::op::ComparisonOperator;
use crate::value::TypedValue;

/// One node of a query document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    /// A bare typed value (equality).
    Value(TypedValue),
    /// `{ "$<op>": operand }`.
    Operator {
        operator: ComparisonOperator,
        operand: Box<DocNode>,
    },
    /// Ordered sub-documents under a `$and`/`$or` key.
    Combinator(Vec<QueryDocument>),
    /// A slot with no value, dropped from its object when canonicalized.
    ///
    /// The builder never produces it; it lets hosts that assemble documents
    /// by hand mark an entry to be left out.
    Absent,
}

impl DocNode {
    /// Returns `true` for [`DocNode::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, DocNode::Absent)
    }

    /// Returns the typed value of a bare node.
    pub fn as_value(&self) -> Option<&TypedValue> {
        match self {
            DocNode::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<TypedValue> for DocNode {
    fn from(value: TypedValue) -> Self {
        DocNode::Value(value)
    }
}

/// Wraps a value according to a comparison operator.
///
/// Equality returns the value bare; every other operator returns a
/// single-key object under its `$`-prefixed lowercase name.
///
/// ```
/// use mongoform_query::{wrap, ComparisonOperator, DocNode, TypedValue};
///
/// let bare = wrap(TypedValue::from(5i64), ComparisonOperator::Eq);
/// assert_eq!(bare, DocNode::Value(TypedValue::from(5i64)));
///
/// let tagged = wrap(TypedValue::from(5i64), ComparisonOperator::Gte);
/// assert!(matches!(tagged, DocNode::Operator { operator: ComparisonOperator::Gte, .. }));
/// ```
pub fn wrap(value: TypedValue, operator: ComparisonOperator) -> DocNode {
    if operator.is_equality() {
        DocNode::Value(value)
    } else {
        DocNode::Operator {
            operator,
            operand: Box::new(DocNode::Value(value)),
        }
    }
}

/// Insertion-ordered map of document keys to nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDocument {
    entries: Vec<(String, DocNode)>,
}

impl QueryDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        QueryDocument::default()
    }

    /// Creates a document holding one entry.
    pub fn single(key: impl Into<String>, node: DocNode) -> Self {
        let mut doc = QueryDocument::new();
        doc.insert(key, node);
        doc
    }

    /// Sets `key` to `node`, returning the node it replaced.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, node: DocNode) -> Option<DocNode> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, node)),
            None => {
                self.entries.push((key, node));
                None
            }
        }
    }

    /// Returns the node stored under `key`.
    pub fn get(&self, key: &str) -> Option<&DocNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocNode)> {
        self.entries.iter().map(|(k, node)| (k.as_str(), node))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, DocNode)> for QueryDocument {
    fn from_iter<I: IntoIterator<Item = (K, DocNode)>>(iter: I) -> Self {
        let mut doc = QueryDocument::new();
        for (key, node) in iter {
            doc.insert(key, node);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_stays_bare() {
        assert_eq!(
            wrap(TypedValue::from("a"), ComparisonOperator::Eq),
            DocNode::Value(TypedValue::from("a"))
        );
    }

    #[test]
    fn inequalities_are_tagged() {
        for op in ComparisonOperator::ALL.into_iter().filter(|op| !op.is_equality()) {
            match wrap(TypedValue::from(1i64), op) {
                DocNode::Operator { operator, operand } => {
                    assert_eq!(operator, op);
                    assert_eq!(*operand, DocNode::Value(TypedValue::from(1i64)));
                }
                other => panic!("expected operator node, got {other:?}"),
            }
        }
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut doc = QueryDocument::new();
        doc.insert("a", DocNode::Value(TypedValue::from("1")));
        doc.insert("b", DocNode::Value(TypedValue::from("2")));
        let previous = doc.insert("a", DocNode::Value(TypedValue::from("3")));

        assert_eq!(previous, Some(DocNode::Value(TypedValue::from("1"))));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(doc.get("a"), Some(&DocNode::Value(TypedValue::from("3"))));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn collect_from_pairs() {
        let doc: QueryDocument = vec![("x", DocNode::Absent), ("y", DocNode::Absent)]
            .into_iter()
            .collect();
        assert!(doc.contains_key("x"));
        assert!(doc.get("x").unwrap().is_absent());
        assert!(!doc.contains_key("z"));
    }
}
