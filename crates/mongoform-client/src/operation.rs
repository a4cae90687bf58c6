//! Backend operations and their request paths.

use std::fmt;

use mongoform_query::FinalDocument;
use serde_json::{Map, Value};

use crate::error::Result;

/// A backend operation, named by its first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Insert,
    Find,
    Update,
    Delete,
    /// Removes every document but keeps the collection.
    Empty,
    /// Removes the collection.
    Drop,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Insert,
        Operation::Find,
        Operation::Update,
        Operation::Delete,
        Operation::Empty,
        Operation::Drop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Find => "find",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Empty => "empty",
            Operation::Drop => "drop",
        }
    }

    /// Returns `true` if the response body is JSON to be parsed.
    pub fn returns_json(&self) -> bool {
        matches!(self, Operation::Find)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON text of a document, or `null` when there is none.
pub(crate) fn document_or_null(doc: Option<&FinalDocument>) -> Result<String> {
    Ok(match doc {
        Some(doc) => serde_json::to_string(doc)?,
        None => "null".to_string(),
    })
}

/// JSON text of a filter, or `{}` when there is none.
pub(crate) fn filter_or_empty(doc: Option<&FinalDocument>) -> Result<String> {
    Ok(match doc {
        Some(doc) => serde_json::to_string(doc)?,
        None => "{}".to_string(),
    })
}

/// JSON text of `{"$set": data}`.
pub(crate) fn set_document(data: Option<&FinalDocument>) -> Result<String> {
    let mut wrapper = Map::new();
    wrapper.insert(
        "$set".to_string(),
        data.map_or(Value::Null, |d| Value::Object(d.clone())),
    );
    Ok(serde_json::to_string(&wrapper)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> FinalDocument {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn names() {
        let names: Vec<_> = Operation::ALL.iter().map(Operation::as_str).collect();
        assert_eq!(names, ["insert", "find", "update", "delete", "empty", "drop"]);
        assert_eq!(Operation::Drop.to_string(), "drop");
    }

    #[test]
    fn only_find_returns_json() {
        for op in Operation::ALL {
            assert_eq!(op.returns_json(), op == Operation::Find);
        }
    }

    #[test]
    fn missing_documents() {
        assert_eq!(document_or_null(None).unwrap(), "null");
        assert_eq!(filter_or_empty(None).unwrap(), "{}");
    }

    #[test]
    fn set_wrapping() {
        let data = doc(json!({"status": "done"}));
        assert_eq!(set_document(Some(&data)).unwrap(), r#"{"$set":{"status":"done"}}"#);
        assert_eq!(set_document(None).unwrap(), r#"{"$set":null}"#);
    }
}
