//! mongoform-query - compiles form rules into MongoDB-style query documents.
//!
//! A form row declares a key, the type its text should be read as, a
//! comparison operator, and optionally a second condition joined by `AND` or
//! `OR`. This crate turns an ordered list of such rows into one document:
//!
//! - Text is converted per declared type, with a fallback for every failure
//! - Equality is emitted bare, other comparisons as `{"$<op>": value}`
//! - Rows fold in order into one map; later writes replace earlier ones
//! - A final canonicalization pass produces strict JSON
//!
//! # Quick Start
//!
//! ```rust
//! use mongoform_query::{compile, ComparisonOperator, FieldSpec, FieldType, LogicalOperator};
//! use serde_json::json;
//!
//! let rows = vec![
//!     FieldSpec::new("age", FieldType::Integer, "5").with_operator(ComparisonOperator::Gte),
//!     FieldSpec::new("score", FieldType::Float, "oops"),
//!     FieldSpec::new("tag", FieldType::Text, "a")
//!         .with_secondary(LogicalOperator::Or, "b", ComparisonOperator::Eq),
//! ];
//!
//! let doc = compile(&rows);
//! assert_eq!(
//!     serde_json::Value::Object(doc),
//!     json!({
//!         "age": {"$gte": 5},
//!         "score": null,
//!         "$or": [{"tag": "a"}, {"tag": "b"}]
//!     })
//! );
//! ```
//!
//! # Pipeline
//!
//! ```text
//! FieldSpec ─ convert ─▶ TypedValue ─ wrap ─▶ DocNode ─ build ─▶ QueryDocument ─ canonicalize ─▶ FinalDocument
//! ```
//!
//! # Conversion
//!
//! | Type | Operators | Fallback |
//! |------|-----------|----------|
//! | Text | all | n/a |
//! | Integer | all | `null` |
//! | Float | all | `null` |
//! | Array | all | `[]` |
//! | Object | all | `{}` |
//!
//! Compilation never fails. Collisions between keys are not errors: the last
//! rule writing a key wins, including the shared `$and`/`$or` keys.

mod builder;
mod canonical;
mod convert;
mod document;
mod error;
mod field;
mod op;
mod value;

// Re-export public API
pub use builder::{build, compile, DocumentBuilder};
pub use canonical::{canonicalize, FinalDocument};
pub use convert::convert;
pub use document::{wrap, DocNode, QueryDocument};
pub use error::{QueryError, Result};
pub use field::{FieldSpec, FieldType, SecondaryCondition};
pub use op::{ComparisonOperator, LogicalOperator};
pub use value::{Numeric, TypedValue};
