//! Editable form sessions for building query documents.
//!
//! `mongoform-form` holds the mutable side of the form: the ordered rows a
//! user adds, removes, clears and edits. After every change the session
//! recompiles its rows with [`mongoform_query::compile`] and passes the result
//! to each registered `on_change` observer, so a host can show the document
//! live or keep it for submission.
//!
//! # Quick Start
//!
//! ```
//! use mongoform_form::{FieldEdit, FormSession};
//! use mongoform_query::FieldType;
//!
//! let mut form = FormSession::new().with_label("New data");
//! form.edit(0, FieldEdit::Name("tags".into())).unwrap();
//! form.edit(0, FieldEdit::Type(FieldType::Array)).unwrap();
//! let doc = form.edit(0, FieldEdit::Value(r#"["a", "b"]"#.into())).unwrap();
//!
//! assert_eq!(serde_json::Value::Object(doc), serde_json::json!({"tags": ["a", "b"]}));
//! ```
//!
//! # Row lifecycle
//!
//! ```text
//! new()        → [default]
//! add_row()    → [..., default]
//! remove_last()→ [...]          (never below one row)
//! clear()      → [default]
//! ```
//!
//! A default row is an empty-named text equality rule.

mod edit;
mod error;
mod session;

pub use edit::FieldEdit;
pub use error::{FormError, Result};
pub use session::{FormRow, FormSession, DEFAULT_LABEL};
