//! Form sessions.
//!
//! A [`FormSession`] owns the ordered rows of one form and recompiles the
//! query document after every change, handing it to registered observers.
//! The document has no state of its own; it is always `compile(rows)`.

use std::fmt;

use mongoform_query::{compile, FieldSpec, FinalDocument};
use tracing::debug;

use crate::edit::FieldEdit;
use crate::error::{FormError, Result};

/// Label used when none is given.
pub const DEFAULT_LABEL: &str = "Data";

/// Observer called with the freshly compiled document.
type ChangeFn = Box<dyn FnMut(&FinalDocument) + Send>;

/// One row of a form: a stable id and the rule it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    id: usize,
    spec: FieldSpec,
}

impl FormRow {
    /// Stable identifier, unique within its session.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The rule this row declares.
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }
}

/// An editable form whose rows compile into one query document.
///
/// A session always holds at least one row. New rows are empty text
/// equality rules.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use mongoform_form::{FieldEdit, FormSession};
/// use mongoform_query::{ComparisonOperator, FieldType};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let mut form = FormSession::new().allow_logical_conditions(true);
/// form.on_change(move |doc| sink.lock().unwrap().push(doc.clone()));
///
/// form.edit(0, FieldEdit::Name("age".into())).unwrap();
/// form.edit(0, FieldEdit::Type(FieldType::Integer)).unwrap();
/// form.edit(0, FieldEdit::Value("21".into())).unwrap();
/// let doc = form.edit(0, FieldEdit::Operator(ComparisonOperator::Gt)).unwrap();
///
/// assert_eq!(serde_json::Value::Object(doc), serde_json::json!({"age": {"$gt": 21}}));
/// assert_eq!(seen.lock().unwrap().len(), 4);
/// ```
pub struct FormSession {
    label: String,
    logical_conditions: bool,
    rows: Vec<FormRow>,
    next_id: usize,
    observers: Vec<ChangeFn>,
}

impl FormSession {
    /// Creates a session with one default row.
    pub fn new() -> Self {
        let mut session = Self {
            label: DEFAULT_LABEL.to_string(),
            logical_conditions: false,
            rows: Vec::new(),
            next_id: 0,
            observers: Vec::new(),
        };
        session.push_default_row();
        session
    }

    /// Creates a session seeded with `specs`.
    ///
    /// An empty list still yields one default row.
    pub fn from_specs(specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        let mut session = Self::new();
        session.rows.clear();
        for spec in specs {
            session.push_row(spec);
        }
        if session.rows.is_empty() {
            session.push_default_row();
        }
        session
    }

    /// Sets the label shown for this form.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Enables operator and combinator controls.
    ///
    /// Without them every row is a plain equality rule and the matching
    /// edits are rejected.
    pub fn allow_logical_conditions(mut self, allow: bool) -> Self {
        self.logical_conditions = allow;
        self
    }

    /// Registers an observer for document changes.
    ///
    /// Observers run in registration order after every mutation.
    pub fn on_change<F>(&mut self, observer: F)
    where
        F: FnMut(&FinalDocument) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn logical_conditions_allowed(&self) -> bool {
        self.logical_conditions
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    /// Iterates the rules in row order.
    pub fn specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.rows.iter().map(FormRow::spec)
    }

    /// Number of rows, never zero.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if [`remove_last`](Self::remove_last) would remove a row.
    pub fn can_remove(&self) -> bool {
        self.rows.len() > 1
    }

    /// Compiles the current rows.
    pub fn document(&self) -> FinalDocument {
        compile(self.specs())
    }

    /// Appends a default row and returns its id.
    pub fn add_row(&mut self) -> usize {
        let id = self.push_default_row();
        debug!(form = %self.label, id, rows = self.rows.len(), "added row");
        self.notify();
        id
    }

    /// Removes the last row unless it is the only one.
    ///
    /// Returns the removed row.
    pub fn remove_last(&mut self) -> Option<FormRow> {
        if !self.can_remove() {
            return None;
        }
        let removed = self.rows.pop();
        debug!(form = %self.label, rows = self.rows.len(), "removed last row");
        self.notify();
        removed
    }

    /// Resets the form to a single default row.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.push_default_row();
        debug!(form = %self.label, "cleared form");
        self.notify();
    }

    /// Applies an edit to the row at `index` and returns the new document.
    pub fn edit(&mut self, index: usize, edit: FieldEdit) -> Result<FinalDocument> {
        if edit.requires_logical_conditions() && !self.logical_conditions {
            return Err(FormError::LogicalConditionsDisabled {
                label: self.label.clone(),
            });
        }

        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or_else(|| FormError::out_of_range(index, len))?;

        let control = edit.control();
        let changed = edit.apply(&mut row.spec);
        debug!(form = %self.label, row = row.id, control, changed, "edited row");

        Ok(self.notify())
    }

    /// Applies an edit to the row with the given id.
    pub fn edit_by_id(&mut self, id: usize, edit: FieldEdit) -> Result<FinalDocument> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(FormError::UnknownRow { id })?;
        self.edit(index, edit)
    }

    fn push_default_row(&mut self) -> usize {
        self.push_row(FieldSpec::default())
    }

    fn push_row(&mut self, spec: FieldSpec) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(FormRow { id, spec });
        id
    }

    fn notify(&mut self) -> FinalDocument {
        let doc = compile(self.rows.iter().map(FormRow::spec));
        for observer in &mut self.observers {
            observer(&doc);
        }
        doc
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("label", &self.label)
            .field("logical_conditions", &self.logical_conditions)
            .field("rows", &self.rows)
            .field("observers", &self.observers.len())
            .finish()
    }
}
