//! Single-field edits to a form row.
//!
//! Each control on a row maps to one [`FieldEdit`] variant. Applying an edit
//! mutates exactly one part of the row's [`FieldSpec`].

use mongoform_query::{ComparisonOperator, FieldSpec, FieldType, LogicalOperator, SecondaryCondition};
use serde::{Deserialize, Serialize};

/// A change to one control of a form row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    /// Declared type of both conditions.
    Type(FieldType),
    /// Document key.
    Name(String),
    /// Primary raw value.
    Value(String),
    /// Primary comparison operator.
    Operator(ComparisonOperator),
    /// Selects the logical combinator, resetting the second condition.
    Logical(LogicalOperator),
    /// Raw value of the second condition.
    SecondaryValue(String),
    /// Comparison operator of the second condition.
    SecondaryOperator(ComparisonOperator),
}

impl FieldEdit {
    /// Returns `true` for edits of controls that only exist when logical
    /// conditions are enabled.
    pub fn requires_logical_conditions(&self) -> bool {
        matches!(
            self,
            FieldEdit::Operator(_)
                | FieldEdit::Logical(_)
                | FieldEdit::SecondaryValue(_)
                | FieldEdit::SecondaryOperator(_)
        )
    }

    /// Name of the edited control, for diagnostics.
    pub fn control(&self) -> &'static str {
        match self {
            FieldEdit::Type(_) => "type",
            FieldEdit::Name(_) => "name",
            FieldEdit::Value(_) => "value",
            FieldEdit::Operator(_) => "operator",
            FieldEdit::Logical(_) => "logical",
            FieldEdit::SecondaryValue(_) => "secondary_value",
            FieldEdit::SecondaryOperator(_) => "secondary_operator",
        }
    }

    /// Applies the edit to `spec`.
    ///
    /// Selecting a combinator starts a fresh second condition with an empty
    /// value and the primary's operator. Edits to the second condition are
    /// ignored while the row has none. Returns `true` if `spec` changed.
    pub fn apply(self, spec: &mut FieldSpec) -> bool {
        let before = spec.clone();
        match self {
            FieldEdit::Type(t) => spec.declared_type = t,
            FieldEdit::Name(name) => spec.name = name,
            FieldEdit::Value(raw) => spec.raw_value = raw,
            FieldEdit::Operator(op) => spec.comparison_operator = op,
            FieldEdit::Logical(logical) => {
                spec.secondary = Some(SecondaryCondition::new(
                    logical,
                    String::new(),
                    spec.comparison_operator,
                ));
            }
            FieldEdit::SecondaryValue(raw) => {
                if let Some(secondary) = spec.secondary.as_mut() {
                    secondary.raw_value = raw;
                }
            }
            FieldEdit::SecondaryOperator(op) => {
                if let Some(secondary) = spec.secondary.as_mut() {
                    secondary.comparison_operator = op;
                }
            }
        }
        *spec != before
    }
}
