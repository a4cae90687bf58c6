//! Field rules as declared on a form row.
//!
//! A [`FieldSpec`] is one user-declared rule: a document key, the type its
//! raw text should be read as, a comparison operator, and optionally a
//! second condition on the same key joined by a [`LogicalOperator`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::op::{ComparisonOperator, LogicalOperator};

/// The type a rule's raw text is converted to.
///
/// The primary and the secondary condition of one rule always share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    /// Text taken verbatim.
    #[default]
    Text,
    /// Leading integer of the text.
    Integer,
    /// JSON array literal.
    Array,
    /// Leading floating-point literal of the text.
    Float,
    /// JSON object literal.
    Object,
}

impl FieldType {
    /// All types, in the order a form presents them.
    pub const ALL: [FieldType; 5] = [
        FieldType::Text,
        FieldType::Integer,
        FieldType::Array,
        FieldType::Float,
        FieldType::Object,
    ];

    /// Returns the uppercase type token.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Integer => "INTEGER",
            FieldType::Array => "ARRAY",
            FieldType::Float => "FLOAT",
            FieldType::Object => "OBJECT",
        }
    }

    /// Returns the human label (`"Text"`, `"Integer"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Integer => "Integer",
            FieldType::Array => "Array",
            FieldType::Float => "Float",
            FieldType::Object => "Object",
        }
    }

    /// Returns `true` for the two numeric types.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::unknown("field type", s))
    }
}

/// Second condition attached to a rule.
///
/// Only emitted when [`logical_operator`](Self::logical_operator) is `AND`
/// or `OR`; with `NONE` the structure may exist but has no effect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecondaryCondition {
    #[serde(default)]
    pub logical_operator: LogicalOperator,
    #[serde(default)]
    pub raw_value: String,
    #[serde(default)]
    pub comparison_operator: ComparisonOperator,
}

impl SecondaryCondition {
    pub fn new(
        logical_operator: LogicalOperator,
        raw_value: impl Into<String>,
        comparison_operator: ComparisonOperator,
    ) -> Self {
        SecondaryCondition {
            logical_operator,
            raw_value: raw_value.into(),
            comparison_operator,
        }
    }

    /// Returns `true` if this condition takes part in the compiled document.
    pub fn is_active(&self) -> bool {
        self.logical_operator.is_active()
    }
}

/// One user-declared rule.
///
/// Neither the name nor its uniqueness is checked; an empty name is a legal
/// document key and a repeated name simply overwrites the earlier entry.
///
/// # Example
///
/// ```
/// use mongoform_query::{ComparisonOperator, FieldSpec, FieldType, LogicalOperator};
///
/// let spec = FieldSpec::new("age", FieldType::Integer, "18")
///     .with_operator(ComparisonOperator::Gte)
///     .with_secondary(LogicalOperator::And, "65", ComparisonOperator::Lt);
///
/// assert!(spec.active_secondary().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub declared_type: FieldType,
    #[serde(default)]
    pub raw_value: String,
    #[serde(default)]
    pub comparison_operator: ComparisonOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SecondaryCondition>,
}

impl FieldSpec {
    /// Creates an equality rule with no second condition.
    pub fn new(name: impl Into<String>, declared_type: FieldType, raw_value: impl Into<String>) -> Self {
        FieldSpec {
            name: name.into(),
            declared_type,
            raw_value: raw_value.into(),
            comparison_operator: ComparisonOperator::Eq,
            secondary: None,
        }
    }

    /// Creates a text equality rule.
    pub fn text(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        FieldSpec::new(name, FieldType::Text, raw_value)
    }

    /// Sets the primary comparison operator.
    pub fn with_operator(mut self, op: ComparisonOperator) -> Self {
        self.comparison_operator = op;
        self
    }

    /// Attaches a second condition on the same key.
    pub fn with_secondary(
        mut self,
        logical_operator: LogicalOperator,
        raw_value: impl Into<String>,
        comparison_operator: ComparisonOperator,
    ) -> Self {
        self.secondary = Some(SecondaryCondition::new(
            logical_operator,
            raw_value,
            comparison_operator,
        ));
        self
    }

    /// Returns the second condition if it is active.
    pub fn active_secondary(&self) -> Option<&SecondaryCondition> {
        self.secondary.as_ref().filter(|s| s.is_active())
    }
}
