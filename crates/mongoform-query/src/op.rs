//! Comparison and logical operators for field rules.
//!
//! [`ComparisonOperator`] decides how a single value is emitted (bare for
//! equality, `{"$<op>": value}` otherwise). [`LogicalOperator`] decides whether
//! a rule's second condition is active and under which key it is emitted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Comparison operator applied to a field's value.
///
/// Equality is implicit in the target query language, so only the
/// inequality family produces an operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComparisonOperator {
    /// Equal. Emitted as the bare value.
    #[default]
    Eq,
    /// Less than (`$lt`).
    Lt,
    /// Less than or equal (`$lte`).
    Lte,
    /// Greater than (`$gt`).
    Gt,
    /// Greater than or equal (`$gte`).
    Gte,
    /// Not equal (`$ne`).
    Ne,
}

impl ComparisonOperator {
    /// All operators, in the order a form presents them.
    pub const ALL: [ComparisonOperator; 6] = [
        ComparisonOperator::Eq,
        ComparisonOperator::Lte,
        ComparisonOperator::Lt,
        ComparisonOperator::Gt,
        ComparisonOperator::Gte,
        ComparisonOperator::Ne,
    ];

    /// Returns `true` for the equality operator.
    pub fn is_equality(self) -> bool {
        matches!(self, ComparisonOperator::Eq)
    }

    /// Returns the lowercase operator name.
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "eq",
            ComparisonOperator::Lt => "lt",
            ComparisonOperator::Lte => "lte",
            ComparisonOperator::Gt => "gt",
            ComparisonOperator::Gte => "gte",
            ComparisonOperator::Ne => "ne",
        }
    }

    /// Returns the query-language token (`$lt`, `$gte`, ...).
    ///
    /// Equality has no token since it is emitted bare.
    pub fn token(self) -> Option<&'static str> {
        match self {
            ComparisonOperator::Eq => None,
            ComparisonOperator::Lt => Some("$lt"),
            ComparisonOperator::Lte => Some("$lte"),
            ComparisonOperator::Gt => Some("$gt"),
            ComparisonOperator::Gte => Some("$gte"),
            ComparisonOperator::Ne => Some("$ne"),
        }
    }

    /// Returns the symbol shown next to a form row.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Ne => "!=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComparisonOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonOperator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::unknown("comparison operator", s))
    }
}

/// Logical combinator joining a rule's two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    /// No combinator; the second condition is ignored.
    #[default]
    None,
    /// Either condition may hold (`$or`).
    Or,
    /// Both conditions must hold (`$and`).
    And,
}

impl LogicalOperator {
    /// All combinators, in the order a form presents them.
    pub const ALL: [LogicalOperator; 3] = [
        LogicalOperator::None,
        LogicalOperator::Or,
        LogicalOperator::And,
    ];

    /// Returns `true` if a second condition joined by this operator is emitted.
    pub fn is_active(self) -> bool {
        !matches!(self, LogicalOperator::None)
    }

    /// Returns the document key the joined pair is written under.
    pub fn combinator_key(self) -> Option<&'static str> {
        match self {
            LogicalOperator::None => None,
            LogicalOperator::And => Some("$and"),
            LogicalOperator::Or => Some("$or"),
        }
    }

    /// Returns the uppercase operator name.
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::None => "NONE",
            LogicalOperator::Or => "OR",
            LogicalOperator::And => "AND",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogicalOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalOperator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::unknown("logical operator", s))
    }
}
