//! Document builder.
//!
//! The builder folds an ordered sequence of [`FieldSpec`]s into a single
//! [`QueryDocument`]. Each rule writes exactly one key:
//!
//! - a rule with an active second condition writes `"$and"` or `"$or"` with
//!   the pair `[{name: primary}, {name: secondary}]`
//! - any other rule writes `name` with its wrapped primary value
//!
//! Writes are last-write-wins. A later rule with the same name, or a later
//! combinator of the same kind, replaces the earlier entry rather than being
//! merged with it.

use tracing::debug;

use crate::canonical::{canonicalize, FinalDocument};
use crate::convert::convert;
use crate::document::{wrap, DocNode, QueryDocument};
use crate::field::FieldSpec;

/// Accumulates rules into a query document.
///
/// # Example
///
/// ```
/// use mongoform_query::{ComparisonOperator, DocumentBuilder, FieldSpec, FieldType, LogicalOperator};
/// use serde_json::json;
///
/// let doc = DocumentBuilder::new()
///     .field(FieldSpec::text("status", "open"))
///     .field(
///         FieldSpec::new("age", FieldType::Integer, "18")
///             .with_operator(ComparisonOperator::Gte)
///             .with_secondary(LogicalOperator::And, "65", ComparisonOperator::Lt),
///     )
///     .compile();
///
/// assert_eq!(
///     serde_json::Value::Object(doc),
///     json!({
///         "status": "open",
///         "$and": [{"age": {"$gte": 18}}, {"age": {"$lt": 65}}]
///     })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    doc: QueryDocument,
    folded: usize,
}

impl DocumentBuilder {
    /// Creates a builder with an empty accumulator.
    pub fn new() -> Self {
        DocumentBuilder::default()
    }

    /// Folds one rule into the accumulator.
    pub fn push(&mut self, spec: &FieldSpec) {
        let primary = wrap(
            convert(spec.declared_type, &spec.raw_value),
            spec.comparison_operator,
        );

        let combinator = spec.active_secondary().and_then(|secondary| {
            secondary
                .logical_operator
                .combinator_key()
                .map(|key| (key, secondary))
        });

        match combinator {
            Some((key, secondary)) => {
                let secondary = wrap(
                    convert(spec.declared_type, &secondary.raw_value),
                    secondary.comparison_operator,
                );
                let pair = vec![
                    QueryDocument::single(spec.name.clone(), primary),
                    QueryDocument::single(spec.name.clone(), secondary),
                ];
                if self.doc.insert(key, DocNode::Combinator(pair)).is_some() {
                    debug!(key, field = %spec.name, "combinator replaced an earlier pair");
                }
            }
            None => {
                if self.doc.insert(spec.name.clone(), primary).is_some() {
                    debug!(field = %spec.name, "field replaced an earlier entry");
                }
            }
        }
        self.folded += 1;
    }

    /// Folds one rule, builder style.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.push(&spec);
        self
    }

    /// Folds every rule of `specs` in order.
    pub fn extend<'a, I>(&mut self, specs: I)
    where
        I: IntoIterator<Item = &'a FieldSpec>,
    {
        for spec in specs {
            self.push(spec);
        }
    }

    /// Number of rules folded so far.
    pub fn folded(&self) -> usize {
        self.folded
    }

    /// Returns the accumulated document.
    pub fn build(self) -> QueryDocument {
        self.doc
    }

    /// Returns the accumulated document in canonical form.
    pub fn compile(self) -> FinalDocument {
        let folded = self.folded;
        let out = canonicalize(&self.doc);
        debug!(fields = folded, keys = out.len(), "compiled query document");
        out
    }
}

/// Folds `specs` in order into one query document.
pub fn build<'a, I>(specs: I) -> QueryDocument
where
    I: IntoIterator<Item = &'a FieldSpec>,
{
    let mut builder = DocumentBuilder::new();
    builder.extend(specs);
    builder.build()
}

/// Builds and canonicalizes `specs`; what every host consumes.
pub fn compile<'a, I>(specs: I) -> FinalDocument
where
    I: IntoIterator<Item = &'a FieldSpec>,
{
    let mut builder = DocumentBuilder::new();
    builder.extend(specs);
    builder.compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use crate::op::{ComparisonOperator, LogicalOperator};
    use crate::value::TypedValue;

    #[test]
    fn empty_sequence_builds_empty_document() {
        let none: &[FieldSpec] = &[];
        assert!(build(none).is_empty());
        assert!(compile(none).is_empty());
    }

    #[test]
    fn plain_rule_writes_its_name() {
        let doc = build(&[FieldSpec::text("name", "ada")]);
        assert_eq!(doc.get("name"), Some(&DocNode::Value(TypedValue::from("ada"))));
    }

    #[test]
    fn combinator_rule_omits_plain_key() {
        let spec = FieldSpec::new("n", FieldType::Integer, "1").with_secondary(
            LogicalOperator::Or,
            "2",
            ComparisonOperator::Eq,
        );
        let doc = build(&[spec]);

        assert!(!doc.contains_key("n"));
        match doc.get("$or") {
            Some(DocNode::Combinator(parts)) => {
                assert_eq!(parts.len(), 2);
                assert!(parts.iter().all(|p| p.contains_key("n")));
            }
            other => panic!("expected combinator, got {other:?}"),
        }
    }

    #[test]
    fn none_combinator_is_plain() {
        let spec = FieldSpec::text("n", "a").with_secondary(
            LogicalOperator::None,
            "b",
            ComparisonOperator::Ne,
        );
        let doc = build(&[spec]);
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["n"]);
    }

    #[test]
    fn secondary_shares_declared_type() {
        let spec = FieldSpec::new("n", FieldType::Float, "1.5").with_secondary(
            LogicalOperator::And,
            "2.5",
            ComparisonOperator::Eq,
        );
        let doc = build(&[spec]);
        let Some(DocNode::Combinator(parts)) = doc.get("$and") else {
            panic!("expected $and");
        };
        assert_eq!(
            parts[1].get("n"),
            Some(&DocNode::Value(TypedValue::from(2.5)))
        );
    }

    #[test]
    fn builder_counts_folded_rules() {
        let mut builder = DocumentBuilder::new();
        builder.extend(&[FieldSpec::text("a", "1"), FieldSpec::text("a", "2")]);
        assert_eq!(builder.folded(), 2);
        assert_eq!(builder.build().len(), 1);
    }
}
