//! Property-based tests for form sessions using proptest.

use mongoform_form::{FieldEdit, FormSession};
use mongoform_query::{compile, ComparisonOperator, FieldType, LogicalOperator};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Add,
    RemoveLast,
    Clear,
    Edit(usize, FieldEdit),
}

fn field_edit() -> impl Strategy<Value = FieldEdit> {
    prop_oneof![
        prop::sample::select(FieldType::ALL.to_vec()).prop_map(FieldEdit::Type),
        "[a-c]{0,2}".prop_map(FieldEdit::Name),
        "[0-9a-z\\[\\]{}\" ]{0,8}".prop_map(FieldEdit::Value),
        prop::sample::select(ComparisonOperator::ALL.to_vec()).prop_map(FieldEdit::Operator),
        prop::sample::select(LogicalOperator::ALL.to_vec()).prop_map(FieldEdit::Logical),
        "[0-9]{0,4}".prop_map(FieldEdit::SecondaryValue),
        prop::sample::select(ComparisonOperator::ALL.to_vec())
            .prop_map(FieldEdit::SecondaryOperator),
    ]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        1 => Just(Action::Add),
        1 => Just(Action::RemoveLast),
        1 => Just(Action::Clear),
        4 => (0usize..4, field_edit()).prop_map(|(i, e)| Action::Edit(i, e)),
    ]
}

fn run(form: &mut FormSession, action: Action) {
    match action {
        Action::Add => {
            form.add_row();
        }
        Action::RemoveLast => {
            form.remove_last();
        }
        Action::Clear => form.clear(),
        Action::Edit(index, edit) => {
            let _ = form.edit(index, edit);
        }
    }
}

proptest! {
    /// No sequence of actions empties a form.
    #[test]
    fn never_fewer_than_one_row(
        allow in any::<bool>(),
        actions in prop::collection::vec(action(), 0..32),
    ) {
        let mut form = FormSession::new().allow_logical_conditions(allow);
        for a in actions {
            run(&mut form, a);
            prop_assert!(form.len() >= 1);
        }
    }

    /// The document is always the compilation of the current rows.
    #[test]
    fn document_matches_rows(
        actions in prop::collection::vec(action(), 0..32),
    ) {
        let mut form = FormSession::new().allow_logical_conditions(true);
        for a in actions {
            run(&mut form, a);
        }
        prop_assert_eq!(form.document(), compile(form.specs()));
    }

    /// Without logical conditions every row stays a single equality rule.
    #[test]
    fn disabled_forms_stay_plain(
        actions in prop::collection::vec(action(), 0..32),
    ) {
        let mut form = FormSession::new();
        for a in actions {
            run(&mut form, a);
        }
        for row in form.rows() {
            prop_assert_eq!(row.spec().comparison_operator, ComparisonOperator::Eq);
            prop_assert!(row.spec().secondary.is_none());
        }
        let doc = form.document();
        prop_assert!(!doc.contains_key("$and"));
        prop_assert!(!doc.contains_key("$or"));
    }

    /// Row ids are unique within a session.
    #[test]
    fn row_ids_unique(actions in prop::collection::vec(action(), 0..32)) {
        let mut form = FormSession::new();
        for a in actions {
            run(&mut form, a);
        }
        let mut ids: Vec<usize> = form.rows().iter().map(|r| r.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), form.len());
    }
}
