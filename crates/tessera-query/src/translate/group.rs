//! Composite predicates
//!
//! AND and OR open a child group and dispatch each member back through the
//! registry. NOT opens nothing: it flags the group currently being built as
//! negated and adds its members to that same group. Under `MustNot` the
//! registry has already opened a negated group for it, so the negation stays
//! scoped to the NOT's own members.

use super::{TranslateContext, Translation, TranslatorRegistry};
use crate::builder::QueryBuilder;
use crate::expr::GroupKind;
use crate::predicate::{GroupOperator, Occurrence, SearchPredicate};
use tessera_core::Result;
use tracing::debug;

pub(super) fn translate(
    registry: &TranslatorRegistry,
    operator: GroupOperator,
    children: &[SearchPredicate],
    occurrence: Occurrence,
    builder: &mut QueryBuilder,
    ctx: TranslateContext<'_>,
) -> Result<Translation> {
    let kind = match operator {
        GroupOperator::And => GroupKind::And,
        GroupOperator::Or => GroupKind::Or,
        GroupOperator::Not => {
            builder.negate_current_group();
            if children.is_empty() {
                // NOT over nothing negates TRUE
                builder.begin_group(GroupKind::And);
                builder.end_group();
            }
            for (i, child) in children.iter().enumerate() {
                registry.dispatch(child, builder, ctx.is_first_in_group && i == 0)?;
            }
            return Ok(Translation::Handled);
        }
    };

    // OR over nothing is false; build it as NOT of an empty AND
    if kind == GroupKind::Or && children.is_empty() {
        debug!(?occurrence, "empty OR composite");
        builder.begin_group(GroupKind::And);
        if occurrence != Occurrence::MustNot {
            builder.negate_current_group();
        }
        builder.end_group();
        return Ok(Translation::Handled);
    }

    builder.begin_group(kind);
    if occurrence == Occurrence::MustNot {
        builder.negate_current_group();
    }
    let outcome = children
        .iter()
        .enumerate()
        .try_for_each(|(i, child)| registry.dispatch(child, builder, i == 0));
    match outcome {
        Ok(()) => builder.end_group(),
        Err(err) => {
            builder.abandon_group();
            return Err(err);
        }
    }

    Ok(Translation::Handled)
}

#[cfg(test)]
mod tests {
    use crate::evaluator::StaticCandidate;
    use crate::options::CompileOptions;
    use crate::predicate::SearchPredicate;
    use crate::translate::compile;
    use tessera_core::{PropertyValue, ValueKind};

    fn status(value: &str) -> SearchPredicate {
        SearchPredicate::equal("status", ValueKind::String, value)
    }

    fn task(value: Option<&str>) -> StaticCandidate {
        let c = StaticCandidate::node(["Task"]);
        match value {
            Some(v) => c.with("status", v),
            None => c,
        }
    }

    #[test]
    fn test_or_group() {
        let query = compile(
            &[SearchPredicate::or(vec![status("open"), status("blocked")])],
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(query.matches(&task(Some("open"))));
        assert!(query.matches(&task(Some("blocked"))));
        assert!(!query.matches(&task(Some("done"))));
    }

    #[test]
    fn test_must_not_negates_opened_group() {
        let query = compile(
            &[SearchPredicate::or(vec![status("open"), status("blocked")]).must_not()],
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(!query.matches(&task(Some("open"))));
        assert!(query.matches(&task(Some("done"))));
    }

    #[test]
    fn test_not_negates_enclosing_group() {
        // AND(:Task, OR(NOT, status = "open", status = "blocked"))
        let query = compile(
            &[
                SearchPredicate::of_type("Task"),
                SearchPredicate::or(vec![SearchPredicate::not(vec![status("open"), status("blocked")])]),
            ],
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(
            query.to_string(),
            "(:Task AND NOT (status = \"open\" OR status = \"blocked\"))"
        );
        assert!(query.matches(&task(Some("done"))));
        assert!(!query.matches(&task(Some("open"))));
        assert!(!query.matches(&StaticCandidate::node(["Dog"]).with("status", "done")));
    }

    #[test]
    fn test_nested_groups() {
        // (age >= 18 AND (status = open OR status IS NULL))
        let query = compile(
            &[SearchPredicate::and(vec![
                SearchPredicate::range("age", ValueKind::Integer, Some(18i64.into()), None),
                SearchPredicate::or(vec![
                    status("open"),
                    SearchPredicate::equal("status", ValueKind::String, PropertyValue::Null),
                ]),
            ])],
            &CompileOptions::default(),
        )
        .unwrap();
        let adult = |s: Option<&str>| task(s).with("age", 30i64);
        assert!(query.matches(&adult(Some("open"))));
        assert!(query.matches(&adult(None)));
        assert!(!query.matches(&adult(Some("done"))));
        assert!(!query.matches(&task(Some("open")).with("age", 3i64)));
    }

    #[test]
    fn test_or_of_dropped_members_is_discarded() {
        let unbounded = || SearchPredicate::range("age", ValueKind::Integer, None, None);
        let query = compile(
            &[
                SearchPredicate::of_type("Task"),
                SearchPredicate::or(vec![unbounded(), unbounded()]),
            ],
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(query.to_string(), "(:Task)");
        assert!(query.matches(&task(None)));
    }

    #[test]
    fn test_must_not_on_not_equal_cancels() {
        let query = compile(
            &[SearchPredicate::comparison(
                "status",
                ValueKind::String,
                crate::predicate::Operation::NotEqual,
                "open",
            )
            .must_not()],
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(query.matches(&task(Some("open"))));
        assert!(!query.matches(&task(Some("done"))));
    }

    #[test]
    fn test_must_not_on_not_composite_is_scoped() {
        let query = compile(
            &[
                SearchPredicate::of_type("Task"),
                SearchPredicate::not(vec![status("open")]).must_not(),
            ],
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(query.to_string(), "(:Task AND NOT (status = \"open\"))");
        assert!(!query.root().negated);
        assert!(query.matches(&task(Some("done"))));
        assert!(!query.matches(&task(Some("open"))));
        assert!(!query.matches(&StaticCandidate::node(["Dog"]).with("status", "done")));
    }

    #[test]
    fn test_empty_composites() {
        let compile_one = |p: SearchPredicate| compile(&[p], &CompileOptions::default()).unwrap();

        assert!(compile_one(SearchPredicate::and(vec![])).matches(&task(None)));
        assert!(!compile_one(SearchPredicate::and(vec![]).must_not()).matches(&task(None)));
        assert!(!compile_one(SearchPredicate::not(vec![])).matches(&task(None)));
        assert!(!compile_one(SearchPredicate::or(vec![])).matches(&task(None)));
        assert!(compile_one(SearchPredicate::or(vec![]).must_not()).matches(&task(None)));
        assert!(!compile_one(SearchPredicate::or(vec![SearchPredicate::not(vec![])])).matches(&task(None)));
        assert_eq!(
            compile_one(SearchPredicate::not(vec![])).to_string(),
            "NOT (TRUE)"
        );
    }

    #[test]
    fn test_unsupported_member_of_or_is_an_error() {
        let err = compile(
            &[SearchPredicate::or(vec![SearchPredicate::spatial(0.0, 0.0, 1.0)])],
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_compile_error());
    }
}
