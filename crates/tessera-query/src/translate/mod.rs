//! Predicate translation
//!
//! One translator per predicate kind, each appending leaves and groups to a
//! shared [`QueryBuilder`]. The [`TranslatorRegistry`] routes predicates to
//! their translator with a `match` over the closed set of kinds; the group
//! translator calls back into the registry for nested predicates.

mod array;
mod comparison;
mod graph;
mod group;
mod keyword;
mod label;
mod range;
mod spatial;
mod uuid;

use crate::builder::{CompiledQuery, QueryBuilder};
use crate::expr::{GroupKind, Leaf};
use crate::options::{CompileOptions, DroppedPredicatePolicy};
use crate::predicate::{Occurrence, PredicateKind, SearchPredicate};
use tessera_core::{Error, PropertyValue, Result, ValueKind};
use tracing::{debug, trace, warn};

/// Outcome of translating a single predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// At least one leaf was appended
    Handled,
    /// The predicate was too under-specified to translate; nothing appended
    Dropped(String),
    /// No translator can evaluate this kind of predicate
    NotHandled(&'static str),
}

/// Per-call state handed to translators
#[derive(Debug, Clone, Copy)]
pub struct TranslateContext<'a> {
    /// The predicate is the first member of its enclosing group.
    ///
    /// Positional only: no translator emits anything different for the first
    /// member, since group kind alone decides how members combine. It is
    /// carried so nested composites can report positions to `dispatch`.
    pub is_first_in_group: bool,
    pub options: &'a CompileOptions,
}

impl TranslateContext<'_> {
    /// Normalise an operand to the declared kind, if coercion is enabled
    pub fn coerce(&self, kind: ValueKind, value: &PropertyValue) -> PropertyValue {
        if self.options.coerce_operands {
            kind.coerce(value.clone())
        } else {
            value.clone()
        }
    }
}

/// Routes predicates to their translators
#[derive(Debug, Clone, Default)]
pub struct TranslatorRegistry {
    options: CompileOptions,
}

impl TranslatorRegistry {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile an ordered list of predicates into a finished query.
    ///
    /// Top-level predicates become children of the root AND group.
    pub fn compile(&self, predicates: &[SearchPredicate]) -> Result<CompiledQuery> {
        let mut builder = QueryBuilder::new();
        for (i, predicate) in predicates.iter().enumerate() {
            self.dispatch(predicate, &mut builder, i == 0)?;
        }
        let query = builder.finish();
        debug!(
            predicates = predicates.len(),
            passthroughs = query.passthrough_count(),
            hints = query.type_hints().len(),
            "compiled query {}",
            query
        );
        Ok(query)
    }

    /// Translate one predicate into the builder's current group.
    ///
    /// A `MustNot` predicate that does not open a group of its own (a leaf
    /// predicate or a NOT composite) is emitted inside a negated AND group.
    pub fn dispatch(
        &self,
        predicate: &SearchPredicate,
        builder: &mut QueryBuilder,
        is_first_in_group: bool,
    ) -> Result<()> {
        let ctx = TranslateContext {
            is_first_in_group,
            options: &self.options,
        };
        trace!(
            kind = predicate.kind_name(),
            occurrence = ?predicate.occurrence,
            first = is_first_in_group,
            "translating predicate"
        );

        let wrap = predicate.occurrence == Occurrence::MustNot && !predicate.opens_group();
        if wrap {
            builder.begin_group(GroupKind::And);
            builder.negate_current_group();
        }
        let outcome = self.route(predicate, builder, ctx);
        if let Ok(Translation::Dropped(_)) = &outcome {
            builder.mark_dropped();
        }
        if wrap {
            match &outcome {
                Ok(Translation::Handled | Translation::Dropped(_)) => builder.end_group(),
                _ => builder.abandon_group(),
            }
        }

        match outcome? {
            Translation::Handled => Ok(()),
            Translation::Dropped(reason) => match self.options.dropped_predicates {
                DroppedPredicatePolicy::Omit => {
                    warn!(kind = predicate.kind_name(), %reason, "predicate dropped");
                    Ok(())
                }
                DroppedPredicatePolicy::Reject => Err(Error::DroppedPredicate(reason)),
            },
            Translation::NotHandled(kind) => {
                warn!(kind, "unsupported predicate");
                Err(Error::UnsupportedPredicate(format!(
                    "{} predicates cannot be evaluated by this index",
                    kind
                )))
            }
        }
    }

    fn route(
        &self,
        predicate: &SearchPredicate,
        builder: &mut QueryBuilder,
        ctx: TranslateContext<'_>,
    ) -> Result<Translation> {
        let translation = match &predicate.kind {
            PredicateKind::Comparison {
                attribute,
                operation,
                value,
            } => comparison::translate(attribute, *operation, value, builder, ctx),
            PredicateKind::Range {
                attribute,
                lower,
                upper,
                include_lower,
                include_upper,
            } => range::translate(
                attribute,
                lower.as_ref(),
                upper.as_ref(),
                (*include_lower, *include_upper),
                builder,
                ctx,
            ),
            PredicateKind::Keyword {
                attribute,
                value,
                exact,
            } => keyword::translate(attribute, value, *exact, builder, ctx),
            PredicateKind::Type {
                label,
                source,
                target,
            } => label::translate(label, source.as_ref(), target.as_ref(), builder),
            PredicateKind::Uuid { name, literal } => uuid::translate(name, literal, builder),
            PredicateKind::Relationship { name, values } => graph::translate(name, values, builder),
            PredicateKind::ArrayMember { attribute, value } => {
                array::translate(attribute, value, builder, ctx)
            }
            PredicateKind::Spatial {
                latitude,
                longitude,
                distance_km,
            } => spatial::translate(*latitude, *longitude, *distance_km),
            PredicateKind::Group { operator, children } => {
                return group::translate(
                    self,
                    *operator,
                    children,
                    predicate.occurrence,
                    builder,
                    ctx,
                );
            }
        };
        Ok(translation)
    }
}

/// Returns true for the operands that stand for "no value" on a string attribute
pub(super) fn is_null_or_empty(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Null => true,
        PropertyValue::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Append `(name IS NULL OR name = "")`, negated if asked
pub(super) fn null_or_empty(name: &str, negated: bool, builder: &mut QueryBuilder) {
    builder.begin_group(GroupKind::Or);
    if negated {
        builder.negate_current_group();
    }
    builder.add_leaf(Leaf::is_null(name));
    builder.add_leaf(Leaf::equals(name, ""));
    builder.end_group();
}

/// Compile predicates with the given options
pub fn compile(predicates: &[SearchPredicate], options: &CompileOptions) -> Result<CompiledQuery> {
    TranslatorRegistry::new(options.clone()).compile(predicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::StaticCandidate;

    fn person(age: i64) -> StaticCandidate {
        StaticCandidate::node(["Person"]).with("age", age)
    }

    #[test]
    fn test_top_level_predicates_are_anded() {
        let query = compile(
            &[
                SearchPredicate::of_type("Person"),
                SearchPredicate::range("age", ValueKind::Integer, Some(18i64.into()), None),
            ],
            &CompileOptions::default(),
        )
        .unwrap();

        assert!(!query.matches(&person(17)));
        assert!(query.matches(&person(18)));
        assert!(!query.matches(&StaticCandidate::node(["Dog"]).with("age", 20i64)));
    }

    #[test]
    fn test_must_not_wraps_leaf() {
        let query = compile(
            &[SearchPredicate::equal("name", ValueKind::String, "Bob").must_not()],
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(query.to_string(), "(NOT (name = \"Bob\"))");
        assert!(query.matches(&StaticCandidate::node(["Person"]).with("name", "Alice")));
        assert!(!query.matches(&StaticCandidate::node(["Person"]).with("name", "Bob")));
    }

    #[test]
    fn test_dropped_predicate_omitted_by_default() {
        let query = compile(
            &[SearchPredicate::range("age", ValueKind::Integer, None, None)],
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(query.is_unconstrained());
    }

    #[test]
    fn test_dropped_must_not_predicate_leaves_no_trace() {
        let query = compile(
            &[SearchPredicate::range("age", ValueKind::Integer, None, None).must_not()],
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(query.is_unconstrained());
        assert!(query.matches(&person(1)));
    }

    #[test]
    fn test_dropped_predicate_rejected_when_strict() {
        let err = compile(
            &[SearchPredicate::range("age", ValueKind::Integer, None, None)],
            &CompileOptions::strict(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::DroppedPredicate(_)));
        assert!(err.is_compile_error());
    }

    #[test]
    fn test_spatial_is_unsupported() {
        let err = compile(
            &[SearchPredicate::spatial(52.5, 13.4, 10.0)],
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedPredicate(_)));
        assert!(err.is_compile_error());
    }

    #[test]
    fn test_nested_unsupported_propagates() {
        let err = compile(
            &[SearchPredicate::or(vec![
                SearchPredicate::of_type("Person"),
                SearchPredicate::spatial(0.0, 0.0, 1.0),
            ])],
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedPredicate(_)));
    }

    #[test]
    fn test_first_in_group_does_not_change_the_tree() {
        let registry = TranslatorRegistry::default();
        let predicates = [
            SearchPredicate::keyword("name", ValueKind::String, "", true),
            SearchPredicate::not(vec![SearchPredicate::of_type("Dog")]).must_not(),
            SearchPredicate::or(vec![SearchPredicate::equal("age", ValueKind::Integer, 3i64)]),
        ];
        for predicate in &predicates {
            let build = |first: bool| {
                let mut builder = QueryBuilder::new();
                registry.dispatch(predicate, &mut builder, first).unwrap();
                builder.finish()
            };
            assert_eq!(build(true), build(false));
        }
    }

    #[test]
    fn test_dropped_member_inside_must_not_not_composite() {
        let query = compile(
            &[
                SearchPredicate::of_type("Person"),
                SearchPredicate::not(vec![SearchPredicate::range("age", ValueKind::Integer, None, None)])
                    .must_not(),
            ],
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(query.to_string(), "(:Person)");
        assert!(query.matches(&person(1)));
    }

    #[test]
    fn test_coercion_can_be_disabled() {
        let range = SearchPredicate::range("age", ValueKind::Integer, Some("18".into()), None);

        let coerced = compile(std::slice::from_ref(&range), &CompileOptions::default()).unwrap();
        assert!(coerced.matches(&person(20)));

        let raw = compile(&[range], &CompileOptions::default().coerce_operands(false)).unwrap();
        assert!(!raw.matches(&person(20)));
    }
}
