//! Range predicates

use super::{TranslateContext, Translation};
use crate::builder::QueryBuilder;
use crate::expr::Leaf;
use crate::predicate::Attribute;
use tessera_core::PropertyValue;

pub(super) fn translate(
    attribute: &Attribute,
    lower: Option<&PropertyValue>,
    upper: Option<&PropertyValue>,
    (include_lower, include_upper): (bool, bool),
    builder: &mut QueryBuilder,
    ctx: TranslateContext<'_>,
) -> Translation {
    // A null bound is the same as an absent one
    let lower = lower
        .filter(|v| !v.is_null())
        .map(|v| ctx.coerce(attribute.kind, v));
    let upper = upper
        .filter(|v| !v.is_null())
        .map(|v| ctx.coerce(attribute.kind, v));

    if lower.is_none() && upper.is_none() {
        return Translation::Dropped(format!("range on '{}' has no bounds", attribute.name));
    }

    builder.add_leaf(Leaf::Range {
        name: attribute.name.clone(),
        lower_inclusive: include_lower && lower.is_some(),
        upper_inclusive: include_upper && upper.is_some(),
        lower,
        upper,
    });
    Translation::Handled
}

#[cfg(test)]
mod tests {
    use crate::evaluator::StaticCandidate;
    use crate::options::CompileOptions;
    use crate::predicate::SearchPredicate;
    use crate::translate::compile;
    use tessera_core::{PropertyValue, ValueKind};

    fn aged(n: i64) -> StaticCandidate {
        StaticCandidate::node(["Person"]).with("age", n)
    }

    #[test]
    fn test_open_ended_lower() {
        let query = compile(
            &[SearchPredicate::range("age", ValueKind::Integer, Some(5i64.into()), None)],
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(query.to_string(), "(age IN [5, *))");
        assert!(query.matches(&aged(5)));
        assert!(query.matches(&aged(500)));
        assert!(!query.matches(&aged(4)));
    }

    #[test]
    fn test_exclusive_bounds() {
        let query = compile(
            &[SearchPredicate::range_with(
                "age",
                ValueKind::Integer,
                Some(10i64.into()),
                Some(20i64.into()),
                false,
                false,
            )],
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(!query.matches(&aged(10)));
        assert!(query.matches(&aged(15)));
        assert!(!query.matches(&aged(20)));
    }

    #[test]
    fn test_null_bound_is_absent() {
        let query = compile(
            &[SearchPredicate::range(
                "age",
                ValueKind::Integer,
                Some(PropertyValue::Null),
                Some(10i64.into()),
            )],
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(query.to_string(), "(age IN (*, 10])");
        assert!(query.matches(&aged(-3)));
    }

    #[test]
    fn test_unbounded_range_is_dropped() {
        let query = compile(
            &[SearchPredicate::range(
                "age",
                ValueKind::Integer,
                Some(PropertyValue::Null),
                None,
            )],
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(query.is_unconstrained());
    }

    #[test]
    fn test_datetime_bounds_coerced() {
        let query = compile(
            &[SearchPredicate::range(
                "created",
                ValueKind::DateTime,
                Some("2024-01-01".into()),
                None,
            )],
            &CompileOptions::default(),
        )
        .unwrap();
        let c = StaticCandidate::node(["Doc"]).with("created", PropertyValue::DateTime(1_735_689_600_000));
        assert!(query.matches(&c));
        let old = StaticCandidate::node(["Doc"]).with("created", PropertyValue::DateTime(0));
        assert!(!query.matches(&old));
    }
}
