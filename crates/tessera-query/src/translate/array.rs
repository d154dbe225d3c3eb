//! Array membership predicates

use super::{TranslateContext, Translation};
use crate::builder::QueryBuilder;
use crate::expr::Leaf;
use crate::predicate::Attribute;
use tessera_core::PropertyValue;

pub(super) fn translate(
    attribute: &Attribute,
    value: &PropertyValue,
    builder: &mut QueryBuilder,
    ctx: TranslateContext<'_>,
) -> Translation {
    builder.add_leaf(Leaf::ArrayContains {
        name: attribute.name.clone(),
        value: ctx.coerce(attribute.kind, value),
    });
    Translation::Handled
}

#[cfg(test)]
mod tests {
    use crate::evaluator::StaticCandidate;
    use crate::options::CompileOptions;
    use crate::predicate::SearchPredicate;
    use crate::translate::compile;
    use tessera_core::ValueKind;

    #[test]
    fn test_array_membership() {
        let query = compile(
            &[SearchPredicate::array_contains("tags", ValueKind::String, "rust")],
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(query.matches(&StaticCandidate::node(["Doc"]).with("tags", vec!["go", "rust"])));
        assert!(!query.matches(&StaticCandidate::node(["Doc"]).with("tags", vec!["go"])));
        assert!(!query.matches(&StaticCandidate::node(["Doc"])));
    }

    #[test]
    fn test_contains_all_requires_every_element() {
        let preds = SearchPredicate::array_contains_all("scores", ValueKind::Integer, ["1", "3"]);
        let query = compile(&preds, &CompileOptions::default()).unwrap();
        assert!(query.matches(&StaticCandidate::node(["Doc"]).with("scores", vec![1i64, 2, 3])));
        assert!(!query.matches(&StaticCandidate::node(["Doc"]).with("scores", vec![1i64, 2])));
    }
}
