//! Type predicates

use super::Translation;
use crate::builder::QueryBuilder;
use crate::expr::Leaf;
use tessera_core::Label;

pub(super) fn translate(
    label: &Label,
    source: Option<&Label>,
    target: Option<&Label>,
    builder: &mut QueryBuilder,
) -> Translation {
    match (source, target) {
        (Some(source), Some(target)) => builder.add_leaf(Leaf::LabelMatch {
            label: label.clone(),
            source: Some(source.clone()),
            target: Some(target.clone()),
        }),
        _ => {
            builder.add_leaf(Leaf::label(label.clone()));
            builder.record_type_hint(label.clone());
        }
    }
    Translation::Handled
}
