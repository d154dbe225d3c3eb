//! Keyword predicates
//!
//! For exact matches on string attributes null and the empty string are
//! interchangeable: a search for either matches both.

use super::{is_null_or_empty, null_or_empty, TranslateContext, Translation};
use crate::builder::QueryBuilder;
use crate::expr::Leaf;
use crate::predicate::Attribute;
use tessera_core::{PropertyValue, ValueKind};

pub(super) fn translate(
    attribute: &Attribute,
    value: &PropertyValue,
    exact: bool,
    builder: &mut QueryBuilder,
    ctx: TranslateContext<'_>,
) -> Translation {
    let name = attribute.name.as_str();
    let is_string = attribute.kind == ValueKind::String;

    if exact || !is_string {
        let value = ctx.coerce(attribute.kind, value);
        if is_string && is_null_or_empty(&value) {
            null_or_empty(name, false, builder);
        } else if value.is_null() {
            builder.add_leaf(Leaf::is_null(name));
        } else {
            builder.add_leaf(Leaf::equals(name, value));
        }
        return Translation::Handled;
    }

    match value {
        PropertyValue::Null => null_or_empty(name, false, builder),
        PropertyValue::String(s) => builder.add_leaf(Leaf::contains(name, s.as_str(), true)),
        other => builder.add_leaf(Leaf::contains(name, other.to_string(), true)),
    }
    Translation::Handled
}
