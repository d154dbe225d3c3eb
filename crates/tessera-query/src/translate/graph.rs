//! Relationship existence predicates
//!
//! An operand list that is empty or holds only blank values asks for
//! entities with no relationship of that name, never for "any related
//! entity".

use super::Translation;
use crate::builder::QueryBuilder;
use crate::expr::Leaf;
use tessera_core::{PropertyValue, ValueKind};

pub(super) fn translate(name: &str, values: &[PropertyValue], builder: &mut QueryBuilder) -> Translation {
    let expected: Vec<PropertyValue> = values
        .iter()
        .filter(|v| !v.is_blank())
        .map(|v| ValueKind::Identifier.coerce(v.clone()))
        .collect();

    let leaf = if expected.is_empty() {
        Leaf::RelationshipAbsence {
            name: name.to_string(),
        }
    } else {
        Leaf::RelationshipPresence {
            name: name.to_string(),
            expected,
        }
    };
    builder.add_leaf(leaf);
    Translation::Handled
}
