//! Identifier predicates

use super::Translation;
use crate::builder::QueryBuilder;
use crate::expr::{Leaf, UuidTarget};
use tracing::debug;

pub(super) fn translate(name: &str, literal: &str, builder: &mut QueryBuilder) -> Translation {
    let target = UuidTarget::parse(literal);
    if target == UuidTarget::Impossible {
        debug!(attribute = name, literal, "malformed identifier literal matches nothing");
    }
    builder.add_leaf(Leaf::UuidEquals {
        name: name.to_string(),
        target,
    });
    Translation::Handled
}
