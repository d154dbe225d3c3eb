//! Comparison predicates
//!
//! Equality against null or "" on a string attribute tests for either.

use super::{is_null_or_empty, null_or_empty, TranslateContext, Translation};
use crate::builder::QueryBuilder;
use crate::expr::Leaf;
use crate::predicate::{Attribute, Operation};
use tessera_core::{PropertyValue, ValueKind};
use tracing::warn;

pub(super) fn translate(
    attribute: &Attribute,
    operation: Operation,
    value: &PropertyValue,
    builder: &mut QueryBuilder,
    ctx: TranslateContext<'_>,
) -> Translation {
    let name = attribute.name.as_str();
    let value = ctx.coerce(attribute.kind, value);

    let blank_string = attribute.kind == ValueKind::String && is_null_or_empty(&value);

    let leaf = match operation {
        Operation::Equal | Operation::NotEqual if blank_string => {
            null_or_empty(name, operation == Operation::NotEqual, builder);
            return Translation::Handled;
        }
        Operation::Equal if value.is_null() => Leaf::is_null(name),
        Operation::Equal => Leaf::equals(name, value),
        Operation::NotEqual if value.is_null() => Leaf::not(Leaf::is_null(name)),
        Operation::NotEqual => Leaf::not(Leaf::equals(name, value)),
        Operation::IsNull => Leaf::is_null(name),
        Operation::IsNotNull => Leaf::not(Leaf::is_null(name)),
        Operation::Greater
        | Operation::GreaterOrEqual
        | Operation::Less
        | Operation::LessOrEqual => {
            if value.is_null() {
                return Translation::Dropped(format!(
                    "{} comparison on '{}' has no operand",
                    operation, name
                ));
            }
            bound(name, operation, value)
        }
        Operation::CaseInsensitiveContains => {
            let text = match value {
                PropertyValue::String(s) => s,
                PropertyValue::Null => String::new(),
                other => other.to_string(),
            };
            Leaf::contains(name, text, true)
        }
        Operation::StartsWith
        | Operation::EndsWith
        | Operation::Contains
        | Operation::CaseInsensitiveStartsWith
        | Operation::CaseInsensitiveEndsWith => {
            warn!(attribute = name, %operation, "operation is not evaluated; treating as always true");
            Leaf::Passthrough {
                name: name.to_string(),
                operation,
            }
        }
    };

    builder.add_leaf(leaf);
    Translation::Handled
}

fn bound(name: &str, operation: Operation, value: PropertyValue) -> Leaf {
    let (lower, upper, inclusive) = match operation {
        Operation::Greater => (Some(value), None, false),
        Operation::GreaterOrEqual => (Some(value), None, true),
        Operation::Less => (None, Some(value), false),
        _ => (None, Some(value), true),
    };
    let lower_inclusive = inclusive && lower.is_some();
    let upper_inclusive = inclusive && upper.is_some();
    Leaf::Range {
        name: name.to_string(),
        lower,
        upper,
        lower_inclusive,
        upper_inclusive,
    }
}
