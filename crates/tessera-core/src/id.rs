//! Entity identification types for Tessera
//!
//! Every node and relationship carries an [`EntityUuid`]. The canonical text
//! form is 32 lowercase hexadecimal digits; the hyphenated 8-4-4-4-12 layout
//! is accepted on input as well.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of the simple (unhyphenated) canonical form
pub const SIMPLE_LEN: usize = 32;

/// Length of the hyphenated canonical form
pub const HYPHENATED_LEN: usize = 36;

/// Identifier for a node or relationship
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityUuid(Uuid);

impl EntityUuid {
    /// Create a new random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a literal in canonical identifier format.
    ///
    /// Returns `None` for anything that is not exactly 32 hex digits or the
    /// hyphenated 36 character form. Braced and URN forms are rejected even
    /// though the `uuid` crate understands them.
    pub fn parse_canonical(literal: &str) -> Option<Self> {
        let literal = literal.trim();
        match literal.len() {
            SIMPLE_LEN | HYPHENATED_LEN => Uuid::try_parse(literal).ok().map(Self),
            _ => None,
        }
    }

    /// Returns true if the literal is in canonical identifier format
    pub fn is_canonical(literal: &str) -> bool {
        Self::parse_canonical(literal).is_some()
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntityUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityUuid({})", self.0.simple())
    }
}

impl fmt::Display for EntityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl From<Uuid> for EntityUuid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
