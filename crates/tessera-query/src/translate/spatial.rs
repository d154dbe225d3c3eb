//! Spatial predicates
//!
//! The in-memory index keeps no geometry, so distance predicates are always
//! reported as unsupported.

use super::Translation;

pub(super) fn translate(latitude: f64, longitude: f64, distance_km: f64) -> Translation {
    tracing::trace!(latitude, longitude, distance_km, "spatial predicate");
    Translation::NotHandled("spatial")
}
