//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Conversion rules and movement lines are value objects: two rules with the
/// same units and factor are interchangeable, and a loaded movement line is
/// never mutated, only read.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
