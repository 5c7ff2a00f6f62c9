//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Records that are referenced from elsewhere (units, products, documents)
/// are compared by identity, never by their attribute values.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` denotes the same entity.
    fn same_entity<E>(&self, other: &E) -> bool
    where
        E: Entity<Id = Self::Id>,
    {
        self.id() == other.id()
    }
}
