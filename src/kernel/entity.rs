use std::fmt::Debug;
use std::hash::Hash;

/// An object with identity and mutable state.
///
/// Equality is defined over the entity's *identity components*: the fields
/// that decide whether two instances describe the same thing. Most entities
/// return their id; some (such as client registrations) return every attribute.
/// Implement [`Entity::identity_key`] and invoke [`entity_equality!`] to derive
/// `PartialEq`, `Eq` and `Hash` from it.
///
/// [`entity_equality!`]: crate::entity_equality
pub trait Entity: Send + Sync {
    type Id: Clone + Eq + Hash + Debug + Send + Sync;

    /// Borrowed view of the identity components, in declaration order.
    type Key<'a>: Eq + Hash
    where
        Self: 'a;

    fn id(&self) -> &Self::Id;

    fn identity_key(&self) -> Self::Key<'_>;
}

/// Derives `PartialEq`, `Eq` and `Hash` for an [`Entity`] from its identity key.
#[macro_export]
macro_rules! entity_equality {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::kernel::Entity::identity_key(self)
                    == $crate::kernel::Entity::identity_key(other)
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                std::hash::Hash::hash(&$crate::kernel::Entity::identity_key(self), state);
            }
        }
    };
}
