use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

use super::Failure;

/// An immutable, non-empty string identifier compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Fails when `id` is empty or only whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, Failure> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Failure::new("Identity value cannot be empty."));
        }
        Ok(Self(id))
    }

    /// A fresh random identity (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = Failure;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identity::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declares a typed identity wrapping [`Identity`].
///
/// Typed identities keep keys of different aggregates apart at compile time,
/// while [`AsRef<Identity>`] and `PartialEq<Identity>` still compare them by
/// their underlying value.
#[macro_export]
macro_rules! typed_identity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($crate::kernel::Identity);

        impl $name {
            pub fn new(id: impl Into<String>) -> Result<Self, $crate::kernel::Failure> {
                $crate::kernel::Identity::new(id).map(Self)
            }

            pub fn generate() -> Self {
                Self($crate::kernel::Identity::generate())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            pub fn identity(&self) -> &$crate::kernel::Identity {
                &self.0
            }
        }

        impl AsRef<$crate::kernel::Identity> for $name {
            fn as_ref(&self) -> &$crate::kernel::Identity {
                &self.0
            }
        }

        impl From<$crate::kernel::Identity> for $name {
            fn from(identity: $crate::kernel::Identity) -> Self {
                Self(identity)
            }
        }

        impl From<$name> for $crate::kernel::Identity {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl PartialEq<$crate::kernel::Identity> for $name {
            fn eq(&self, other: &$crate::kernel::Identity) -> bool {
                &self.0 == other
            }
        }

        impl PartialEq<$name> for $crate::kernel::Identity {
            fn eq(&self, other: &$name) -> bool {
                self == &other.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::kernel::Failure;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::new(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}
