//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use thiserror::Error;
use uuid::Uuid;

/// Maximum length of a string ID.
pub const MAX_ID_LENGTH: usize = 128;

/// Errors that can occur when parsing an ID.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is empty or only whitespace.
    #[error("id cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string, rejecting empty values
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `parse()`, `as_str()`, `into_inner()`
/// - `FromStr`, `TryFrom<String>`, `AsRef<str>` and `Into<String>`
///
/// # Example
///
/// ```rust
/// # use metalworks_core::define_id;
/// define_id!(GateId);
/// define_id!(RailingId);
///
/// let gate = GateId::parse("gate-1").unwrap();
/// let railing = RailingId::parse("gate-1").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: GateId = railing;
/// # let _ = (gate, railing);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an ID, rejecting empty and oversized values.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is blank or longer than
            /// the maximum ID length.
            pub fn parse(id: impl Into<String>) -> ::core::result::Result<Self, $crate::IdError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err($crate::IdError::Empty);
                }
                if id.len() > $crate::MAX_ID_LENGTH {
                    return Err($crate::IdError::TooLong {
                        max: $crate::MAX_ID_LENGTH,
                    });
                }
                Ok(Self(id))
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(id: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VisitorId);

impl VisitorId {
    /// Generate a fresh random visitor ID (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = ProductId::parse("gate-wrought-01").unwrap();
        assert_eq!(id.as_str(), "gate-wrought-01");
        assert_eq!(id.to_string(), "gate-wrought-01");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductId::parse(""), Err(IdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "x".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            ProductId::parse(long),
            Err(IdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_serde_rejects_empty() {
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
        assert!(serde_json::from_str::<ProductId>("42").is_err());

        let id: ProductId = serde_json::from_str("\"bench-1\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"bench-1\"");
    }

    #[test]
    fn test_visitor_id_generate_is_unique() {
        let a = VisitorId::generate();
        let b = VisitorId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }
}
