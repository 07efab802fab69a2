//! Strongly-typed identifiers used across the domain.
//!
//! Catalog, branch, user and sale identifiers are short human-assigned codes
//! (`"p1"`, `"f2"`, `"u3"`), so they wrap a `String`. Chat messages are minted
//! at runtime and use time-ordered UUIDs.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

/// Identifier of a pharmacy branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchId(String);

/// Identifier of a staff user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

/// Identifier of a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SaleId(String);

/// Identifier of an assistant conversation message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

macro_rules! impl_code_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Build an identifier from a code, rejecting blank input.
            pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
                let code = code.into();
                if code.trim().is_empty() {
                    return Err(DomainError::invalid_id(concat!($name, ": empty code")));
                }
                Ok(Self(code))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_code_newtype!(ProductId, "ProductId");
impl_code_newtype!(BranchId, "BranchId");
impl_code_newtype!(UserId, "UserId");
impl_code_newtype!(SaleId, "SaleId");

impl MessageId {
    /// Mint a new time-ordered message identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for MessageId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_codes_are_rejected() {
        let err = ProductId::new("   ").unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("ProductId")),
            _ => panic!("Expected InvalidId for blank code"),
        }
    }

    #[test]
    fn codes_round_trip_through_display_and_from_str() {
        let id: BranchId = "f2".parse().unwrap();
        assert_eq!(id.to_string(), "f2");
        assert_eq!(id.as_str(), "f2");
    }

    #[test]
    fn serde_rejects_blank_codes() {
        let ok: UserId = serde_json::from_str("\"u1\"").unwrap();
        assert_eq!(ok.as_str(), "u1");
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }

    #[test]
    fn message_ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a code survives JSON as a bare string.
            #[test]
            fn product_id_serde_round_trip(code in "[a-zA-Z0-9-]{1,16}") {
                let id = ProductId::new(code.clone()).unwrap();
                let json = serde_json::to_string(&id).unwrap();
                prop_assert_eq!(&json, &format!("\"{code}\""));
                prop_assert_eq!(serde_json::from_str::<ProductId>(&json).unwrap(), id);
            }

            /// Property: whitespace-only codes are never accepted.
            #[test]
            fn blank_codes_never_parse(code in "[ \t]{0,8}") {
                prop_assert!(ProductId::new(code).is_err());
            }
        }
    }
}
