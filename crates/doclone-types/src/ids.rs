//! Typed identifiers for documents and clone records.
//!
//! Both wrap opaque strings: document ids come from whatever host owns the
//! documents, clone ids are registry keys. They serialize as plain strings
//! so stored records stay `{id: string, master: string, slave: string}`.
//!
//! `parse()` rejects values that would be unsafe as storage keys or file
//! names (empty, path separators, control characters). Deserialization goes
//! through the same check.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// A document identifier (opaque, host-assigned).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

/// A clone record identifier (registry key).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CloneId(String);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_string_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Parse and validate an identifier.
            pub fn parse(s: &str) -> Result<Self, TypesError> {
                Self::try_from(s.to_string())
            }

            /// Borrow the raw string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $T {
            type Error = TypesError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                if is_valid_key(&s) {
                    Ok(Self(s))
                } else {
                    Err(TypesError::InvalidId(s))
                }
            }
        }

        impl std::str::FromStr for $T {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$T> for String {
            fn from(id: $T) -> String {
                id.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.0)
            }
        }
    };
}

impl_string_id!(DocumentId, "DocumentId");
impl_string_id!(CloneId, "CloneId");

fn is_valid_key(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && !s.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

impl DocumentId {
    /// Generate a fresh time-ordered id (UUIDv7, hex without hyphens).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().as_simple().to_string())
    }
}

impl CloneId {
    /// Clone id for a numeric registry slot.
    pub fn from_number(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Parse a registry key as a plain non-negative integer.
///
/// Keys like `"+1"`, `" 2"` or `"0x3"` are not numeric.
pub fn numeric_key(key: &str) -> Option<u64> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

// ============================================================================
// Tests
// ============================================================================
