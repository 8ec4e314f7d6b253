//! # Identifiers
//!
//! Fixed-size identifiers with a lowercase hex textual form. The textual form
//! is what the RPC layer receives for finality notifications, so `Display`
//! and `FromStr` must stay symmetric.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an identifier from its hex form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// The input was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    /// The decoded input had the wrong length.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

macro_rules! fixed_id {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name([u8; $len]);

        impl $name {
            /// Size of the identifier in bytes.
            pub const LEN: usize = $len;

            /// Wrap raw bytes.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Borrow the raw bytes.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = hex::decode(s).map_err(|e| ParseIdError::InvalidHex(e.to_string()))?;
                let array: [u8; $len] = bytes.as_slice().try_into().map_err(|_| {
                    ParseIdError::InvalidLength {
                        expected: $len,
                        actual: bytes.len(),
                    }
                })?;
                Ok(Self(array))
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }
    };
}

fixed_id!(
    /// Hash identifying a block in the DAG.
    BlockHash,
    32
);

fixed_id!(
    /// Hash identifying a transaction.
    TransactionId,
    32
);

fixed_id!(
    /// Identifier of the subnetwork a node filters transactions for.
    SubnetworkId,
    20
);

impl SubnetworkId {
    /// The native subnetwork (all zeroes). Full nodes use it by default.
    pub const NATIVE: Self = Self([0u8; 20]);

    /// Whether this is the native subnetwork.
    #[must_use]
    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }
}
