//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around identifiers so that a
//! stream id cannot be passed where a user id is expected.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A strongly-typed dataset identifier (a UUID string).
///
/// # Example
///
/// ```
/// use domo_rs::DataSetId;
///
/// let id = DataSetId::new("aa2b6a1a-3f4e-4b2c-9d8e-1f2a3b4c5d6e");
/// println!("DataSet: {}", id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSetId(String);

impl DataSetId {
    /// Create a new dataset id from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the dataset id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DataSetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for DataSetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DataSetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Numeric ids arrive either as JSON numbers or as numeric strings,
/// depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn deserialize_numeric_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid numeric id '{s}'"))),
    }
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new id.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw numeric value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_numeric_id(deserializer).map(Self)
            }
        }
    };
}

numeric_id!(
    /// A stream identifier.
    StreamId
);
numeric_id!(
    /// A stream execution identifier.
    ExecutionId
);
numeric_id!(
    /// A user identifier.
    UserId
);
numeric_id!(
    /// A group identifier.
    GroupId
);
numeric_id!(
    /// A page identifier.
    PageId
);
numeric_id!(
    /// A page collection identifier.
    CollectionId
);
numeric_id!(
    /// A card identifier.
    CardId
);
numeric_id!(
    /// A data account identifier.
    AccountId
);
numeric_id!(
    /// A personalized data policy identifier.
    PolicyId
);
numeric_id!(
    /// A role identifier.
    RoleId
);

/// Part number within a stream execution.
///
/// The uploader uses the starting row of each chunk, so part numbers
/// increase strictly but are not contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartNumber(u64);

impl PartNumber {
    /// Create a part number.
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    /// Get the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PartNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
