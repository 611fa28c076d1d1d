//! Role tags.
//!
//! A role gates which surfaces and actions a session may use. The set is
//! closed: anything the backend reports outside of it is rejected rather
//! than carried through as an opaque string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The role claim attached to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A member of the public reporting road damage.
    Citizen,
    /// A municipal official verifying, assigning and monitoring repairs.
    Official,
}

impl Role {
    /// Every known role, in declaration order.
    pub const ALL: [Self; 2] = [Self::Citizen, Self::Official];

    /// The wire and storage form of the role tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Official => "official",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(Self::Citizen),
            "official" => Ok(Self::Official),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}
