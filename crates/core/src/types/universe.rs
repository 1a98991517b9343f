//! The two top-level product domains of the shop.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level product domain: fashion (`mode`) or general goods (`tout`).
///
/// Stored as the lowercase string on the wire and in both storage
/// backends (`universe CHECK (universe IN ('mode', 'tout'))`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Universe {
    Mode,
    Tout,
}

/// Error returned when parsing an unknown universe string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("universe doit être 'mode' ou 'tout' (reçu: {0})")]
pub struct UniverseParseError(pub String);

impl Universe {
    /// The wire/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::Tout => "tout",
        }
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Universe {
    type Err = UniverseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mode" => Ok(Self::Mode),
            "tout" => Ok(Self::Tout),
            other => Err(UniverseParseError(other.to_string())),
        }
    }
}
