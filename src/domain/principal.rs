use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity of the party calling a ledger operation.
///
/// The execution context supplies it; services never read it from global state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyPrincipal;

impl fmt::Display for EmptyPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principal must not be empty")
    }
}

impl std::error::Error for EmptyPrincipal {}

impl FromStr for Principal {
    type Err = EmptyPrincipal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EmptyPrincipal);
        }
        Ok(Self::new(trimmed))
    }
}
