//! String-wrapping identifiers.
//!
//! # Examples
//!
//! ```
//! use conclave_core::models::{ExpertId, RunId};
//!
//! let expert = ExpertId::from("contrarian");
//! assert_eq!(expert.to_string(), "contrarian");
//!
//! let run = RunId::new();
//! assert!(!run.0.is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable expert identifier. Ordering is lexicographic, which the council
/// tie-break relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpertId(pub String);

impl ExpertId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ExpertId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ExpertId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque run identifier scoping every write. Production runs and
/// experimental cohorts never share a run id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// A fresh run id (UUID v4).
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
