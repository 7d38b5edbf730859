//! Enforcement severity policy.
//!
//! A type violation is handled according to the active [`Severity`]:
//! abort the mutation, accept with a warning, or accept silently.
//! Severity is a class-level default that subclasses inherit, with
//! per-call overrides on the bulk entry points via
//! [`SeverityOverride`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a type violation is handled.
/// This is the CANONICAL definition - use this everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Abort the mutation with an error (default)
    #[default]
    Raise,
    /// Emit a warning; the item is still stored
    Warn,
    /// Accept the item without any diagnostic
    Silent,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Raise => "raise",
            Severity::Warn => "warn",
            Severity::Silent => "silent",
        }
    }

    /// The integer level for this severity: raise=1, warn=0, silent=-1.
    pub fn as_level(&self) -> i8 {
        match self {
            Severity::Raise => 1,
            Severity::Warn => 0,
            Severity::Silent => -1,
        }
    }

    /// Parse an integer level (raise=1, warn=0, silent=-1).
    pub fn from_level(level: i8) -> Result<Self, String> {
        match level {
            1 => Ok(Severity::Raise),
            0 => Ok(Severity::Warn),
            -1 => Ok(Severity::Silent),
            _ => Err(format!(
                "Invalid severity level: {}. Expected: 1 (raise), 0 (warn), or -1 (silent)",
                level
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raise" => Ok(Severity::Raise),
            "warn" => Ok(Severity::Warn),
            "silent" => Ok(Severity::Silent),
            _ => Err(format!(
                "Invalid severity: '{}'. Expected: raise, warn, or silent",
                s
            )),
        }
    }
}

/// Per-call severity flags for the bulk-validating entry points.
///
/// The flags are mutually exclusive by first-true-wins: `raises` beats
/// `warns` beats `silent`. With no flag set, the call raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityOverride {
    pub raises: bool,
    pub warns: bool,
    pub silent: bool,
}

impl SeverityOverride {
    pub fn raises() -> Self {
        Self {
            raises: true,
            ..Self::default()
        }
    }

    pub fn warns() -> Self {
        Self {
            warns: true,
            ..Self::default()
        }
    }

    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }

    /// Resolve the flags to a severity, first-true-wins, defaulting to
    /// [`Severity::Raise`] when none is set.
    pub fn resolve(self) -> Severity {
        if self.raises {
            Severity::Raise
        } else if self.warns {
            Severity::Warn
        } else if self.silent {
            Severity::Silent
        } else {
            Severity::Raise
        }
    }
}
