//! Issued identifier type and formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A successfully issued identifier, e.g. `VOL-000042`.
///
/// Keeps the raw counter value next to the formatted string so callers
/// that need fixed-width identifiers can detect when the numeric suffix
/// has outgrown the pad width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuedId {
    value: u64,
    formatted: String,
}

impl IssuedId {
    pub(crate) fn new(prefix: &str, value: u64, pad_width: usize) -> Self {
        Self { value, formatted: format!("{prefix}-{value:0pad_width$}") }
    }

    /// The counter value backing this identifier.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The formatted identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.formatted
    }

    /// Consumes the id, returning the formatted string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.formatted
    }
}

impl fmt::Display for IssuedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

impl From<IssuedId> for String {
    fn from(id: IssuedId) -> Self {
        id.formatted
    }
}
