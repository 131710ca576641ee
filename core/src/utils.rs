//! Utility functions and types.

use std::fmt::Debug;

/// Redacts secrets when printed with `{:?}`.
///
/// - Empty input prints `EMPTY`.
/// - Input shorter than 16 bytes is fully masked as `***`.
/// - Longer input keeps its last four characters, e.g. `***MPLE`, so that
///   two different keys can still be told apart in logs.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("EMPTY");
        }

        match self.0.char_indices().rev().nth(3) {
            Some((idx, _)) if self.0.len() >= 16 => {
                f.write_str("***")?;
                f.write_str(&self.0[idx..])
            }
            _ => f.write_str("***"),
        }
    }
}
