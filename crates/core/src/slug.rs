//! Slug value object: URL-safe identifier normalized from a display title.
//!
//! Slugs are immutable and compared by value. A list is addressed by
//! `(owner, slug)`, so normalization must be deterministic.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Normalized, URL-safe identifier derived from a title.
///
/// Normalization: ASCII alphanumerics are lowercased and kept; every other
/// run of characters collapses to a single `-`; leading/trailing `-` are
/// trimmed. Titles that normalize to an empty string are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Normalize a display title into a slug.
    ///
    /// Fails with [`DomainError::InvalidInput`] when the title is empty or
    /// contains no sluggable characters (e.g. `"???"`).
    pub fn from_title(title: &str) -> DomainResult<Self> {
        let normalized = normalize(title);
        if normalized.is_empty() {
            return Err(DomainError::invalid_input(format!(
                "title {title:?} normalizes to an empty slug"
            )));
        }
        Ok(Self(normalized))
    }

    /// Wrap an already-normalized slug (e.g. parsed from a URL path).
    ///
    /// Fails unless the input is its own normal form.
    pub fn parse(s: &str) -> DomainResult<Self> {
        if s.is_empty() || normalize(s) != s {
            return Err(DomainError::invalid_input(format!("not a valid slug: {s:?}")));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    out
}
