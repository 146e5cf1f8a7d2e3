//! # Identity Newtypes
//!
//! Repository names and tag names both become components of persisted
//! storage paths, so both are validated before any path is computed.
//!
//! ## Grammar
//!
//! - Repository name: one or more `/`-separated components, each matching
//!   `[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*`, at most 255 characters total.
//! - Tag: 1–128 characters of `[A-Za-z0-9_.-]`, not starting with `.` or `-`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of a repository name.
pub const MAX_REPOSITORY_NAME_LEN: usize = 255;

/// Maximum length of a tag.
pub const MAX_TAG_LEN: usize = 128;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// RepositoryName
// ---------------------------------------------------------------------------

/// A validated repository name, e.g. `library/alpine`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Create a repository name, rejecting anything outside the name grammar.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let reject = |reason: &str| ValidationError::InvalidRepositoryName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("name is empty"));
        }
        if name.len() > MAX_REPOSITORY_NAME_LEN {
            return Err(reject("name exceeds 255 characters"));
        }
        for component in name.split('/') {
            check_name_component(component).map_err(|reason| reject(reason))?;
        }
        Ok(Self(name))
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(RepositoryName);

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RepositoryName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn is_name_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Check one `/`-separated component of a repository name.
fn check_name_component(component: &str) -> Result<(), &'static str> {
    if component.is_empty() {
        return Err("empty path component");
    }
    let mut chars = component.chars().peekable();
    let mut separator = String::new();
    let mut seen_alnum = false;

    while let Some(c) = chars.next() {
        if is_name_alnum(c) {
            if !separator.is_empty() {
                let ok = separator == "."
                    || separator == "_"
                    || separator == "__"
                    || separator.chars().all(|s| s == '-');
                if !ok {
                    return Err("invalid separator between name characters");
                }
                separator.clear();
            }
            seen_alnum = true;
        } else if matches!(c, '.' | '_' | '-') {
            if !seen_alnum {
                return Err("component must start with [a-z0-9]");
            }
            separator.push(c);
            if chars.peek().is_none() {
                return Err("component must end with [a-z0-9]");
            }
        } else {
            return Err("component contains characters outside [a-z0-9._-]");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Check that `tag` can be stored as a single path component.
pub fn validate_tag(tag: &str) -> Result<(), ValidationError> {
    let reject = |reason: &str| ValidationError::InvalidTag {
        tag: tag.to_string(),
        reason: reason.to_string(),
    };

    if tag.is_empty() {
        return Err(reject("tag is empty"));
    }
    if tag.len() > MAX_TAG_LEN {
        return Err(reject("tag exceeds 128 characters"));
    }
    if tag.starts_with(['.', '-']) {
        return Err(reject("tag must start with [A-Za-z0-9_]"));
    }
    if !tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(reject("tag contains characters outside [A-Za-z0-9_.-]"));
    }
    Ok(())
}
