//! Driver path syntax.
//!
//! Paths are absolute and `/`-delimited: `^(/[A-Za-z0-9._-]+)+$`. The
//! components `.` and `..` are rejected so that no path escapes the
//! driver's root. The bare root `/` is only meaningful to `list`.

use crate::error::DriverError;

/// Check that `path` is a valid file or directory path.
pub fn check_path(path: &str) -> Result<(), DriverError> {
    let invalid = || DriverError::InvalidPath {
        path: path.to_string(),
    };

    let rest = path.strip_prefix('/').ok_or_else(invalid)?;
    if rest.is_empty() {
        return Err(invalid());
    }
    for component in rest.split('/') {
        let ok = !component.is_empty()
            && component != "."
            && component != ".."
            && component
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !ok {
            return Err(invalid());
        }
    }
    Ok(())
}

/// Like [`check_path`], but also accepts the root `/`.
pub fn check_list_path(path: &str) -> Result<(), DriverError> {
    if path == "/" {
        return Ok(());
    }
    check_path(path)
}

/// Iterate the relative components of a checked path.
pub(crate) fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        for p in ["/a", "/a/b", "/registry/v2/repositories/a/b/_manifests/tags/latest/current/link"] {
            assert!(check_path(p).is_ok(), "{p}");
        }
    }

    #[test]
    fn test_invalid_paths() {
        for p in ["", "/", "a", "/a/", "//a", "/a//b", "/a/../b", "/./a", "/a b", "/a:b"] {
            assert!(check_path(p).is_err(), "{p:?}");
        }
    }

    #[test]
    fn test_root_is_listable() {
        assert!(check_list_path("/").is_ok());
        assert!(check_path("/").is_err());
    }
}
