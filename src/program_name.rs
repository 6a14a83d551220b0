//! Program name detection for argv[0] support
//!
//! This module provides a function to get the program name as invoked,
//! allowing the tool to respect symlinks. For example, if `sr` is symlinked
//! to some other name, running that name shows it (not a hardcoded "sr") in
//! help and error text.

#[cfg(not(test))]
use std::sync::OnceLock;

#[cfg(not(test))]
static PROGRAM_NAME: OnceLock<String> = OnceLock::new();

/// Get the program name as invoked (respects symlinks)
///
/// Returns the basename of argv[0], falling back to "sr" if unavailable.
/// The value is memoized on first call. In test mode, always returns "sr".
///
/// # Examples
///
/// - Invoked as `sr` → returns `"sr"`
/// - Invoked as `/usr/local/bin/sr` → returns `"sr"`
pub fn program_name() -> &'static str {
    #[cfg(test)]
    {
        "sr"
    }

    #[cfg(not(test))]
    {
        PROGRAM_NAME.get_or_init(|| {
            std::env::args()
                .next()
                .and_then(|s| {
                    std::path::Path::new(&s)
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| "sr".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_returns_sr_in_tests() {
        let name = program_name();
        assert_eq!(name, "sr");
    }

    #[test]
    fn test_program_name_is_consistent() {
        let name1 = program_name();
        let name2 = program_name();
        assert_eq!(name1, name2);
    }
}
