//! Key generation from human titles.

use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s|[^a-z0-9\-_])+").expect("Invalid regex pattern"));

/// Turn a title into a vault/item/credential key.
///
/// Lowercases and trims, then replaces every run of whitespace or characters
/// outside `[a-z0-9-_]` with a single `-`.
///
/// # Examples
/// ```
/// use vaultdesk::utils::name_to_slug;
///
/// assert_eq!(name_to_slug("  GitHub Token "), "github-token");
/// ```
pub fn name_to_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_SLUG.replace_all(lowered.trim(), "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_basic() {
        assert_eq!(name_to_slug("Work Email"), "work-email");
        assert_eq!(name_to_slug("already-a_slug"), "already-a_slug");
    }

    #[test]
    fn test_slug_collapses_runs() {
        assert_eq!(name_to_slug("AWS  (prod) / root"), "aws-prod-root");
        assert_eq!(name_to_slug("a\t\nb"), "a-b");
    }

    #[test]
    fn test_slug_non_ascii() {
        assert_eq!(name_to_slug("Café"), "caf-");
        assert_eq!(name_to_slug(""), "");
    }
}
