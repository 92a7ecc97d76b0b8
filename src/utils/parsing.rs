//! Parsing utilities for credential references.

use crate::error::DeskError;

/// Scheme of a credential reference URL.
pub const REF_SCHEME: &str = "vault";

/// Parse a credential reference like "vault://work/github/token".
/// Returns (vault_key, item_key, credential_key).
///
/// With a `default_vault`, the short form "github/token" is accepted too.
///
/// # Examples
/// ```
/// use vaultdesk::utils::parse_credential_ref;
///
/// let (vault, item, cred) = parse_credential_ref("vault://work/github/token", None).unwrap();
/// assert_eq!(vault, "work");
/// assert_eq!(item, "github");
/// assert_eq!(cred, "token");
/// ```
pub fn parse_credential_ref(
    input: &str,
    default_vault: Option<&str>,
) -> Result<(String, String, String), DeskError> {
    let invalid = |reason: &str| {
        DeskError::validation(format!(
            "Invalid credential reference '{}': {}\n\
             Use format: vault://VAULT/ITEM/CREDENTIAL (e.g., vault://personal/github/token)",
            input, reason
        ))
    };

    let (vault, rest) = match input.split_once("://") {
        Some((scheme, path)) => {
            if scheme != REF_SCHEME {
                return Err(invalid(&format!("unknown scheme '{}'", scheme)));
            }
            path.split_once('/')
                .ok_or_else(|| invalid("missing item"))?
        }
        None => match default_vault {
            Some(vault) => (vault, input),
            None => return Err(invalid("no vault given and no default vault configured")),
        },
    };

    let (item, cred) = rest
        .split_once('/')
        .ok_or_else(|| invalid("missing credential"))?;

    if vault.is_empty() || item.is_empty() || cred.is_empty() {
        return Err(invalid("empty segment"));
    }
    if cred.contains('/') {
        return Err(invalid("too many segments"));
    }

    Ok((vault.to_string(), item.to_string(), cred.to_string()))
}

/// Parse an item reference: "vault://work/github", or "github" with a default vault.
pub fn parse_item_ref(
    input: &str,
    default_vault: Option<&str>,
) -> Result<(String, String), DeskError> {
    let invalid = |reason: &str| {
        DeskError::validation(format!(
            "Invalid item reference '{}': {}\n\
             Use format: vault://VAULT/ITEM (e.g., vault://personal/github)",
            input, reason
        ))
    };

    let (vault, item) = match input.split_once("://") {
        Some((scheme, path)) => {
            if scheme != REF_SCHEME {
                return Err(invalid(&format!("unknown scheme '{}'", scheme)));
            }
            path.split_once('/').ok_or_else(|| invalid("missing item"))?
        }
        None => match default_vault {
            Some(vault) => (vault, input),
            None => return Err(invalid("no vault given and no default vault configured")),
        },
    };

    if vault.is_empty() || item.is_empty() {
        return Err(invalid("empty segment"));
    }
    if item.contains('/') {
        return Err(invalid("too many segments"));
    }

    Ok((vault.to_string(), item.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_credential_ref() {
        let (v, i, c) = parse_credential_ref("vault://work/github/token", None).unwrap();
        assert_eq!((v.as_str(), i.as_str(), c.as_str()), ("work", "github", "token"));
    }

    #[test]
    fn test_parse_credential_ref_with_default_vault() {
        let (v, i, c) = parse_credential_ref("github/token", Some("personal")).unwrap();
        assert_eq!(v, "personal");
        assert_eq!(i, "github");
        assert_eq!(c, "token");
    }

    #[test]
    fn test_parse_credential_ref_errors() {
        assert!(parse_credential_ref("github/token", None).is_err());
        assert!(parse_credential_ref("vault://work/github", None).is_err());
        assert!(parse_credential_ref("vault://work//token", None).is_err());
        assert!(parse_credential_ref("vault://work/a/b/c", None).is_err());
        assert!(parse_credential_ref("ssh://work/a/b", None).is_err());
    }

    #[test]
    fn test_parse_item_ref() {
        assert_eq!(
            parse_item_ref("vault://work/github", None).unwrap(),
            ("work".to_string(), "github".to_string())
        );
        assert_eq!(
            parse_item_ref("github", Some("home")).unwrap(),
            ("home".to_string(), "github".to_string())
        );
        assert!(parse_item_ref("vault://work", None).is_err());
        assert!(parse_item_ref("vault://work/a/b", None).is_err());
    }
}
