//! Unified error type for vaultdesk.
//!
//! All public APIs return `Result<T, DeskError>`. The backend reports every
//! failure as a plain message string, so `Backend` carries nothing but that
//! message and its `Display` is the message verbatim. Callers that need to
//! branch on the kind of failure match on the text (see
//! [`DeskError::is_vault_not_found`]).

use std::fmt;

/// Message fragment the backend uses when a requested vault does not exist.
pub const VAULT_NOT_FOUND: &str = "Vault not found";

/// The unified error type for all vaultdesk operations.
#[derive(Debug)]
pub enum DeskError {
    // ── I/O & filesystem ───────────────────────────────────────────────
    /// Filesystem or terminal I/O failed.
    Io(std::io::Error),

    // ── Serialization ──────────────────────────────────────────────────
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),

    /// KDL config file parsing error.
    Config(String),

    // ── Backend channel ────────────────────────────────────────────────
    /// The connection to the backend failed, closed, or timed out.
    Transport(String),

    /// The backend rejected a call. The message is all we get.
    Backend(String),

    // ── Lookup errors ──────────────────────────────────────────────────
    /// A vault, item, or credential was not found locally.
    NotFound(String),

    // ── User interaction ───────────────────────────────────────────────
    /// The user cancelled an interactive operation.
    Cancelled,

    /// User input validation failed.
    Validation(String),

    // ── Catch-all ──────────────────────────────────────────────────────
    /// Any other error.
    Other(String),
}

// ── Display ────────────────────────────────────────────────────────────

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeskError::Io(e) => write!(f, "{}", e),
            DeskError::Json(e) => write!(f, "JSON error: {}", e),
            DeskError::Config(msg) => write!(f, "config error: {}", msg),
            DeskError::Transport(msg) => write!(f, "backend connection: {}", msg),
            DeskError::Backend(msg) => write!(f, "{}", msg),
            DeskError::NotFound(msg) => write!(f, "{}", msg),
            DeskError::Cancelled => write!(f, "cancelled"),
            DeskError::Validation(msg) => write!(f, "{}", msg),
            DeskError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeskError::Io(e) => Some(e),
            DeskError::Json(e) => Some(e),
            _ => None,
        }
    }
}

// ── From implementations for common error types ────────────────────────

impl From<std::io::Error> for DeskError {
    fn from(e: std::io::Error) -> Self {
        DeskError::Io(e)
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::Json(e)
    }
}

impl From<String> for DeskError {
    fn from(s: String) -> Self {
        DeskError::Other(s)
    }
}

impl From<&str> for DeskError {
    fn from(s: &str) -> Self {
        DeskError::Other(s.to_string())
    }
}

// ── Convenience constructors ───────────────────────────────────────────

impl DeskError {
    /// Create a backend error from the message the backend returned.
    pub fn backend(message: impl Into<String>) -> Self {
        DeskError::Backend(message.into())
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        DeskError::Transport(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        DeskError::NotFound(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        DeskError::Validation(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        DeskError::Config(message.into())
    }

    /// Whether this error means the requested vault does not exist.
    ///
    /// The backend has no structured error codes; the kind travels in the
    /// message text, so this is a substring match on the rendered error.
    pub fn is_vault_not_found(&self) -> bool {
        self.to_string().contains(VAULT_NOT_FOUND)
    }
}

/// Convenience type alias for Results using DeskError.
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = DeskError::backend("Failed to get vault: Vault not found: work");
        assert_eq!(err.to_string(), "Failed to get vault: Vault not found: work");
        assert!(err.is_vault_not_found());
    }

    #[test]
    fn test_other_errors_are_not_vault_not_found() {
        assert!(!DeskError::backend("Failed to unlock vault.").is_vault_not_found());
        assert!(!DeskError::transport("connection reset").is_vault_not_found());
        assert!(!DeskError::Cancelled.is_vault_not_found());
    }
}
