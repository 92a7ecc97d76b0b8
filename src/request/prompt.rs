use crate::error::Result;
use crate::rpc::PasswordResponse;

/// A `get_password` request, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPrompt {
    pub title: String,
    /// Context lines shown above the input (description, key path)
    pub details: Vec<String>,
    /// Error banner from a previous failed attempt
    pub error_message: Option<String>,
    /// Label of the passphrase input
    pub label: String,
    /// The backend is already unlocking a saved passphrase; nothing to ask.
    pub attempting_saved_password: bool,
    /// Offer "use saved passphrase".
    pub offer_saved_password: bool,
    /// Offer "save passphrase to keychain" alongside the input.
    pub offer_save_to_keychain: bool,
}

/// Something the user must answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Answered with a password, `use_saved_password` or `cancelled`.
    Password(PasswordPrompt),
    /// Answered with `confirmed` or `cancelled`.
    Confirm { description: Option<String> },
    /// Acknowledged with `confirmed`.
    Message { description: Option<String> },
}

/// What a request screen currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowView {
    /// No request pending.
    Waiting,
    /// The password was handed over; the backend may still reject it.
    Verifying,
    /// The backend is unlocking a saved passphrase through OS authentication.
    Authenticating(PasswordPrompt),
    /// Waiting on the user.
    Prompt(Prompt),
}

/// Renders request screens and collects answers.
///
/// `ask` blocks until the user answers and runs off the async executor.
/// Returning [`DeskError::Cancelled`](crate::error::DeskError::Cancelled)
/// is treated as the user choosing Cancel.
pub trait Prompter: Send + Sync + 'static {
    fn ask(&self, prompt: &Prompt) -> Result<PasswordResponse>;

    /// Show a screen that needs no answer.
    fn status(&self, view: &FlowView) -> Result<()>;

    fn show_error(&self, message: &str) -> Result<()>;
}
