//! Terminal input: y/N questions, line and hidden input, and the
//! [`Prompter`] used by the pinentry and askpass screens.
//!
//! Prompts are written to stderr so stdout stays clean for rendered views.

use std::io::{self, Write};

use crate::error::{DeskError, Result};
use crate::request::{FlowView, PasswordPrompt, Prompt, Prompter};
use crate::rpc::PasswordResponse;

fn read_answer() -> Result<String> {
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        // EOF: nobody is there to answer.
        return Err(DeskError::Cancelled);
    }
    Ok(input.trim().to_string())
}

/// y/N confirmation prompt.
pub fn confirm(message: &str) -> Result<bool> {
    eprint!("{} [y/N]: ", message);
    io::stderr().flush()?;
    let input = read_answer()?;
    Ok(matches!(input.to_lowercase().as_str(), "y" | "yes"))
}

/// Y/n confirmation prompt.
pub fn confirm_default_yes(message: &str) -> Result<bool> {
    eprint!("{} [Y/n]: ", message);
    io::stderr().flush()?;
    let input = read_answer()?;
    Ok(!matches!(input.to_lowercase().as_str(), "n" | "no"))
}

/// Require the user to type `expected` exactly.
pub fn confirm_typed(message: &str, expected: &str) -> Result<bool> {
    eprint!("{}\nType '{}' to confirm: ", message, expected);
    io::stderr().flush()?;
    Ok(read_answer()? == expected)
}

/// Prompt for a line of text, falling back to `default` on empty input.
pub fn prompt_line(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(d) => eprint!("{} [{}]: ", label, d),
        None => eprint!("{}: ", label),
    }
    io::stderr().flush()?;
    let input = read_answer()?;
    if input.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(input)
    }
}

/// Prompt for hidden input. End of input (Ctrl-D) cancels; an empty line
/// is an empty value.
pub fn prompt_secret(label: &str) -> Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    secret_or_cancel(rpassword::read_password())
}

fn secret_or_cancel(read: io::Result<String>) -> Result<String> {
    match read {
        Ok(value) => Ok(value),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(DeskError::Cancelled),
        Err(e) => Err(e.into()),
    }
}

/// The answer to a password screen once the passphrase has been read.
fn entered_password(
    prompt: &PasswordPrompt,
    entered: Result<String>,
    ask_save: impl FnOnce() -> Result<bool>,
) -> Result<PasswordResponse> {
    let value = match entered {
        Ok(value) => value,
        Err(DeskError::Cancelled) => return Ok(PasswordResponse::Cancelled),
        Err(e) => return Err(e),
    };

    // Nothing worth keeping in the keychain.
    let save_to_keychain = prompt.offer_save_to_keychain && !value.is_empty() && ask_save()?;

    Ok(PasswordResponse::Password {
        value,
        save_to_keychain,
    })
}

/// Header lines of a password screen: title, context and error banner.
pub fn password_header(prompt: &PasswordPrompt) -> String {
    let mut text = format!("\n{}\n", prompt.title);
    for line in &prompt.details {
        text.push_str(&format!("  {}\n", line));
    }
    if let Some(error) = &prompt.error_message {
        text.push_str(&format!("  Error: {}\n", error));
    }
    text
}

/// Text for a screen that needs no answer.
pub fn status_text(view: &FlowView) -> String {
    match view {
        FlowView::Waiting => "Waiting for request...".to_string(),
        FlowView::Verifying => "Verifying passphrase...".to_string(),
        FlowView::Authenticating(prompt) => format!(
            "{}  Requesting authentication to unlock your saved passphrase...",
            password_header(prompt)
        ),
        FlowView::Prompt(_) => String::new(),
    }
}

/// Answers request screens on the controlling terminal.
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn ask_password(&self, prompt: &PasswordPrompt) -> Result<PasswordResponse> {
        eprint!("{}", password_header(prompt));

        if prompt.offer_saved_password {
            eprintln!("  A passphrase is saved for this key in your keychain.");
            if confirm_default_yes("  Unlock with the saved passphrase?")? {
                return Ok(PasswordResponse::UseSavedPassword);
            }
        }

        let entered = prompt_secret(&format!("  {} (Ctrl-D to cancel)", prompt.label));
        entered_password(prompt, entered, || {
            confirm_default_yes("  Save passphrase to keychain?")
        })
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, prompt: &Prompt) -> Result<PasswordResponse> {
        match prompt {
            Prompt::Password(password) => self.ask_password(password),
            Prompt::Confirm { description } => {
                eprintln!("\nConfirmation Required");
                if let Some(description) = description {
                    eprintln!("  {}", description);
                }
                Ok(if confirm("  OK?")? {
                    PasswordResponse::Confirmed
                } else {
                    PasswordResponse::Cancelled
                })
            }
            Prompt::Message { description } => {
                eprintln!("\nMessage");
                if let Some(description) = description {
                    eprintln!("  {}", description);
                }
                eprint!("  Press Enter to continue");
                io::stderr().flush()?;
                read_answer()?;
                Ok(PasswordResponse::Confirmed)
            }
        }
    }

    fn status(&self, view: &FlowView) -> Result<()> {
        eprintln!("{}", status_text(view));
        Ok(())
    }

    fn show_error(&self, message: &str) -> Result<()> {
        eprintln!("  {}", message);
        Ok(())
    }
}
