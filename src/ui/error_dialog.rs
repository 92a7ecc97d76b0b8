//! Shared error dialog.
//!
//! One handle is created at startup and cloned into every view. Failures
//! caught at a view boundary are shown here and logged instead of aborting
//! the command.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

type Sink = Box<dyn Write + Send>;

/// What the dialog last showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownError {
    pub title: Option<String>,
    pub message: String,
}

#[derive(Clone)]
pub struct ErrorDialog {
    out: Arc<Mutex<Sink>>,
    last: Arc<Mutex<Option<ShownError>>>,
}

impl ErrorDialog {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
            last: Arc::new(Mutex::new(None)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Show an error. Without a title the message is prefixed with "Error".
    pub fn show_error(&self, title: Option<&str>, message: impl fmt::Display) {
        let message = message.to_string();
        tracing::error!(title = title.unwrap_or("error"), %message, "error dialog");

        {
            let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
            let written = match title {
                Some(title) => writeln!(out, "{}\n  {}", title, message),
                None => writeln!(out, "Error: {}", message),
            };
            if let Err(e) = written {
                tracing::warn!(error = %e, "could not write error dialog");
            }
        }

        *self.last.lock().unwrap_or_else(|p| p.into_inner()) = Some(ShownError {
            title: title.map(str::to_string),
            message,
        });
    }

    /// The currently open error, if any.
    pub fn current(&self) -> Option<ShownError> {
        self.last.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn close(&self) {
        self.last.lock().unwrap_or_else(|p| p.into_inner()).take();
    }

    pub fn is_open(&self) -> bool {
        self.current().is_some()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// A `Write` whose contents can be read back after being handed away.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A DEBUG-level subscriber that writes plain text into the returned buffer.
    pub fn capture_logs() -> (SharedBuffer, impl tracing::Subscriber + Send + Sync) {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        (buffer, subscriber)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::SharedBuffer;
    use super::*;

    #[test]
    fn test_show_and_close() {
        let buffer = SharedBuffer::default();
        let dialog = ErrorDialog::new(buffer.clone());
        assert!(!dialog.is_open());

        dialog.show_error(None, "Failed to decrypt credential: bad key");
        assert_eq!(buffer.contents(), "Error: Failed to decrypt credential: bad key\n");
        assert_eq!(
            dialog.current(),
            Some(ShownError {
                title: None,
                message: "Failed to decrypt credential: bad key".into()
            })
        );

        dialog.close();
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_clones_share_state() {
        let dialog = ErrorDialog::new(io::sink());
        let view_handle = dialog.clone();
        view_handle.show_error(Some("Failed to delete vault"), "busy");
        assert_eq!(dialog.current().unwrap().title.as_deref(), Some("Failed to delete vault"));
    }
}
