use std::time::Duration;

use dioxus::prelude::*;
use shared_types::{AppError, ErrorCategory};
use shared_ui::{use_toast, ToastOptions, Toasts};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Toast helpers bound to the root `ToastProvider`.
#[derive(Clone, Copy)]
pub struct Notifier {
    toasts: Toasts,
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.toasts.success(message.into(), options());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.toasts.error(message.into(), options());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.toasts.info(message.into(), options());
    }

    /// Toast a failed server call. Backend failures get `fallback`.
    pub fn failure(&self, err: &ServerFnError, fallback: &str) {
        self.error(failure_message(&err.to_string(), fallback));
    }
}

pub fn use_notifier() -> Notifier {
    Notifier { toasts: use_toast() }
}

fn options() -> ToastOptions {
    ToastOptions::new().duration(TOAST_DURATION)
}

/// The server's own message when the user can act on it, `fallback` otherwise.
pub fn failure_message(error_string: &str, fallback: &str) -> String {
    match AppError::from_server_error(error_string) {
        Some(err) if err.category() != ErrorCategory::BackendUnavailable => err.message,
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actionable_errors_keep_their_message() {
        let raw = r#"error running server function: {"kind":"Conflict","message":"Email already registered!"} (details: None)"#;
        assert_eq!(
            failure_message(raw, "Error submitting complaint"),
            "Email already registered!"
        );
    }

    #[test]
    fn backend_failures_use_the_fallback() {
        let raw = r#"{"kind":"DatabaseError","message":"pool timed out"}"#;
        assert_eq!(
            failure_message(raw, "Error loading complaints"),
            "Error loading complaints"
        );
        assert_eq!(
            failure_message("connection refused", "Error updating complaint"),
            "Error updating complaint"
        );
    }
}
