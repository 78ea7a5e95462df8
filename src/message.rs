//! Structured transcript messages for the TUI.
//!
//! `UiMessage` replaces raw strings in the message pane with typed entries
//! that the widget layer styles per variant.

/// A single entry in the chat transcript.
#[derive(Debug, Clone)]
pub enum UiMessage {
    /// A turn the user sent.
    User { text: String },
    /// The agent's answer, with the backend-reported processing time.
    Agent {
        text: String,
        processing_time: Option<f64>,
    },
    /// A backend log line attached to a chat reply.
    Log { line: String },
    /// System status or informational message.
    System { text: String },
    /// Error message.
    Error {
        code: String,
        message: String,
        help: Option<String>,
    },
}

impl UiMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    pub fn agent(text: impl Into<String>, processing_time: Option<f64>) -> Self {
        Self::Agent {
            text: text.into(),
            processing_time,
        }
    }

    pub fn log(line: impl Into<String>) -> Self {
        Self::Log { line: line.into() }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::System { text: text.into() }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    pub fn error_with_help(
        code: impl Into<String>,
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
            help: Some(help.into()),
        }
    }
}
