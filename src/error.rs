//! Rich diagnostic error types for weft.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. The top-level [`WeftError`]
//! preserves the full diagnostic chain through to the user.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the weft client.
#[derive(Debug, Error, Diagnostic)]
pub enum WeftError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Client(#[from] crate::client::ClientError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] crate::paths::PathError),
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(weft::config::read),
        help("Check that the file exists and is readable, or run without --config to use defaults.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {path}")]
    #[diagnostic(
        code(weft::config::parse),
        help("The file must be valid TOML matching the weft config schema. {message}")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config file: {path}")]
    #[diagnostic(
        code(weft::config::write),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown module: \"{name}\"")]
    #[diagnostic(
        code(weft::config::unknown_module),
        help("List configured modules with `weft modules list`.")
    )]
    UnknownModule { name: String },
}

/// Convenience alias for functions returning weft results.
pub type WeftResult<T> = std::result::Result<T, WeftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_weft_error() {
        let err = ConfigError::UnknownModule {
            name: "planning".into(),
        };
        let weft: WeftError = err.into();
        assert!(matches!(
            weft,
            WeftError::Config(ConfigError::UnknownModule { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = ConfigError::UnknownModule {
            name: "planning".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("planning"));
    }
}
