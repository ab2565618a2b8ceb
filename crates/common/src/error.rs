//! Error types shared across fgradient crates.

use std::path::PathBuf;

/// Message shown when an export could not be rendered.
pub const RENDER_FAILURE_MESSAGE: &str = "Failed to generate image. Please try again.";

/// Message shown when the rendered image could not reach the clipboard.
pub const CLIPBOARD_FAILURE_MESSAGE: &str =
    "Failed to copy image. Your system clipboard might not support this feature.";

/// Top-level error type for fgradient operations.
#[derive(Debug, thiserror::Error)]
pub enum FgradientError {
    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Image decode error: {message}")]
    Decode { message: String },

    #[error("Clipboard error: {message}")]
    Clipboard { message: String },

    #[error("Preferences error: {message}")]
    Preferences { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using FgradientError.
pub type FgradientResult<T> = Result<T, FgradientError>;

impl FgradientError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard {
            message: msg.into(),
        }
    }

    pub fn preferences(msg: impl Into<String>) -> Self {
        Self::Preferences {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this failure belongs to the clipboard capability rather
    /// than to rendering.
    pub fn is_clipboard(&self) -> bool {
        matches!(self, Self::Clipboard { .. })
    }

    /// Generic text to surface to the user for a failed export action.
    pub fn user_message(&self) -> &'static str {
        if self.is_clipboard() {
            CLIPBOARD_FAILURE_MESSAGE
        } else {
            RENDER_FAILURE_MESSAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_distinguishes_clipboard() {
        let err = FgradientError::clipboard("no display");
        assert!(err.is_clipboard());
        assert_eq!(err.user_message(), CLIPBOARD_FAILURE_MESSAGE);

        let err = FgradientError::decode("truncated png");
        assert!(!err.is_clipboard());
        assert_eq!(err.user_message(), RENDER_FAILURE_MESSAGE);
    }

    #[test]
    fn test_display_includes_message() {
        let err = FgradientError::decode("truncated png");
        assert_eq!(err.to_string(), "Image decode error: truncated png");
    }

    #[test]
    fn test_wrapped_errors_use_render_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = FgradientError::from(io);
        assert!(matches!(err, FgradientError::Io(_)));
        assert_eq!(err.user_message(), RENDER_FAILURE_MESSAGE);

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = FgradientError::from(json);
        assert!(matches!(err, FgradientError::Json(_)));
        assert_eq!(err.user_message(), RENDER_FAILURE_MESSAGE);
    }
}
