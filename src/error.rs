//! Error handling for the templar rendering library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use templar::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::not_found("model"))
//! }
//!
//! assert!(might_fail().unwrap_err().is_not_found());
//! ```

use thiserror::Error;

/// Result type for templar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for template resolution and rendering
#[derive(Debug, Error)]
pub enum Error {
    /// No search tier contained the requested template
    #[error("The template file '{0}' was not found")]
    TemplateNotFound(String),

    /// I/O error while reading a located template
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The template source could not be compiled
    #[error("Syntax error in template '{name}': {message}")]
    Syntax { name: String, message: String },

    /// Template execution or a helper failed
    #[error("Failed to render template '{name}': {message}")]
    Render { name: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new template not found error
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::TemplateNotFound(name.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new syntax error for the named template
    pub fn syntax<N: Into<String>, M: ToString>(name: N, message: M) -> Self {
        Self::Syntax {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create a new render error for the named template
    pub fn render<N: Into<String>, M: ToString>(name: N, message: M) -> Self {
        Self::Render {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Returns `true` if no tier held the requested template
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_not_found_names_template() {
        let error = Error::not_found("model.mustache");
        assert!(error.is_not_found());
        assert_eq!(
            error.to_string(),
            "The template file 'model.mustache' was not found"
        );
    }

    #[test]
    fn test_error_config_creation() {
        let error = Error::config("Invalid configuration");
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_error_syntax_and_render_creation() {
        let error = Error::syntax("api", "unclosed section");
        assert_eq!(
            error.to_string(),
            "Syntax error in template 'api': unclosed section"
        );

        let error = Error::render("api", "helper failed");
        assert!(!error.is_not_found());
        assert_eq!(
            error.to_string(),
            "Failed to render template 'api': helper failed"
        );
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("I/O error"));
        assert!(error.to_string().contains("File not found"));
    }

    #[test]
    fn test_error_from_serde_json_error() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid json");
        let error: Error = json_result.unwrap_err().into();
        assert!(matches!(error, Error::Json(_)));
        assert!(error.to_string().contains("JSON parsing error"));
    }
}
