//! Error types for deck building and output.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// No setter is registered for the property on the target kind.
    #[error("Unsupported property '{property}' on {target}")]
    UnsupportedProperty {
        target: &'static str,
        property: String,
    },

    /// A setter exists but rejected the value.
    #[error("Invalid value for {target} property '{property}': expected {expected}")]
    InvalidPropertyValue {
        target: &'static str,
        property: String,
        expected: &'static str,
    },

    /// A mandatory configuration key is absent.
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Temporary storage for streamed output could not be created.
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Directory creation, write or persist failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown writer format, or no writer registered for it.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// A slide index outside the document's slide list.
    #[error("Slide index {0} is out of range")]
    SlideIndexOutOfRange(usize),

    /// The builder was driven through an invalid transition.
    #[error("Invalid builder state: {0}")]
    InvalidState(String),

    /// A writer failed to encode the document.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The configuration tree could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidPropertyValue`].
    pub fn invalid_value(target: &'static str, property: &str, expected: &'static str) -> Self {
        Error::InvalidPropertyValue {
            target,
            property: property.to_string(),
            expected,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_property_message() {
        let err = Error::UnsupportedProperty {
            target: "shape",
            property: "glorp".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported property 'glorp' on shape");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
