//! All error types for the aresource crate.
//!
//! [`EscapeError`] is what the decoder reports for a single resource;
//! [`Error`] is returned from everything that touches a whole file.

use thiserror::Error;

/// An escape sequence in a resource's storage text could not be resolved.
///
/// Both variants carry the identifier of the owning resource so the caller can
/// report the failing unit and decide whether to keep loading the rest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscapeError {
    #[error("resource \"{context}\": unsupported escape sequence \"{sequence}\"")]
    Unsupported { context: String, sequence: String },

    #[error("resource \"{context}\": malformed unicode escape \"\\u{digits}\"")]
    MalformedUnicode { context: String, digits: String },
}

impl EscapeError {
    /// Identifier of the resource the failing text belongs to.
    pub fn context(&self) -> &str {
        match self {
            EscapeError::Unsupported { context, .. } => context,
            EscapeError::MalformedUnicode { context, .. } => context,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("escape error: {0}")]
    Escape(#[from] EscapeError),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unsupported_escape_message() {
        let error = EscapeError::Unsupported {
            context: "str1".to_string(),
            sequence: "\\q".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "resource \"str1\": unsupported escape sequence \"\\q\""
        );
        assert_eq!(error.context(), "str1");
    }

    #[test]
    fn test_malformed_unicode_message() {
        let error = EscapeError::MalformedUnicode {
            context: "title".to_string(),
            digits: "zz41".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "resource \"title\": malformed unicode escape \"\\uzz41\""
        );
        assert_eq!(error.context(), "title");
    }

    #[test]
    fn test_escape_error_converts_into_error() {
        let error: Error = EscapeError::Unsupported {
            context: "a".to_string(),
            sequence: "\\x".to_string(),
        }
        .into();
        assert!(error.to_string().starts_with("escape error: "));
        assert!(matches!(error, Error::Escape(_)));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_unknown_unit_error() {
        let error = Error::UnknownUnit("missing".to_string());
        assert_eq!(error.to_string(), "unknown unit `missing`");
    }

    #[test]
    fn test_invalid_resource_error() {
        let error = Error::InvalidResource("string tag missing 'name'".to_string());
        assert_eq!(
            error.to_string(),
            "invalid resource: string tag missing 'name'"
        );
    }
}
