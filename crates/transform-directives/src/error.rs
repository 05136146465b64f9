//! Error types for directive validation
//!
//! The registry itself never fails; these errors are raised when a directive
//! or delimiter comes from outside (configuration, HTTP requests) and has to
//! be checked before it is allowed into a registry.

use std::fmt;

/// Error type for directive and delimiter validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveError {
    /// Prefix is empty, does not end with ':' or contains more than one ':'
    InvalidPrefix(String),
    /// Payload contains the registry delimiter
    PayloadContainsDelimiter {
        /// Offending payload
        payload: String,
        /// Delimiter of the registry
        delimiter: char,
    },
    /// Delimiter belongs to a payload alphabet
    InvalidDelimiter(char),
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveError::InvalidPrefix(prefix) => {
                write!(f, "invalid directive prefix '{}' (expected 'kind:')", prefix)
            }
            DirectiveError::PayloadContainsDelimiter { payload, delimiter } => {
                write!(
                    f,
                    "payload '{}' contains the directive delimiter '{}'",
                    payload, delimiter
                )
            }
            DirectiveError::InvalidDelimiter(c) => {
                write!(
                    f,
                    "'{}' cannot be used as directive delimiter (it may appear inside payloads)",
                    c
                )
            }
        }
    }
}

impl std::error::Error for DirectiveError {}
