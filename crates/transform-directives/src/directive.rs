//! A single `kind:params` transform directive.

use std::fmt;

use crate::error::DirectiveError;

/// Prefix of the resize directive (`resize:<width>,<height>`)
pub const RESIZE_PREFIX: &str = "resize:";

/// Prefix of the contrast directive (`contrast:<value>`)
pub const CONTRAST_PREFIX: &str = "contrast:";

/// Default delimiter used to join directives into one form field.
///
/// Payloads use `,` internally (`resize:400,300`), so the join character
/// has to be something else.
pub const DEFAULT_DELIMITER: char = ';';

/// One transform instruction: a prefix (`resize:`) followed by a payload
/// (`400,300`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformDirective {
    text: String,
    prefix_len: usize,
}

impl TransformDirective {
    /// Build a directive from its two parts. No validation is performed;
    /// see [`validate`] for externally supplied values.
    pub fn new(prefix: &str, payload: &str) -> Self {
        let mut text = String::with_capacity(prefix.len() + payload.len());
        text.push_str(prefix);
        text.push_str(payload);
        Self {
            text,
            prefix_len: prefix.len(),
        }
    }

    /// The `kind:` part
    pub fn prefix(&self) -> &str {
        &self.text[..self.prefix_len]
    }

    /// The parameters after the prefix
    pub fn payload(&self) -> &str {
        &self.text[self.prefix_len..]
    }

    /// Full directive text as sent over the wire
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TransformDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Check that a delimiter cannot collide with any payload alphabet.
pub fn validate_delimiter(delimiter: char) -> Result<(), DirectiveError> {
    let collides = delimiter.is_ascii_alphanumeric()
        || delimiter.is_whitespace()
        || matches!(delimiter, ',' | '.' | '-' | '+' | ':');
    if collides {
        Err(DirectiveError::InvalidDelimiter(delimiter))
    } else {
        Ok(())
    }
}

/// Validate a prefix/payload pair coming from outside the process.
///
/// The prefix must look like `kind:` with a non-empty kind, and the payload
/// must not contain the delimiter it is going to be joined with.
pub fn validate(prefix: &str, payload: Option<&str>, delimiter: char) -> Result<(), DirectiveError> {
    let kind = prefix
        .strip_suffix(':')
        .ok_or_else(|| DirectiveError::InvalidPrefix(prefix.to_string()))?;
    if kind.is_empty() || kind.contains(':') || kind.contains(delimiter) {
        return Err(DirectiveError::InvalidPrefix(prefix.to_string()));
    }

    if let Some(payload) = payload {
        if payload.contains(delimiter) {
            return Err(DirectiveError::PayloadContainsDelimiter {
                payload: payload.to_string(),
                delimiter,
            });
        }
    }

    Ok(())
}
