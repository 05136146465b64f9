//! Ordered, prefix-keyed set of active directives.

use crate::directive::{validate_delimiter, TransformDirective, DEFAULT_DELIMITER};
use crate::error::DirectiveError;

/// Ordered list of active transform directives, at most one per prefix.
///
/// Order is significant: it is forwarded verbatim to the processing service,
/// which applies transforms in that order. Setting a directive always moves
/// it to the end, so the most recently adjusted transform is applied last.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRegistry {
    directives: Vec<TransformDirective>,
    delimiter: char,
}

impl TransformRegistry {
    /// Create an empty registry joined with [`DEFAULT_DELIMITER`].
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Create an empty registry with a custom join delimiter.
    pub fn with_delimiter(delimiter: char) -> Result<Self, DirectiveError> {
        validate_delimiter(delimiter)?;
        Ok(Self {
            directives: Vec::new(),
            delimiter,
        })
    }

    /// Set the directive for `prefix`.
    ///
    /// An absent or empty payload removes the entry instead. Returns `true`
    /// if the ordered list changed.
    pub fn upsert(&mut self, prefix: &str, payload: Option<&str>) -> bool {
        let payload = match payload {
            Some(p) if !p.is_empty() => p,
            _ => return self.remove(prefix),
        };

        let existing = self.position(prefix);
        if let Some(index) = existing {
            let is_tail = index + 1 == self.directives.len();
            if is_tail && self.directives[index].payload() == payload {
                return false;
            }
            self.directives.remove(index);
        }

        self.directives.push(TransformDirective::new(prefix, payload));
        true
    }

    /// Remove the directive for `prefix`. Returns `true` if one was present.
    pub fn remove(&mut self, prefix: &str) -> bool {
        match self.position(prefix) {
            Some(index) => {
                self.directives.remove(index);
                true
            }
            None => false,
        }
    }

    /// Look up the directive for `prefix`
    pub fn get(&self, prefix: &str) -> Option<&TransformDirective> {
        self.directives.iter().find(|d| d.prefix() == prefix)
    }

    /// Ordered directive strings
    pub fn serialize(&self) -> Vec<String> {
        self.directives
            .iter()
            .map(|d| d.as_str().to_string())
            .collect()
    }

    /// Directives joined with the registry delimiter (empty string when
    /// there are none).
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                out.push(self.delimiter);
            }
            out.push_str(directive.as_str());
        }
        out
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformDirective> {
        self.directives.iter()
    }

    fn position(&self, prefix: &str) -> Option<usize> {
        self.directives.iter().position(|d| d.prefix() == prefix)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}
