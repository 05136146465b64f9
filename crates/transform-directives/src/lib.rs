//! transform-directives: ordered transform directives for image processing
//! requests.
//!
//! A directive is a `kind:params` string such as `resize:400,300` or
//! `contrast:0.5`. The [`TransformRegistry`] keeps at most one directive per
//! prefix, in the order they were last set, and joins them into the single
//! form field the processing service expects.
//!
//! ```
//! use transform_directives::{TransformRegistry, CONTRAST_PREFIX, RESIZE_PREFIX};
//!
//! let mut registry = TransformRegistry::new();
//! registry.upsert(RESIZE_PREFIX, Some("400,300"));
//! registry.upsert(CONTRAST_PREFIX, Some("0.5"));
//! assert_eq!(registry.joined(), "resize:400,300;contrast:0.5");
//!
//! // An empty payload removes the directive
//! registry.upsert(CONTRAST_PREFIX, Some(""));
//! assert_eq!(registry.joined(), "resize:400,300");
//! ```
//!
//! The join delimiter must never appear inside a payload. Resize payloads use
//! `,` internally, so the default delimiter is `;` and
//! [`TransformRegistry::with_delimiter`] rejects characters from any payload
//! alphabet.

pub mod directive;
pub mod error;
pub mod registry;

pub use directive::{
    validate, validate_delimiter, TransformDirective, CONTRAST_PREFIX, DEFAULT_DELIMITER,
    RESIZE_PREFIX,
};
pub use error::DirectiveError;
pub use registry::TransformRegistry;
