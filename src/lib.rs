//! Pixdrop - transform-pipeline preview client
//!
//! Tracks the selected source image and the active transform directives,
//! re-runs the remote image processing call whenever either changes, and
//! publishes the latest processed preview. This library exposes modules for
//! integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
