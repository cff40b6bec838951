//! HTTP request handlers organized by domain

pub mod rules;
pub mod upload;

// Re-export all handlers for use in router
pub use rules::*;
pub use upload::*;
