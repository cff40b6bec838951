//! CLI command implementations
//!
//! - `analyze` - Sheet analysis (findings and savings report)
//! - `rules` - Rule registry listing
//! - `serve` - Web server command

pub mod analyze;
pub mod rules;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use rules::*;
pub use serve::*;
