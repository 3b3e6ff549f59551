//! Generic utility primitives with zero domain knowledge.
//!
//! - `api_name` - Label to API-name normalization
//! - `io` - File I/O with consistent error handling
//! - `template` - String template rendering
//! - `validation` - Input validation helpers

pub mod api_name;
pub mod io;
pub mod template;
pub mod validation;
