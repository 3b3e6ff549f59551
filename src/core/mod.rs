// Public modules
pub mod config;
pub mod convert;
pub mod error;
pub mod local_files;
pub mod locate;
pub mod messages;
pub mod metadata;
pub mod object_files;
pub mod prompt;
pub mod sobject;
pub mod unified_app;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use metadata::MetadataRecord;
