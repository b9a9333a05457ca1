//! Error handling for mejson.
//!
//! Conversion itself is lenient: values it cannot classify are passed
//! through with a diagnostic instead of failing. The errors here cover what
//! can still go wrong:
//! - Hard failures propagated out of container recursion ([`MarshalError`])
//! - Reading BSON dump input ([`InputError`])
//! - Loading configuration ([`ConfigError`])
//! - I/O and JSON serialization on the CLI side
//!
//! # Example
//!
//! ```rust
//! use mejson::error::{MarshalError, MejsonError};
//!
//! let err = MejsonError::from(MarshalError::DepthExceeded { limit: 8 });
//! assert!(err.to_string().contains("8"));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, InputError, MarshalError, MejsonError, Result};
