//! Error handling for DBC conversion
//!
//! This module defines the error types used throughout the crate.
//! It uses thiserror for ergonomic error handling and provides context-specific
//! error variants.

pub use crate::common::DbcError;
pub use crate::common::Result;
