//! Shared vocabulary: error taxonomy and small validated value types.

/// Validated identifiers and value types.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
