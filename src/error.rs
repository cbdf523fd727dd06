//! Error types surfaced by the cursor and the builder.
//!
//! Lookup misses are not errors; they come back as `None`.

use thiserror::Error;

/// Misuse of a [`Cursor`](crate::Cursor). Both variants are caller-logic
/// errors and are reported at the offending call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    /// `next()` was called after the last entry had been yielded.
    #[error("there are no more entries in the map")]
    Exhausted,
    /// `remove()` was called before any `next()`, or twice for one `next()`.
    #[error("remove() called without a preceding next()")]
    IllegalState,
}

/// Rejected [`MapBuilder`](crate::MapBuilder) settings.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("load factor must be finite and greater than zero, got {0}")]
    InvalidLoadFactor(f64),
}
