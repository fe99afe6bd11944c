//! Foundation types for the lumos toolchain.
//!
//! This module provides fundamental types used throughout the front end:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`] - 1-based line/column positions reported to users
//! - [`PrimitiveType`], [`CollectionKind`] - Built-in type vocabulary
//! - [`parse_integer_saturating`] - Integer literals that never fail on overflow
//! - Domain constants (file extension)
//!
//! This module has NO dependencies on other lumos modules.

pub mod constants;
mod line_index;
mod position;
mod types;

pub use line_index::{LineCol, LineIndex, TextRange, TextSize};
pub use position::Position;
pub use types::{parse_integer_saturating, saturate_i64, CollectionKind, PrimitiveType};

// Re-export text-size types for convenience
pub use text_size;
