//! Domain constants shared across the front end.

/// File extension of IDL source files (without the dot).
pub const MSG_EXTENSION: &str = "msg";

/// Default enum storage type when none is declared.
pub const DEFAULT_ENUM_STORAGE: &str = "int32";

/// Largest field number accepted by default (29-bit unsigned ceiling).
pub const DEFAULT_MAX_FIELD_NUMBER: i64 = 536_870_911;

/// Default tab width used by the indentation transcoder.
pub const DEFAULT_TAB_SIZE: usize = 4;
