//! Construction/configuration surface for [`crate::Parser`].

use crate::error::ConfigError;

/// The three mode flags a [`crate::Parser`] is constructed and reconfigured
/// with. `string_numbers` and `big_int` are mutually exclusive; both are
/// validated at construction (via [`ParserOptions::validate`]) and again by
/// the parser's `set_string_numbers`/`set_big_int` setters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Decode bulk/simple strings as raw bytes instead of UTF-8 text.
    pub return_buffers: bool,
    /// Decode integers as their verbatim decimal text instead of `i64`.
    pub string_numbers: bool,
    /// Decode integers as arbitrary-precision `BigInt` instead of `i64`.
    pub big_int: bool,
}

impl ParserOptions {
    /// Returns [`ConfigError::ConflictingNumberMode`] if both `string_numbers`
    /// and `big_int` are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.string_numbers && self.big_int {
            return Err(ConfigError::ConflictingNumberMode);
        }
        Ok(())
    }
}
