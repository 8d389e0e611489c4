//! Error types for the RESP decoder.
//!
//! Three independent error kinds, matching the three ways this crate can
//! fail: a malformed wire (`ProtocolError`, fatal), a server-reported error
//! that is ordinary reply data (`ReplyError`, not fatal at all), and a bad
//! constructor/setter argument (`ConfigError`).

use bytes::Bytes;
use thiserror::Error;

/// A fatal, wire-level protocol violation: an unknown type byte or malformed
/// framing. Carries enough context for the host to log or report the
/// failure before it closes the connection.
#[derive(Debug, Clone, Error)]
#[error("RESP protocol error at offset {offset}: {reason} (byte {byte_display})")]
pub struct ProtocolError {
    /// Cursor position within `buffer_snapshot` where the violation was found.
    pub offset: usize,
    /// Human-readable description of what went wrong.
    pub reason: String,
    /// Displayable form of the offending byte, e.g. `"0x7a ('z')"`.
    pub byte_display: String,
    /// The buffer as it stood when the violation was detected.
    pub buffer_snapshot: Bytes,
}

impl ProtocolError {
    pub(crate) fn new(offset: usize, reason: impl Into<String>, buffer_snapshot: Bytes) -> Self {
        let byte_display = match buffer_snapshot.get(offset) {
            Some(&b) if b.is_ascii_graphic() || b == b' ' => {
                format!("0x{b:02x} ('{}')", b as char)
            }
            Some(&b) => format!("0x{b:02x}"),
            None => "<end of buffer>".to_string(),
        };
        Self {
            offset,
            reason: reason.into(),
            byte_display,
            buffer_snapshot,
        }
    }
}

/// A server-reported error, received on the wire as a simple error (`-`) or
/// blob error (`!`). Not a Rust error type itself — it is ordinary reply
/// data that the decoder hands to `on_error` (at the top level) or leaves
/// embedded inside an aggregate (when nested).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyError {
    /// The code preceding the first space in a blob error, if any.
    pub code: Option<String>,
    /// Everything after the code (or the whole payload, if there is none).
    pub message: String,
}

impl ReplyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ReplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code} {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A bad argument to `Parser::new` or one of its mode setters.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("string_numbers and big_int cannot both be enabled")]
    ConflictingNumberMode,
}
