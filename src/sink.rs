//! The host-provided callback surface.
//!
//! The source protocol models this as four or five registered callbacks
//! (`on_reply`, `on_error`, `on_fatal`, `on_push`, `on_attribute`), with
//! `on_reply`/`on_error` required and the rest optional, falling back to a
//! default. Rust expresses that more directly as a trait: `on_reply` and
//! `on_error` have no default implementation (so a type that doesn't
//! implement them fails to compile, rather than failing a runtime
//! "is callable" check), and the optional ones get sensible defaults.

use crate::error::{ProtocolError, ReplyError};
use crate::value::Reply;

/// Receives decoded values from a [`crate::Parser`]. Borrowed by `feed` for
/// the duration of the call — the parser never owns its sink.
pub trait ReplySink {
    /// An ordinary, non-error, top-level reply.
    fn on_reply(&mut self, value: Reply);

    /// A server-reported error (simple `-` or blob `!`) received as a
    /// top-level reply.
    fn on_error(&mut self, error: ReplyError);

    /// A wire-level protocol violation. Defaults to forwarding into
    /// [`ReplySink::on_error`] as a message-only `ReplyError`, matching the
    /// source's fallback behavior when no dedicated handler is registered.
    fn on_fatal(&mut self, error: ProtocolError) {
        self.on_error(ReplyError::new(error.to_string()));
    }

    /// A RESP3 push-data frame (pub/sub, keyspace notifications, ...).
    /// Defaults to doing nothing, matching the source's "none" default.
    fn on_push(&mut self, _value: Reply) {}

    /// RESP3 attribute metadata preceding the next reply. Defaults to
    /// being ignored, matching the source's "ignored" default.
    fn on_attribute(&mut self, _attributes: Reply) {}
}
