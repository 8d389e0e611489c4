//! Incremental RESP2/RESP3 decoder for Redis client libraries.
//!
//! [`Parser`] turns an arbitrarily fragmented byte stream from a Redis
//! connection into a sequence of fully decoded [`Reply`] values, delivered
//! through a caller-implemented [`ReplySink`]. It is the hard core of a
//! Redis client — the state machine that reconstructs discrete replies
//! across chunk boundaries, splices multi-chunk bulk payloads without
//! pathological allocation, and preserves exact numeric precision beyond
//! `f64`'s 53-bit mantissa.
//!
//! This crate is deliberately narrow. It does not open sockets, does not
//! know command semantics, does not retry or reconnect, and never blocks —
//! `bytes → events`, nothing else. Host client libraries own the
//! connection, the command pipeline, and pub/sub dispatch.
//!
//! ```
//! use resp_parser::{Parser, ParserOptions, Reply, ReplyError, ReplySink};
//!
//! struct PrintingSink;
//! impl ReplySink for PrintingSink {
//!     fn on_reply(&mut self, value: Reply) {
//!         println!("{value:?}");
//!     }
//!     fn on_error(&mut self, error: ReplyError) {
//!         eprintln!("{error}");
//!     }
//! }
//!
//! let mut parser = Parser::new(ParserOptions::default()).unwrap();
//! let mut sink = PrintingSink;
//! parser.feed(b"+OK\r\n", &mut sink);
//! ```

mod buffer_pool;
mod error;
mod line;
mod options;
mod parser;
mod sink;
mod value;

pub use error::{ConfigError, ProtocolError, ReplyError};
pub use options::ParserOptions;
pub use parser::Parser;
pub use sink::ReplySink;
pub use value::{BigNumberValue, Bulk, DoubleValue, Number, Reply};
