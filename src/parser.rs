//! The incremental RESP2/RESP3 decoder.
//!
//! [`Parser`] is the whole public surface: construct one with
//! [`ParserOptions`], feed it arbitrarily-chunked bytes via [`Parser::feed`],
//! and it drives a caller-provided [`ReplySink`] with fully decoded values.
//! Nothing here blocks, retries, or owns a connection — see the crate docs.

use std::ops::Range;

use bytes::Bytes;
use num_bigint::BigInt;

use crate::buffer_pool;
use crate::error::{ConfigError, ProtocolError, ReplyError};
use crate::line::{self, LineScan};
use crate::options::ParserOptions;
use crate::sink::ReplySink;
use crate::value::{BigNumberValue, Bulk, DoubleValue, Number, Reply};

/// How a pending or just-completed bulk payload should be turned into a
/// [`Reply`]. Captured once, when the bulk's header is decoded, so that a
/// `return_buffers` toggle mid-stream never changes a bulk that is already
/// in flight (mode monotonicity, see crate docs).
#[derive(Debug, Clone, Copy)]
enum BulkKind {
    Plain { raw: bool },
    BlobError,
}

/// Which wire tag a length-prefixed bulk payload came from; used only to
/// pick the right [`BulkKind`] before capturing `raw`.
enum BulkTag {
    Plain,
    BlobError,
}

/// An in-progress bulk payload that has spanned more than one `feed` call.
struct PendingBulk {
    limit: usize,
    kind: BulkKind,
}

/// The kind of aggregate a stack frame is collecting elements for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Array,
    Set,
    Map,
    Push,
    Attribute,
}

/// One level of an in-progress aggregate. `target` is the raw element count
/// (`2N` for `Map`/`Attribute`, `N` otherwise).
struct Frame {
    kind: FrameKind,
    target: usize,
    items: Vec<Reply>,
}

/// A fully decoded value plus the side channel it should be routed through.
/// Only the outermost completion of an aggregate chain carries `Push` or
/// `Attribute`; everything nested is always a plain `Reply`.
enum DeliverValue {
    Reply(Reply),
    Push(Reply),
    Attribute(Reply),
}

/// What a single dispatch at the current offset produced.
enum DispatchOutcome {
    /// A value is ready to route — either a freshly decoded scalar or an
    /// aggregate that completed immediately (e.g. `*0\r\n`).
    Ready(DeliverValue),
    /// An aggregate header was decoded and a frame pushed; no value to
    /// deliver yet, the decode loop should keep going.
    FramePushed,
    /// Not enough bytes buffered to make progress; `feed` should return.
    Suspend,
}

/// Outcome of a CRLF-terminated line scan, expressed as byte ranges into
/// [`Parser::buffer`] rather than borrowed slices, so callers never hold a
/// borrow of `self` across a later mutation.
enum LineOutcome {
    Complete(Range<usize>, usize),
    Incomplete,
    Malformed,
}

/// An incremental RESP2/RESP3 decoder.
///
/// One instance serves one connection's byte stream. All state is owned;
/// there is no background task, lock, or timer (the buffer pool's decay is
/// evaluated lazily, see [`crate::buffer_pool`]). `feed` is a plain
/// synchronous `&mut self` method that borrows its [`ReplySink`] for the
/// duration of the call.
pub struct Parser {
    buffer: Bytes,
    offset: usize,
    chunk_cache: Vec<Bytes>,
    chunk_cache_total: usize,
    pending_bulk: Option<PendingBulk>,
    stack: Vec<Frame>,
    opts: ParserOptions,
    suppress_text_depth: u32,
}

impl Parser {
    /// Construct a parser. Fails if `opts` enables both `string_numbers` and
    /// `big_int`.
    pub fn new(opts: ParserOptions) -> Result<Self, ConfigError> {
        opts.validate()?;
        Ok(Self {
            buffer: Bytes::new(),
            offset: 0,
            chunk_cache: Vec::new(),
            chunk_cache_total: 0,
            pending_bulk: None,
            stack: Vec::new(),
            opts,
            suppress_text_depth: 0,
        })
    }

    /// Drop all pending state — buffer, chunk cache, aggregate stack,
    /// pending bulk, attribute-suppression depth — ready for a new
    /// connection stream. Mode flags are configuration, not pending state,
    /// and survive a reset.
    pub fn reset(&mut self) {
        self.clear_pending_state();
    }

    /// Toggle raw-bytes-vs-text decoding. Infallible: the type system
    /// already guarantees a `bool`. Affects only replies that begin decoding
    /// after this call.
    pub fn set_return_buffers(&mut self, value: bool) {
        self.opts.return_buffers = value;
    }

    /// Toggle decimal-text integer decoding. Fails if `big_int` is already
    /// enabled.
    pub fn set_string_numbers(&mut self, value: bool) -> Result<(), ConfigError> {
        let candidate = ParserOptions {
            string_numbers: value,
            ..self.opts
        };
        candidate.validate()?;
        self.opts.string_numbers = value;
        Ok(())
    }

    /// Toggle arbitrary-precision integer decoding. Fails if
    /// `string_numbers` is already enabled.
    pub fn set_big_int(&mut self, value: bool) -> Result<(), ConfigError> {
        let candidate = ParserOptions {
            big_int: value,
            ..self.opts
        };
        candidate.validate()?;
        self.opts.big_int = value;
        Ok(())
    }

    /// Feed one chunk of bytes. Sink methods fire synchronously, in order,
    /// before this call returns. No chunk boundary is meaningful: splitting
    /// one logical stream into any sequence of `feed` calls produces the
    /// same sink-call trace as feeding it whole.
    pub fn feed<S: ReplySink>(&mut self, chunk: &[u8], sink: &mut S) {
        let chunk = Bytes::copy_from_slice(chunk);
        if self.pending_bulk.is_some() {
            self.continue_bulk(chunk, sink);
        } else {
            self.splice_tail(chunk);
            self.run(sink);
        }
    }

    fn effective_return_buffers(&self) -> bool {
        self.opts.return_buffers && self.suppress_text_depth == 0
    }

    fn clear_pending_state(&mut self) {
        self.buffer = Bytes::new();
        self.offset = 0;
        self.chunk_cache.clear();
        self.chunk_cache_total = 0;
        self.pending_bulk = None;
        self.stack.clear();
        self.suppress_text_depth = 0;
    }

    fn protocol_error(&self, offset: usize, reason: impl Into<String>) -> ProtocolError {
        ProtocolError::new(offset, reason, self.buffer.clone())
    }

    /// Merge the unread tail of `buffer` with a freshly arrived `chunk`,
    /// resetting `offset` to 0. Skips the copy when there is no tail to
    /// preserve.
    fn splice_tail(&mut self, chunk: Bytes) {
        if self.offset >= self.buffer.len() {
            self.buffer = chunk;
            self.offset = 0;
            return;
        }
        let mut merged =
            bytes::BytesMut::with_capacity((self.buffer.len() - self.offset) + chunk.len());
        merged.extend_from_slice(&self.buffer[self.offset..]);
        merged.extend_from_slice(&chunk);
        self.buffer = merged.freeze();
        self.offset = 0;
    }

    /// The main decode loop: dispatch at `offset` until the buffer is
    /// exhausted, a decode is incomplete, or a fatal error is hit.
    fn run<S: ReplySink>(&mut self, sink: &mut S) {
        loop {
            if self.offset >= self.buffer.len() {
                return;
            }
            match self.dispatch_one() {
                Ok(DispatchOutcome::Ready(value)) => self.deliver(value, sink),
                Ok(DispatchOutcome::FramePushed) => {}
                Ok(DispatchOutcome::Suspend) => return,
                Err(err) => {
                    self.handle_fatal(err, sink);
                    return;
                }
            }
        }
    }

    fn handle_fatal<S: ReplySink>(&mut self, err: ProtocolError, sink: &mut S) {
        log::warn!(
            "resp parser protocol error at offset {}: {} (byte {})",
            err.offset,
            err.reason,
            err.byte_display
        );
        self.clear_pending_state();
        sink.on_fatal(err);
    }

    /// Route a fully decoded value: fold it into the frame on top of
    /// `stack` (cascading through any parent frames that complete as a
    /// result), or hand it to the sink if there is no open aggregate.
    fn deliver<S: ReplySink>(&mut self, mut value: DeliverValue, sink: &mut S) {
        loop {
            match value {
                DeliverValue::Push(reply) => {
                    sink.on_push(reply);
                    return;
                }
                DeliverValue::Attribute(reply) => {
                    sink.on_attribute(reply);
                    return;
                }
                DeliverValue::Reply(reply) => {
                    if let Some(frame) = self.stack.last_mut() {
                        frame.items.push(reply);
                        if frame.items.len() < frame.target {
                            return;
                        }
                        let frame = self.stack.pop().expect("just checked non-empty");
                        value = self.complete_frame(frame);
                        continue;
                    }
                    self.emit_top_level(reply, sink);
                    return;
                }
            }
        }
    }

    fn emit_top_level<S: ReplySink>(&mut self, reply: Reply, sink: &mut S) {
        match reply {
            Reply::Error(err) => sink.on_error(err),
            other => sink.on_reply(other),
        }
    }

    fn complete_frame(&mut self, frame: Frame) -> DeliverValue {
        if frame.kind == FrameKind::Attribute {
            self.suppress_text_depth -= 1;
        }
        match frame.kind {
            FrameKind::Array => DeliverValue::Reply(Reply::Array(frame.items)),
            FrameKind::Set => DeliverValue::Reply(Reply::Set(frame.items)),
            FrameKind::Map => DeliverValue::Reply(Reply::Map(pair_up(frame.items))),
            FrameKind::Push => DeliverValue::Push(Reply::Array(frame.items)),
            FrameKind::Attribute => DeliverValue::Attribute(Reply::Map(pair_up(frame.items))),
        }
    }

    fn start_aggregate(&mut self, kind: FrameKind, target: usize) -> DispatchOutcome {
        if kind == FrameKind::Attribute {
            self.suppress_text_depth += 1;
        }
        let frame = Frame {
            kind,
            target,
            items: Vec::with_capacity(target.min(4096)),
        };
        if target == 0 {
            DispatchOutcome::Ready(self.complete_frame(frame))
        } else {
            self.stack.push(frame);
            DispatchOutcome::FramePushed
        }
    }

    /// Dispatch a single type-tagged value at `self.offset`. Never looks at
    /// `stack` — aggregate bookkeeping happens entirely in `deliver` and
    /// `start_aggregate`; this only ever decodes the next tag.
    fn dispatch_one(&mut self) -> Result<DispatchOutcome, ProtocolError> {
        let tag_pos = self.offset;
        let tag = self.buffer[tag_pos];
        let body_start = tag_pos + 1;
        match tag {
            b'+' => self.decode_simple(body_start, false),
            b'-' => self.decode_simple(body_start, true),
            b':' => self.decode_integer(body_start),
            b'$' | b'=' => self.decode_bulk(body_start, BulkTag::Plain),
            b'!' => self.decode_bulk(body_start, BulkTag::BlobError),
            b'_' => self.decode_null(body_start),
            b'#' => self.decode_boolean(body_start),
            b',' => self.decode_double(body_start),
            b'(' => self.decode_bignum(body_start),
            b'*' => self.decode_aggregate_header(body_start, FrameKind::Array),
            b'~' => self.decode_aggregate_header(body_start, FrameKind::Set),
            b'%' => self.decode_aggregate_header(body_start, FrameKind::Map),
            b'>' => self.decode_aggregate_header(body_start, FrameKind::Push),
            b'|' => self.decode_aggregate_header(body_start, FrameKind::Attribute),
            other => Err(self.protocol_error(
                tag_pos,
                format!("unknown RESP type byte {}", display_byte(other)),
            )),
        }
    }

    fn line_range_strict(&self, start: usize) -> LineOutcome {
        match line::scan_strict(&self.buffer[start..]) {
            LineScan::Complete(content, consumed) => {
                LineOutcome::Complete(start..start + content.len(), start + consumed)
            }
            LineScan::Incomplete => LineOutcome::Incomplete,
            LineScan::Malformed => LineOutcome::Malformed,
        }
    }

    fn line_range_tolerant(&self, start: usize) -> LineOutcome {
        match line::scan_tolerant(&self.buffer[start..]) {
            LineScan::Complete(content, consumed) => {
                LineOutcome::Complete(start..start + content.len(), start + consumed)
            }
            LineScan::Incomplete => LineOutcome::Incomplete,
            LineScan::Malformed => LineOutcome::Malformed,
        }
    }

    fn bulk_from_range(&self, range: Range<usize>, raw: bool) -> Result<Bulk, ProtocolError> {
        let offset = range.start;
        let bytes = self.buffer.slice(range);
        if raw {
            Ok(Bulk::Bytes(bytes))
        } else {
            match std::str::from_utf8(&bytes) {
                Ok(text) => Ok(Bulk::Text(text.to_string())),
                Err(_) => Err(self.protocol_error(offset, "invalid utf-8 in bulk payload")),
            }
        }
    }

    // Simple string / simple error.
    fn decode_simple(
        &mut self,
        body_start: usize,
        is_error: bool,
    ) -> Result<DispatchOutcome, ProtocolError> {
        match self.line_range_tolerant(body_start) {
            LineOutcome::Complete(range, new_offset) => {
                let reply = if is_error {
                    let bulk = self.bulk_from_range(range, false)?;
                    let text = match bulk {
                        Bulk::Text(s) => s,
                        Bulk::Bytes(_) => unreachable!("bulk_from_range(raw=false) is always Text"),
                    };
                    Reply::Error(ReplyError::new(text))
                } else {
                    let bulk = self.bulk_from_range(range, self.effective_return_buffers())?;
                    Reply::SimpleString(bulk)
                };
                self.offset = new_offset;
                Ok(DispatchOutcome::Ready(DeliverValue::Reply(reply)))
            }
            LineOutcome::Incomplete => Ok(DispatchOutcome::Suspend),
            LineOutcome::Malformed => {
                Err(self.protocol_error(body_start, "unterminated simple line"))
            }
        }
    }

    // Integer.
    fn decode_integer(&mut self, body_start: usize) -> Result<DispatchOutcome, ProtocolError> {
        match self.line_range_strict(body_start) {
            LineOutcome::Complete(range, new_offset) => {
                let digits = self.buffer.slice(range.clone());
                let number = self.shape_integer(&digits, range.start)?;
                self.offset = new_offset;
                Ok(DispatchOutcome::Ready(DeliverValue::Reply(Reply::Integer(
                    number,
                ))))
            }
            LineOutcome::Incomplete => Ok(DispatchOutcome::Suspend),
            LineOutcome::Malformed => {
                Err(self.protocol_error(body_start, "unterminated integer line"))
            }
        }
    }

    fn shape_integer(&self, digits: &[u8], offset: usize) -> Result<Number, ProtocolError> {
        let text = normalize_integer_text(digits);
        if self.opts.string_numbers {
            Ok(Number::Text(text))
        } else if self.opts.big_int {
            let big = text
                .parse::<BigInt>()
                .map_err(|_| self.protocol_error(offset, "invalid integer"))?;
            Ok(Number::Big(big))
        } else {
            let i = text
                .parse::<i64>()
                .map_err(|_| self.protocol_error(offset, "invalid integer"))?;
            Ok(Number::I64(i))
        }
    }

    // Null.
    fn decode_null(&mut self, body_start: usize) -> Result<DispatchOutcome, ProtocolError> {
        let available = self.buffer.len().saturating_sub(body_start);
        if available < 2 {
            return Ok(DispatchOutcome::Suspend);
        }
        if &self.buffer[body_start..body_start + 2] != b"\r\n" {
            return Err(self.protocol_error(body_start, "malformed null terminator"));
        }
        self.offset = body_start + 2;
        Ok(DispatchOutcome::Ready(DeliverValue::Reply(Reply::Null)))
    }

    // Boolean.
    fn decode_boolean(&mut self, body_start: usize) -> Result<DispatchOutcome, ProtocolError> {
        let available = self.buffer.len().saturating_sub(body_start);
        if available < 3 {
            return Ok(DispatchOutcome::Suspend);
        }
        let value = match self.buffer[body_start] {
            b't' => true,
            b'f' => false,
            other => {
                return Err(self.protocol_error(
                    body_start,
                    format!("invalid boolean literal {}", display_byte(other)),
                ))
            }
        };
        if &self.buffer[body_start + 1..body_start + 3] != b"\r\n" {
            return Err(self.protocol_error(body_start, "malformed boolean terminator"));
        }
        self.offset = body_start + 3;
        Ok(DispatchOutcome::Ready(DeliverValue::Reply(Reply::Boolean(
            value,
        ))))
    }

    // Double.
    fn decode_double(&mut self, body_start: usize) -> Result<DispatchOutcome, ProtocolError> {
        match self.line_range_strict(body_start) {
            LineOutcome::Complete(range, new_offset) => {
                let raw = self.buffer.slice(range.clone());
                let text = std::str::from_utf8(&raw)
                    .map_err(|_| self.protocol_error(range.start, "invalid utf-8 in double"))?;
                let value = self.shape_double(text, range.start)?;
                self.offset = new_offset;
                Ok(DispatchOutcome::Ready(DeliverValue::Reply(Reply::Double(
                    value,
                ))))
            }
            LineOutcome::Incomplete => Ok(DispatchOutcome::Suspend),
            LineOutcome::Malformed => {
                Err(self.protocol_error(body_start, "unterminated double line"))
            }
        }
    }

    fn shape_double(&self, text: &str, offset: usize) -> Result<DoubleValue, ProtocolError> {
        if self.opts.string_numbers {
            let rewritten = match text {
                "inf" => "Infinity".to_string(),
                "-inf" => "-Infinity".to_string(),
                other => other.to_string(),
            };
            Ok(DoubleValue::Text(rewritten))
        } else {
            let value = match text {
                "inf" => f64::INFINITY,
                "-inf" => f64::NEG_INFINITY,
                "nan" => f64::NAN,
                other => other
                    .parse::<f64>()
                    .map_err(|_| self.protocol_error(offset, "invalid double"))?,
            };
            Ok(DoubleValue::F64(value))
        }
    }

    // Big number.
    fn decode_bignum(&mut self, body_start: usize) -> Result<DispatchOutcome, ProtocolError> {
        match self.line_range_strict(body_start) {
            LineOutcome::Complete(range, new_offset) => {
                let raw = self.buffer.slice(range.clone());
                let text = std::str::from_utf8(&raw)
                    .map_err(|_| self.protocol_error(range.start, "invalid utf-8 in big number"))?;
                let normalized = normalize_integer_text(text.as_bytes());
                let big = normalized
                    .parse::<BigInt>()
                    .map_err(|_| self.protocol_error(range.start, "invalid big number"))?;
                self.offset = new_offset;
                Ok(DispatchOutcome::Ready(DeliverValue::Reply(
                    Reply::BigNumber(BigNumberValue::Big(big)),
                )))
            }
            LineOutcome::Incomplete => Ok(DispatchOutcome::Suspend),
            LineOutcome::Malformed => {
                Err(self.protocol_error(body_start, "unterminated big number line"))
            }
        }
    }

    // Bulk string / verbatim string, blob error.
    fn decode_bulk(
        &mut self,
        body_start: usize,
        tag: BulkTag,
    ) -> Result<DispatchOutcome, ProtocolError> {
        match self.line_range_strict(body_start) {
            LineOutcome::Complete(range, header_end) => {
                let len_bytes = self.buffer.slice(range.clone());
                let len_text = std::str::from_utf8(&len_bytes)
                    .map_err(|_| self.protocol_error(range.start, "invalid bulk length"))?;
                let length: i64 = len_text
                    .parse()
                    .map_err(|_| self.protocol_error(range.start, "invalid bulk length"))?;
                if length == -1 {
                    self.offset = header_end;
                    return Ok(DispatchOutcome::Ready(DeliverValue::Reply(Reply::Null)));
                }
                if length < -1 {
                    return Err(self.protocol_error(range.start, "negative bulk length"));
                }
                let length = length as usize;
                let kind = match tag {
                    BulkTag::Plain => BulkKind::Plain {
                        raw: self.effective_return_buffers(),
                    },
                    BulkTag::BlobError => BulkKind::BlobError,
                };
                if header_end + length + 2 <= self.buffer.len() {
                    let payload = header_end..header_end + length;
                    let reply = self.shape_bulk_payload(kind, payload)?;
                    self.offset = header_end + length + 2;
                    Ok(DispatchOutcome::Ready(DeliverValue::Reply(reply)))
                } else {
                    let tail = self.buffer.slice(header_end..self.buffer.len());
                    self.chunk_cache.clear();
                    self.chunk_cache_total = tail.len();
                    self.chunk_cache.push(tail);
                    self.pending_bulk = Some(PendingBulk { limit: length, kind });
                    Ok(DispatchOutcome::Suspend)
                }
            }
            LineOutcome::Incomplete => Ok(DispatchOutcome::Suspend),
            LineOutcome::Malformed => {
                Err(self.protocol_error(body_start, "malformed bulk length line"))
            }
        }
    }

    fn shape_bulk_payload(
        &self,
        kind: BulkKind,
        range: Range<usize>,
    ) -> Result<Reply, ProtocolError> {
        match kind {
            BulkKind::Plain { raw } => {
                let bulk = self.bulk_from_range(range, raw)?;
                Ok(Reply::BulkString(bulk))
            }
            BulkKind::BlobError => {
                let offset = range.start;
                let bytes = self.buffer.slice(range);
                let text = std::str::from_utf8(&bytes)
                    .map_err(|_| self.protocol_error(offset, "invalid utf-8 in blob error"))?;
                Ok(Reply::Error(split_blob_error(text)))
            }
        }
    }

    /// Multi-chunk bulk completion, called from `feed` instead of `run`
    /// whenever a bulk payload is still pending from a previous call.
    fn continue_bulk<S: ReplySink>(&mut self, chunk: Bytes, sink: &mut S) {
        let limit = self
            .pending_bulk
            .as_ref()
            .expect("continue_bulk only called while pending")
            .limit;
        let needed = limit + 2;
        let before = self.chunk_cache_total;
        if before + chunk.len() < needed {
            self.chunk_cache_total += chunk.len();
            self.chunk_cache.push(chunk);
            return;
        }
        let consumed_from_chunk = needed - before;
        let tail = chunk.slice(consumed_from_chunk..chunk.len());
        self.chunk_cache.push(chunk);

        let kind = self
            .pending_bulk
            .take()
            .expect("checked above")
            .kind;
        let spliced = self.splice_chunk_cache(limit);
        self.chunk_cache.clear();
        self.chunk_cache_total = 0;
        self.buffer = tail;
        self.offset = 0;

        match self.shape_spliced(kind, spliced) {
            Ok(reply) => {
                self.deliver(DeliverValue::Reply(reply), sink);
                self.run(sink);
            }
            Err(err) => self.handle_fatal(err, sink),
        }
    }

    fn splice_chunk_cache(&self, limit: usize) -> Bytes {
        let mut dest = buffer_pool::acquire(limit);
        let mut written = 0usize;
        for segment in &self.chunk_cache {
            if written >= limit {
                break;
            }
            let take = (limit - written).min(segment.len());
            dest[written..written + take].copy_from_slice(&segment[..take]);
            written += take;
        }
        dest.freeze()
    }

    fn shape_spliced(&self, kind: BulkKind, bytes: Bytes) -> Result<Reply, ProtocolError> {
        match kind {
            BulkKind::Plain { raw } => {
                let bulk = if raw {
                    Bulk::Bytes(bytes)
                } else {
                    let text = std::str::from_utf8(&bytes).map_err(|_| {
                        self.protocol_error(self.offset, "invalid utf-8 in spliced bulk")
                    })?;
                    Bulk::Text(text.to_string())
                };
                Ok(Reply::BulkString(bulk))
            }
            BulkKind::BlobError => {
                let text = std::str::from_utf8(&bytes).map_err(|_| {
                    self.protocol_error(self.offset, "invalid utf-8 in spliced blob error")
                })?;
                Ok(Reply::Error(split_blob_error(text)))
            }
        }
    }

    // Arrays/sets/maps/push, attribute.
    fn decode_aggregate_header(
        &mut self,
        body_start: usize,
        kind: FrameKind,
    ) -> Result<DispatchOutcome, ProtocolError> {
        match self.line_range_strict(body_start) {
            LineOutcome::Complete(range, header_end) => {
                let len_bytes = self.buffer.slice(range.clone());
                let len_text = std::str::from_utf8(&len_bytes)
                    .map_err(|_| self.protocol_error(range.start, "invalid aggregate length"))?;
                let n: i64 = len_text
                    .parse()
                    .map_err(|_| self.protocol_error(range.start, "invalid aggregate length"))?;
                if n == -1 {
                    if kind == FrameKind::Attribute {
                        return Err(self.protocol_error(range.start, "attribute cannot be null"));
                    }
                    self.offset = header_end;
                    return Ok(DispatchOutcome::Ready(DeliverValue::Reply(Reply::Null)));
                }
                if n < -1 {
                    return Err(self.protocol_error(range.start, "negative aggregate length"));
                }
                let element_target = match kind {
                    FrameKind::Map | FrameKind::Attribute => (n as usize) * 2,
                    _ => n as usize,
                };
                self.offset = header_end;
                Ok(self.start_aggregate(kind, element_target))
            }
            LineOutcome::Incomplete => Ok(DispatchOutcome::Suspend),
            LineOutcome::Malformed => {
                Err(self.protocol_error(body_start, "malformed aggregate length line"))
            }
        }
    }
}

fn pair_up(items: Vec<Reply>) -> Vec<(Reply, Reply)> {
    let mut iter = items.into_iter();
    let mut pairs = Vec::with_capacity(iter.len() / 2);
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        pairs.push((key, value));
    }
    pairs
}

fn split_blob_error(text: &str) -> ReplyError {
    match text.find(' ') {
        Some(idx) => ReplyError::with_code(&text[..idx], &text[idx + 1..]),
        None => ReplyError::new(text),
    }
}

/// `:\r\n` and `:-\r\n` both decode to `0`, per the observed-behavior
/// contract this crate preserves; every other digit span is passed through
/// verbatim.
fn normalize_integer_text(digits: &[u8]) -> String {
    if digits.is_empty() || digits == b"-" {
        "0".to_string()
    } else {
        String::from_utf8_lossy(digits).into_owned()
    }
}

fn display_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() || byte == b' ' {
        format!("0x{byte:02x} ('{}')", byte as char)
    } else {
        format!("0x{byte:02x}")
    }
}
