//! A thread-local arena used to splice multi-chunk bulk payloads into one
//! contiguous, owned buffer.
//!
//! `BufferPool` hands out regions via `BytesMut::split_to`, which both
//! slices off the requested prefix and advances the pool's own remaining
//! capacity in a single step — there is no separate write-cursor field to
//! keep in sync.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use bytes::BytesMut;

const INITIAL_CAPACITY: usize = 32 * 1024;
const DECAY_FLOOR: usize = 50 * 1024;
const DECAY_INTERVAL: Duration = Duration::from_millis(50);
const DECAY_RATIO: f64 = 0.10;
const LARGE_ACQUISITION: usize = 75 * 1024 * 1024;
const CARRY_CLAMP_THRESHOLD: usize = 111 * 1024 * 1024;
const CARRY_CLAMP_VALUE: usize = 50 * 1024 * 1024;

thread_local! {
    static POOL: RefCell<BufferPool> = RefCell::new(BufferPool::new());
}

/// Acquire `n` contiguous, owned bytes from this thread's pool, growing and
/// lazily decaying it as described in the module docs.
pub(crate) fn acquire(n: usize) -> BytesMut {
    POOL.with(|pool| pool.borrow_mut().acquire(n))
}

struct BufferPool {
    buf: BytesMut,
    next_decay_due: Option<Instant>,
}

impl BufferPool {
    fn new() -> Self {
        Self {
            buf: fresh_buffer(INITIAL_CAPACITY),
            next_decay_due: None,
        }
    }

    fn acquire(&mut self, n: usize) -> BytesMut {
        self.apply_due_decay(Instant::now());
        if self.buf.len() < n {
            self.grow(n);
        }
        self.buf.split_to(n)
    }

    fn grow(&mut self, n: usize) {
        let carry = if self.buf.capacity() > CARRY_CLAMP_THRESHOLD {
            CARRY_CLAMP_VALUE
        } else {
            self.buf.capacity()
        };
        let multiplier = if n > LARGE_ACQUISITION { 2 } else { 3 };
        let total = n * multiplier + carry;
        log::debug!(
            "resp parser buffer pool growing to {total} bytes (requested {n}, carry {carry})"
        );
        self.buf = fresh_buffer(total);
        self.next_decay_due = Some(Instant::now() + DECAY_INTERVAL);
    }

    fn apply_due_decay(&mut self, now: Instant) {
        while let Some(due) = self.next_decay_due {
            if self.buf.capacity() <= DECAY_FLOOR {
                self.next_decay_due = None;
                break;
            }
            if now < due {
                break;
            }
            let shrunk = ((self.buf.capacity() as f64) * (1.0 - DECAY_RATIO)) as usize;
            let target = shrunk.max(DECAY_FLOOR);
            log::debug!(
                "resp parser buffer pool decaying {} -> {target} bytes",
                self.buf.capacity()
            );
            self.buf = fresh_buffer(target);
            self.next_decay_due = Some(due + DECAY_INTERVAL);
        }
    }
}

fn fresh_buffer(capacity: usize) -> BytesMut {
    let mut buf = BytesMut::with_capacity(capacity);
    buf.resize(capacity, 0);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_returns_exact_length() {
        let region = acquire(128);
        assert_eq!(region.len(), 128);
    }

    #[test]
    fn acquire_grows_when_request_exceeds_capacity() {
        let mut pool = BufferPool::new();
        let first = pool.acquire(16);
        assert_eq!(first.len(), 16);
        let big = pool.acquire(10 * 1024 * 1024);
        assert_eq!(big.len(), 10 * 1024 * 1024);
    }

    #[test]
    fn decay_shrinks_towards_floor_but_not_below() {
        let mut pool = BufferPool::new();
        pool.grow(1024 * 1024);
        let grown_capacity = pool.buf.capacity();
        assert!(grown_capacity > DECAY_FLOOR);

        // Simulate many elapsed decay intervals without needing to sleep.
        let far_future = Instant::now() + DECAY_INTERVAL * 1000;
        pool.apply_due_decay(far_future);
        assert!(pool.buf.capacity() <= DECAY_FLOOR);
        assert!(pool.next_decay_due.is_none());
    }

    #[test]
    fn large_acquisition_uses_the_smaller_multiplier() {
        let mut pool = BufferPool::new();
        let n = LARGE_ACQUISITION + 1;
        pool.acquire(n);
        // total = n * 2 + carry; just confirm it's at least n*2 and we didn't
        // explode into the x3 branch.
        assert!(pool.buf.capacity() + n >= n * 2);
    }
}
