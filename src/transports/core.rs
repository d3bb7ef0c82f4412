// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point in time snapshot of what a transport has delivered or dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub lines_sent: u64,
    pub bytes_sent: u64,
    pub lines_dropped: u64,
    pub bytes_dropped: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SocketStats {
    lines_sent: Arc<AtomicU64>,
    bytes_sent: Arc<AtomicU64>,
    lines_dropped: Arc<AtomicU64>,
    bytes_dropped: Arc<AtomicU64>,
}

impl SocketStats {
    pub fn incr_sent(&self, bytes: u64) {
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
        self.lines_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_dropped(&self, bytes: u64) {
        self.bytes_dropped.fetch_add(bytes, Ordering::Relaxed);
        self.lines_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn update<T>(&self, res: io::Result<T>, len: usize) -> io::Result<T> {
        match res {
            Ok(v) => {
                self.incr_sent(len as u64);
                Ok(v)
            }
            Err(e) => {
                self.incr_dropped(len as u64);
                Err(e)
            }
        }
    }
}

impl From<&SocketStats> for TransportStats {
    fn from(stats: &SocketStats) -> Self {
        TransportStats {
            lines_sent: stats.lines_sent.load(Ordering::Relaxed),
            bytes_sent: stats.bytes_sent.load(Ordering::Relaxed),
            lines_dropped: stats.lines_dropped.load(Ordering::Relaxed),
            bytes_dropped: stats.bytes_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Trait for the ways an already formatted metric line reaches a server.
///
/// The line passed to `send` is in the canonical Statsd format and never
/// includes a trailing newline; transports that need a terminator add it
/// themselves. For example:
///
/// ``` text
/// some.counter:123|c
/// some.timer:456|ms
/// some.gauge:5|g
/// some.set:2|s
/// some.raw:12934|r|1466021000
/// some.calendargram:user-1|cg|dow
/// ```
///
/// Sending is infallible from the point of view of the caller. Transient
/// network errors are retried or absorbed by the implementation and are
/// visible only through `stats()` and the configured warning sink.
pub trait Transport {
    /// Deliver a single metric line, or silently give up on it.
    fn send(&self, line: &str);

    /// Return telemetry like lines / bytes sent or dropped.
    ///
    /// Not all transports keep track of these and the default implementation
    /// returns zeros.
    fn stats(&self) -> TransportStats {
        TransportStats::default()
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, line: &str) {
        (**self).send(line)
    }

    fn stats(&self) -> TransportStats {
        (**self).stats()
    }
}

/// Implementation of a `Transport` that discards all metrics.
///
/// Installed by the client when a real transport could not be created,
/// and useful for disabling metric collection or in unit tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&self, _line: &str) {}
}
