// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::transports::core::{SocketStats, Transport, TransportStats};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

/// `Transport` implementation that writes all metrics to the `Sender` half of
/// a channel while callers are given ownership of the `Receiver` half.
///
/// This is not a general purpose transport, rather it's meant for verifying
/// the exact lines written during the course of tests. By default, the
/// channel used is unbounded. The channel size can be limited using the
/// `with_capacity` method, in which case lines sent to a full channel are
/// dropped and counted in `stats()`.
///
/// Lines are sent without a terminator, exactly as a UDP datagram would be.
#[derive(Debug)]
pub struct SpyTransport {
    sender: Sender<Vec<u8>>,
    stats: SocketStats,
}

impl SpyTransport {
    pub fn new() -> (Receiver<Vec<u8>>, Self) {
        Self::with_queue_capacity(None)
    }

    pub fn with_capacity(queue: usize) -> (Receiver<Vec<u8>>, Self) {
        Self::with_queue_capacity(Some(queue))
    }

    fn with_queue_capacity(queue: Option<usize>) -> (Receiver<Vec<u8>>, Self) {
        let (tx, rx) = match queue {
            Some(sz) => bounded(sz),
            None => unbounded(),
        };

        let transport = SpyTransport {
            sender: tx,
            stats: SocketStats::default(),
        };

        (rx, transport)
    }
}

impl Transport for SpyTransport {
    fn send(&self, line: &str) {
        let res = self.sender.try_send(line.as_bytes().to_vec());
        if res.is_ok() {
            self.stats.incr_sent(line.len() as u64);
        } else {
            self.stats.incr_dropped(line.len() as u64);
        }
    }

    fn stats(&self) -> TransportStats {
        (&self.stats).into()
    }
}
