// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::panic::RefUnwindSafe;

/// Destination for non-fatal warnings raised while sending metrics.
///
/// Transports and the client never return delivery failures to callers.
/// Instead, things worth knowing about (a TCP line dropped after all retries
/// were used, falling back to a `NullTransport`, a timer that could not be
/// sent when it went out of scope) are reported here.
///
/// Implementations must not block and must not panic. Any closure taking a
/// `&str` can be used as a `WarnSink`.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use tally::WarnSink;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_ref = seen.clone();
/// let sink = move |msg: &str| seen_ref.lock().unwrap().push(msg.to_owned());
///
/// sink.warn("something went wrong");
/// assert_eq!(1, seen.lock().unwrap().len());
/// ```
pub trait WarnSink: Send + Sync + RefUnwindSafe {
    fn warn(&self, message: &str);
}

impl<F> WarnSink for F
where
    F: Fn(&str) + Send + Sync + RefUnwindSafe,
{
    fn warn(&self, message: &str) {
        (self)(message)
    }
}

/// `WarnSink` that emits each warning as a `tracing` event.
///
/// This is the default used by clients and transports when no other sink
/// is configured. Events are logged at `WARN` level with the target `tally`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnSink;

impl WarnSink for TracingWarnSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "tally", "{}", message);
    }
}

/// `WarnSink` that ignores all warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopWarnSink;

impl WarnSink for NopWarnSink {
    fn warn(&self, _message: &str) {}
}
