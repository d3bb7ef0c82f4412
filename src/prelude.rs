// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export commonly used parts of Tally for easy glob imports
//!
//! # Example
//!
//! ```
//! use tally::prelude::*;
//! use tally::{CalendargramPeriod, StatsdClient, NullTransport};
//!
//! let client = StatsdClient::from_transport("some.prefix", NullTransport);
//!
//! client.count("some.counter", 1).unwrap();
//! client.incr("some.counter").unwrap();
//! client.time("some.timer", 23).unwrap();
//! client.gauge("some.gauge", 45).unwrap();
//! client.set("some.set", 123).unwrap();
//! client.raw("some.raw", 67, None).unwrap();
//! client.calendargram("some.calendargram", 89, CalendargramPeriod::Hour).unwrap();
//! ```

pub use crate::client::{Calendargrammed, Counted, CountedExt, Gauged, MetricClient, Rawed, Setted, Timed};
pub use crate::transports::Transport;
pub use crate::warn::WarnSink;
