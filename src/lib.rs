// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A resilient Statsd client for Rust!
//!
//! Tally emits Statsd metrics from your application over UDP or TCP without
//! ever letting the metrics server take your application down with it.
//!
//! ## Features
//!
//! * Support for emitting counters, timings, gauges, sets, raw values, and
//!   calendargrams.
//! * UDP for fire-and-forget delivery, or a persistent TCP connection that
//!   reconnects and retries a bounded number of times.
//! * Falls back to discarding metrics (with a warning) when the server can't
//!   be reached at startup, unless strict mode is requested.
//! * Support for alternate backends via the `Transport` trait.
//! * Exact decimal gauges, fluent metric names, and scoped timers.
//!
//! ## Install
//!
//! To make use of `tally` in your project, add it as a dependency in your `Cargo.toml` file.
//!
//! ```toml
//! [dependencies]
//! tally = "x.y.z"
//! ```
//!
//! ## Usage
//!
//! ### Simple Use
//!
//! Create a client that will write to some imaginary metrics server over
//! UDP, and send a few metrics.
//!
//! ```rust,no_run
//! use tally::prelude::*;
//! use tally::{StatsdClient, DEFAULT_PORT};
//!
//! let client = StatsdClient::new("metrics.example.com", DEFAULT_PORT);
//!
//! // Emit metrics!
//! client.incr("some.counter").unwrap();
//! client.time("some.methodCall", 42).unwrap();
//! client.gauge("some.thing", 7).unwrap();
//! client.set("some.unique", "user-1").unwrap();
//! ```
//!
//! ### Configured Use
//!
//! The builder controls the prefix, the protocol, and how failures are
//! handled. With `ConnectionType::Tcp` each metric is written as a line to a
//! persistent connection; broken connections are replaced and the metric
//! is tried again, three times in total by default.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tally::prelude::*;
//! use tally::{CalendargramPeriod, ConnectionType, StatsdClient, DEFAULT_PORT};
//!
//! let client = StatsdClient::builder("metrics.example.com", DEFAULT_PORT)
//!     .prefix("my.app")
//!     .connection(ConnectionType::Tcp)
//!     .retry_attempts(5)
//!     .write_timeout(Duration::from_secs(1))
//!     .build()
//!     .unwrap();
//!
//! client.raw("orders.total", 1250, Some(1466021000)).unwrap();
//! client.calendargram("logins", "user-1", CalendargramPeriod::Day).unwrap();
//! ```
//!
//! ### Warnings
//!
//! Problems that don't belong to any single call (a metric dropped after
//! every TCP attempt failed, falling back to discarding metrics) are logged
//! as `tracing` events with the `tally` target. Any `Fn(&str)` can be used
//! instead via `with_warn_sink`.
//!
//! ```rust
//! use tally::prelude::*;
//! use tally::StatsdClient;
//!
//! let client = StatsdClient::builder("", 8125)
//!     .with_warn_sink(|msg: &str| eprintln!("metrics: {}", msg))
//!     .build()
//!     .unwrap();
//!
//! client.incr("some.counter").unwrap();
//! ```
//!
//! ### Fluent Names
//!
//! ```rust
//! use tally::{NullTransport, StatsdClient};
//!
//! let client = StatsdClient::from_transport("my.app", NullTransport);
//! client.count_path().segment("api").segment("v1").segment("hits").add(1).unwrap();
//! ```
//!
//! ### Scoped Timers
//!
//! ```rust
//! use tally::{NullTransport, StatsdClient};
//!
//! let client = StatsdClient::from_transport("my.app", NullTransport);
//! {
//!     let _timer = client.start_timer("expensive.call");
//!     // elapsed milliseconds are sent when `_timer` is dropped
//! }
//! ```
//!
//! ### Custom Transports
//!
//! ```rust
//! use tally::{StatsdClient, Transport};
//!
//! pub struct StdoutTransport;
//!
//! impl Transport for StdoutTransport {
//!     fn send(&self, line: &str) {
//!         println!("{}", line);
//!     }
//! }
//!
//! let client = StatsdClient::from_transport("my.prefix", StdoutTransport);
//! ```

#![forbid(unsafe_code)]

pub const DEFAULT_PORT: u16 = 8125;

pub use self::builder::{encode, Decimal, MetricKind, MetricValue, NameBuilder};

pub use self::client::{
    Calendargrammed, Counted, CountedExt, Gauged, MetricClient, Rawed, Setted, StatsdClient, StatsdClientBuilder,
    Timed, TimingGuard,
};

pub use self::transports::{
    Connector, LineStream, NullTransport, SpyTransport, TcpConnector, TcpTransport, TcpTransportBuilder, Transport,
    TransportStats, UdpTransport,
};

pub use self::types::{CalendargramPeriod, ConnectionType, ErrorKind, MetricError, MetricResult};

pub use self::warn::{NopWarnSink, TracingWarnSink, WarnSink};

mod builder;
mod client;
pub mod ext;
pub mod prelude;
mod transports;
mod types;
mod warn;
