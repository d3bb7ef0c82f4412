// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod core;
mod spy;
mod tcp;
mod udp;

pub use crate::transports::core::{NullTransport, Transport, TransportStats};
pub use crate::transports::spy::SpyTransport;
pub use crate::transports::tcp::{Connector, LineStream, TcpConnector, TcpTransport, TcpTransportBuilder};
pub use crate::transports::udp::UdpTransport;

pub(crate) use crate::transports::tcp::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_RETRY_ATTEMPTS, DEFAULT_WRITE_TIMEOUT};
