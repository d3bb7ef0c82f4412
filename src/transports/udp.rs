// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use crate::transports::core::{SocketStats, Transport, TransportStats};
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Resolve a host and port into a single address to send metrics to.
///
/// Literal IP addresses are used as-is. Anything else goes through a DNS
/// lookup and the first IPv4 address returned is picked.
fn get_addr(host: &str, port: u16) -> MetricResult<SocketAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| MetricError::from((ErrorKind::TransportInit, "Unable to resolve host", e)))?;

    addrs.into_iter().find(SocketAddr::is_ipv4).ok_or_else(|| {
        MetricError::from((
            ErrorKind::TransportInit,
            "No IPv4 address found for host",
        ))
    })
}

fn unspecified_for(addr: &SocketAddr) -> SocketAddr {
    match addr {
        SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    }
}

/// Implementation of a `Transport` that emits metrics over UDP.
///
/// Each metric line is written as a single datagram, without a trailing
/// newline, when `.send()` is called, in the thread of the caller. The
/// socket is non-blocking and connected to exactly one peer. Writes that
/// fail are not retried: they are only counted in `stats()`.
#[derive(Debug)]
pub struct UdpTransport {
    addr: SocketAddr,
    socket: UdpSocket,
    stats: SocketStats,
}

impl UdpTransport {
    /// Resolve the Statsd server and create a socket connected to it.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tally::{Transport, UdpTransport, DEFAULT_PORT};
    ///
    /// let transport = UdpTransport::connect("metrics.example.com", DEFAULT_PORT).unwrap();
    /// transport.send("some.counter:1|c");
    /// ```
    ///
    /// # Failures
    ///
    /// This method fails with a `TransportInit` error if:
    ///
    /// * The host cannot be resolved, or resolves to no IPv4 address.
    /// * A local socket cannot be bound, connected, or made non-blocking.
    pub fn connect(host: &str, port: u16) -> MetricResult<UdpTransport> {
        let addr = get_addr(host, port)?;
        let init = |e| MetricError::from((ErrorKind::TransportInit, "Unable to set up UDP socket", e));

        let socket = UdpSocket::bind(unspecified_for(&addr)).map_err(init)?;
        socket.connect(addr).map_err(init)?;
        socket.set_nonblocking(true).map_err(init)?;

        Ok(UdpTransport {
            addr,
            socket,
            stats: SocketStats::default(),
        })
    }

    /// Address of the Statsd server this transport sends to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Transport for UdpTransport {
    fn send(&self, line: &str) {
        let _ = self.stats.update(self.socket.send(line.as_bytes()), line.len());
    }

    fn stats(&self) -> TransportStats {
        (&self.stats).into()
    }
}
