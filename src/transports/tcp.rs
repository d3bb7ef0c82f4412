// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::io::{self, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use crate::transports::core::{SocketStats, Transport, TransportStats};
use crate::types::{ErrorKind, MetricError, MetricResult};
use crate::warn::{TracingWarnSink, WarnSink};

pub(crate) const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

const LINE_TERMINATOR: char = '\n';

/// An established connection that newline terminated metrics are written to.
///
/// Both methods take `&self` so that one connection can be shared by every
/// thread sending through a `TcpTransport`. Implementations must write the
/// whole buffer or fail.
pub trait LineStream: Send + Sync {
    /// Write a complete line, terminator included.
    fn write_line(&self, line: &[u8]) -> io::Result<()>;

    /// Live check of whether the connection is still usable. This must look
    /// at the socket itself rather than a cached flag.
    fn is_connected(&self) -> bool;
}

impl LineStream for TcpStream {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut stream = self;
        stream.write_all(line)
    }

    fn is_connected(&self) -> bool {
        matches!(self.take_error(), Ok(None)) && self.peer_addr().is_ok()
    }
}

/// Factory for the connections used by a `TcpTransport`.
///
/// Called lazily, the first time a line is sent and again each time the
/// current connection has failed.
pub trait Connector: Send + Sync {
    type Stream: LineStream;

    fn connect(&self) -> io::Result<Self::Stream>;
}

/// `Connector` that opens a `TcpStream` to a host and port.
///
/// The host is resolved again on every connect so that DNS changes are
/// picked up when reconnecting. Each resolved address is tried in turn,
/// bounded by the connect timeout. Established streams have `TCP_NODELAY`
/// and the write timeout applied.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    host: String,
    port: u16,
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl TcpConnector {
    /// Create a connector for the given host and port using the default
    /// timeouts (five seconds each).
    ///
    /// # Failures
    ///
    /// Fails with `TransportInit` if the host is empty. No resolution or
    /// connection happens here.
    pub fn new(host: &str, port: u16) -> MetricResult<TcpConnector> {
        if host.is_empty() {
            return Err(MetricError::from((ErrorKind::TransportInit, "TCP host cannot be empty")));
        }

        Ok(TcpConnector {
            host: host.to_owned(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        })
    }

    /// Upper bound on each attempt to connect to a single address.
    ///
    /// # Failures
    ///
    /// Fails with `TransportInit` if the timeout is zero.
    pub fn connect_timeout(mut self, timeout: Duration) -> MetricResult<Self> {
        self.connect_timeout = checked_timeout(timeout)?;
        Ok(self)
    }

    /// Socket write timeout applied to established connections.
    ///
    /// # Failures
    ///
    /// Fails with `TransportInit` if the timeout is zero.
    pub fn write_timeout(mut self, timeout: Duration) -> MetricResult<Self> {
        self.write_timeout = checked_timeout(timeout)?;
        Ok(self)
    }
}

// std refuses zero durations for both connect and socket timeouts
fn checked_timeout(timeout: Duration) -> MetricResult<Duration> {
    if timeout.is_zero() {
        Err(MetricError::from((ErrorKind::TransportInit, "TCP timeout cannot be zero")))
    } else {
        Ok(timeout)
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self) -> io::Result<TcpStream> {
        let mut last_err = None;

        for addr in (self.host.as_str(), self.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => {
                    stream.set_write_timeout(Some(self.write_timeout))?;
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses resolved for host")))
    }
}

/// Builder for creating and customizing a `TcpTransport`.
///
/// Obtained from `TcpTransport::builder()`.
pub struct TcpTransportBuilder<C> {
    connector: C,
    retry_attempts: u32,
    retry_on_disconnect: bool,
    warn: Arc<dyn WarnSink>,
}

impl<C> TcpTransportBuilder<C>
where
    C: Connector,
{
    /// Total number of tries for every line, the first included.
    ///
    /// Defaults to three. A value of zero is treated as one.
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Reconnect and try again when a write fails. When disabled, each line
    /// is tried exactly once regardless of `retry_attempts`.
    pub fn retry_on_disconnect(mut self, retry: bool) -> Self {
        self.retry_on_disconnect = retry;
        self
    }

    /// Where to report lines dropped after every attempt failed.
    pub fn with_warn_sink<W>(mut self, sink: W) -> Self
    where
        W: WarnSink + 'static,
    {
        self.warn = Arc::new(sink);
        self
    }

    pub(crate) fn with_shared_warn_sink(mut self, sink: Arc<dyn WarnSink>) -> Self {
        self.warn = sink;
        self
    }

    pub fn build(self) -> TcpTransport<C> {
        let attempts = if self.retry_on_disconnect {
            self.retry_attempts.max(1)
        } else {
            1
        };

        TcpTransport {
            connector: self.connector,
            slot: RwLock::new(None),
            reconnect: Mutex::new(()),
            attempts,
            warn: self.warn,
            stats: SocketStats::default(),
        }
    }
}

/// Implementation of a `Transport` that writes newline terminated metrics
/// to a persistent TCP connection.
///
/// No connection is made until the first line is sent. When a write fails,
/// the connection is discarded and the line is tried again on a new one,
/// up to the configured number of attempts. A line that fails every
/// attempt is dropped and reported to the warning sink; nothing is ever
/// returned to the caller.
///
/// The transport can be shared between threads. Reconnecting is guarded so
/// that callers racing on a broken connection open only one replacement.
/// Writes themselves are not serialized beyond what the OS does for a
/// single socket, so lines from concurrent callers may arrive in any order.
pub struct TcpTransport<C: Connector = TcpConnector> {
    connector: C,
    slot: RwLock<Option<Arc<C::Stream>>>,
    reconnect: Mutex<()>,
    attempts: u32,
    warn: Arc<dyn WarnSink>,
    stats: SocketStats,
}

impl TcpTransport<TcpConnector> {
    /// Create a transport for the given host and port with default settings.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tally::{TcpTransport, Transport, DEFAULT_PORT};
    ///
    /// let transport = TcpTransport::new("metrics.example.com", DEFAULT_PORT).unwrap();
    /// transport.send("some.counter:1|c");
    /// ```
    pub fn new(host: &str, port: u16) -> MetricResult<Self> {
        Ok(Self::builder(TcpConnector::new(host, port)?).build())
    }
}

impl<C> TcpTransport<C>
where
    C: Connector,
{
    /// Start building a transport on top of the given connector.
    pub fn builder(connector: C) -> TcpTransportBuilder<C> {
        TcpTransportBuilder {
            connector,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_on_disconnect: true,
            warn: Arc::new(TracingWarnSink),
        }
    }

    /// Total tries made for each line.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn current(&self) -> Option<Arc<C::Stream>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().filter(|s| s.is_connected()).cloned()
    }

    fn stream(&self) -> io::Result<Arc<C::Stream>> {
        match self.current() {
            Some(stream) => Ok(stream),
            None => self.restore(),
        }
    }

    fn restore(&self) -> io::Result<Arc<C::Stream>> {
        let _guard = self.reconnect.lock().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have reconnected while we waited on the guard
        if let Some(stream) = self.current() {
            return Ok(stream);
        }

        let stream = Arc::new(self.connector.connect()?);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&stream));
        Ok(stream)
    }

    fn invalidate(&self, failed: &Arc<C::Stream>) {
        let _guard = self.reconnect.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);

        // Only forget the connection if nobody has replaced it already
        if slot.as_ref().map_or(false, |s| Arc::ptr_eq(s, failed)) {
            *slot = None;
        }
    }

    fn try_send(&self, payload: &[u8]) -> io::Result<()> {
        let stream = self.stream()?;
        let res = stream.write_line(payload);
        if res.is_err() {
            self.invalidate(&stream);
        }
        res
    }

    fn send_with_retry(&self, payload: &[u8]) {
        let mut attempts_left = self.attempts;

        loop {
            match self.try_send(payload) {
                Ok(()) => {
                    self.stats.incr_sent(payload.len() as u64);
                    return;
                }
                Err(_) if attempts_left > 1 => attempts_left -= 1,
                Err(e) => {
                    self.stats.incr_dropped(payload.len() as u64);
                    self.warn.warn(&format!(
                        "Dropping metric after {} failed TCP attempt(s): {}",
                        self.attempts, e
                    ));
                    return;
                }
            }
        }
    }
}

impl<C> Transport for TcpTransport<C>
where
    C: Connector,
{
    fn send(&self, line: &str) {
        let mut payload = String::with_capacity(line.len() + 1);
        payload.push_str(line);
        payload.push(LINE_TERMINATOR);
        self.send_with_retry(payload.as_bytes());
    }

    fn stats(&self) -> TransportStats {
        (&self.stats).into()
    }
}

impl<C> fmt::Debug for TcpTransport<C>
where
    C: Connector + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpTransport")
            .field("connector", &self.connector)
            .field("attempts", &self.attempts)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
