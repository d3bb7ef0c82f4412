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
use std::panic::RefUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::builder::{encode, Decimal, MetricKind, MetricValue, NameBuilder};
use crate::transports::{
    NullTransport, TcpConnector, TcpTransport, Transport, TransportStats, UdpTransport, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_WRITE_TIMEOUT,
};
use crate::types::{CalendargramPeriod, ConnectionType, ErrorKind, MetricError, MetricResult};
use crate::warn::{TracingWarnSink, WarnSink};

type BoxedTransport = Box<dyn Transport + Sync + Send + RefUnwindSafe>;

/// Conversion trait for valid values for counters
///
/// This trait must be implemented for any types that are used as counter
/// values (currently only `i64`). This trait is internal to how values are
/// formatted as part of metrics but is exposed publicly for documentation
/// purposes.
///
/// Typical use of Tally shouldn't require interacting with this trait.
pub trait ToCountValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToCountValue for i64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Integer(self))
    }
}

/// Conversion trait for valid values for timings
///
/// This trait must be implemented for any types that are used as timing
/// values (currently `u64` milliseconds and `Duration`).
///
/// Typical use of Tally shouldn't require interacting with this trait.
pub trait ToTimingValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToTimingValue for u64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Unsigned(self))
    }
}

impl ToTimingValue for Duration {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        let as_millis = self.as_millis();
        if as_millis > u64::MAX as u128 {
            Err(MetricError::from((ErrorKind::InvalidArgument, "u64 overflow")))
        } else {
            Ok(MetricValue::Unsigned(as_millis as u64))
        }
    }
}

/// Conversion trait for valid values for gauges
///
/// This trait must be implemented for any types that are used as gauge
/// values (currently `u64`, `f64`, and `Decimal`).
///
/// Typical use of Tally shouldn't require interacting with this trait.
pub trait ToGaugeValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToGaugeValue for u64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Unsigned(self))
    }
}

impl ToGaugeValue for f64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Float(self))
    }
}

impl ToGaugeValue for Decimal {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Decimal(self))
    }
}

/// Conversion trait for valid values for sets and calendargrams
///
/// This trait must be implemented for any types that are used as unique
/// values of sets or calendargrams (currently `i64` and `&str`).
///
/// Typical use of Tally shouldn't require interacting with this trait.
pub trait ToUniqueValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToUniqueValue for i64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Integer(self))
    }
}

impl ToUniqueValue for &str {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Text(self.to_owned()))
    }
}

/// Trait for incrementing counters.
///
/// Counters are simple values incremented by a client. The rates at which
/// these events occur or average values will be determined by the server
/// receiving them. Examples of counter uses include number of logins to a
/// system or requests received.
///
/// Counts must not be negative.
///
/// The following types are valid for counters:
/// * `i64`
pub trait Counted<T>
where
    T: ToCountValue,
{
    /// Increment the counter by the given amount
    fn count(&self, name: &str, count: T) -> MetricResult<()>;
}

/// Trait for convenience methods for counters
pub trait CountedExt: Counted<i64> {
    /// Increment the counter by 1
    fn incr(&self, name: &str) -> MetricResult<()> {
        self.count(name, 1)
    }
}

/// Trait for recording timings in milliseconds.
///
/// Timings are a positive number of milliseconds between a start and end
/// time. Examples include time taken to render a web page or time taken
/// for a database call to return. `Duration` values are converted to
/// whole milliseconds before being recorded.
///
/// The following types are valid for timings:
/// * `u64`
/// * `Duration`
pub trait Timed<T>
where
    T: ToTimingValue,
{
    /// Record a timing in milliseconds with the given name
    fn time(&self, name: &str, time: T) -> MetricResult<()>;
}

/// Trait for recording gauge values.
///
/// Gauge values are an instantaneous measurement of a value determined
/// by the client. They do not change unless changed by the client. Examples
/// include things like load average or how many connections are active.
///
/// The following types are valid for gauges:
/// * `u64`
/// * `f64` (must be finite)
/// * `Decimal`
pub trait Gauged<T>
where
    T: ToGaugeValue,
{
    /// Record a gauge value with the given name
    fn gauge(&self, name: &str, value: T) -> MetricResult<()>;
}

/// Trait for recording set values.
///
/// Sets count the number of unique elements in a group. You can use them to,
/// for example, count the unique visitors to your site.
///
/// The following types are valid for sets:
/// * `i64`
/// * `&str`
pub trait Setted<T>
where
    T: ToUniqueValue,
{
    /// Record a single set value with the given name
    fn set(&self, name: &str, value: T) -> MetricResult<()>;
}

/// Trait for recording raw values.
///
/// Raw metrics are passed through by the server without aggregation,
/// optionally stamped with the epoch second at which they were observed.
pub trait Rawed {
    /// Record a raw value, with an optional epoch timestamp
    fn raw(&self, name: &str, value: i64, epoch: Option<i64>) -> MetricResult<()>;
}

/// Trait for recording calendargram values.
///
/// Calendargrams count the unique values seen within a recurring window
/// of time, such as the current hour or the current day of the week.
///
/// The following types are valid for calendargrams:
/// * `i64`
/// * `&str`
pub trait Calendargrammed<T>
where
    T: ToUniqueValue,
{
    /// Record a calendargram value for the given period
    fn calendargram(&self, name: &str, value: T, period: CalendargramPeriod) -> MetricResult<()>;
}

/// Trait that encompasses all other traits for sending metrics.
///
/// If you wish to use `StatsdClient` with a generic type or place a
/// `StatsdClient` instance behind a pointer (such as a `Box`) this will allow
/// you to reference all the implemented methods for recording metrics, while
/// using a single trait. An example of this is shown below.
///
/// ```
/// use std::time::Duration;
/// use tally::{CalendargramPeriod, Decimal, MetricClient, NullTransport, StatsdClient};
///
/// let client: Box<dyn MetricClient> = Box::new(StatsdClient::from_transport(
///     "prefix", NullTransport));
///
/// client.count("some.counter", 1).unwrap();
/// client.incr("some.counter").unwrap();
/// client.time("some.timer", 42).unwrap();
/// client.time("some.timer", Duration::from_millis(42)).unwrap();
/// client.gauge("some.gauge", 8).unwrap();
/// client.gauge("some.gauge", 0.5).unwrap();
/// client.gauge("some.gauge", Decimal::new(105, 1)).unwrap();
/// client.set("some.set", 5).unwrap();
/// client.set("some.set", "user-5").unwrap();
/// client.raw("some.raw", 12934, Some(1466021000)).unwrap();
/// client.calendargram("some.calendargram", "user-5", CalendargramPeriod::Day).unwrap();
/// ```
pub trait MetricClient:
    Counted<i64>
    + CountedExt
    + Timed<u64>
    + Timed<Duration>
    + Gauged<u64>
    + Gauged<f64>
    + Gauged<Decimal>
    + Setted<i64>
    + for<'a> Setted<&'a str>
    + Rawed
    + Calendargrammed<i64>
    + for<'a> Calendargrammed<&'a str>
{
}

/// Builder for creating and customizing `StatsdClient` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// method on the `StatsdClient` struct.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tally::prelude::*;
/// use tally::{ConnectionType, StatsdClient, DEFAULT_PORT};
///
/// let client = StatsdClient::builder("metrics.example.com", DEFAULT_PORT)
///     .prefix("my.app")
///     .connection(ConnectionType::Tcp)
///     .retry_attempts(5)
///     .connect_timeout(Duration::from_secs(1))
///     .strict(true)
///     .build()
///     .unwrap();
///
/// client.count("something", 123).unwrap();
/// ```
pub struct StatsdClientBuilder {
    host: String,
    port: u16,
    prefix: String,
    connection: ConnectionType,
    strict: bool,
    retry_on_disconnect: bool,
    retry_attempts: u32,
    connect_timeout: Duration,
    write_timeout: Duration,
    warn: Arc<dyn WarnSink>,
    transport: Option<BoxedTransport>,
}

impl StatsdClientBuilder {
    // Set the required fields and defaults for optional fields
    fn new(host: &str, port: u16) -> Self {
        StatsdClientBuilder {
            // required
            host: host.to_owned(),
            port,

            // optional with defaults
            prefix: String::new(),
            connection: ConnectionType::default(),
            strict: false,
            retry_on_disconnect: true,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            warn: Arc::new(TracingWarnSink),
            transport: None,
        }
    }

    /// Namespace prepended to every metric name, joined with a `.`.
    ///
    /// Leading and trailing `.` characters are removed, so `"my.app."` and
    /// `"my.app"` behave the same. An empty prefix means bare names.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Self::formatted_prefix(prefix);
        self
    }

    /// Protocol used to reach the server, UDP by default.
    pub fn connection(mut self, connection: ConnectionType) -> Self {
        self.connection = connection;
        self
    }

    /// Return transport creation errors from `build()` instead of falling
    /// back to a `NullTransport`. Disabled by default.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// TCP only: reconnect and try again when a write fails. When disabled
    /// each metric is tried exactly once.
    pub fn retry_on_disconnect(mut self, retry: bool) -> Self {
        self.retry_on_disconnect = retry;
        self
    }

    /// TCP only: total number of tries per metric, the first included.
    /// Defaults to three; zero is treated as one.
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// TCP only: upper bound on each connection attempt. A zero timeout is
    /// a construction error, see `build()`.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// TCP only: socket write timeout. Must not be zero.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set where non-fatal warnings are reported.
    ///
    /// The sink receives a message when the client falls back to a
    /// `NullTransport`, when a TCP metric is dropped after every attempt
    /// failed, and when a `TimingGuard` can't record its timing. By default
    /// warnings are emitted as `tracing` events.
    pub fn with_warn_sink<W>(mut self, sink: W) -> Self
    where
        W: WarnSink + 'static,
    {
        self.warn = Arc::new(sink);
        self
    }

    /// Use an already constructed transport instead of creating a socket
    /// for the configured host, port, and connection type.
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + Sync + Send + RefUnwindSafe + 'static,
    {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Construct a new `StatsdClient` instance based on current settings.
    ///
    /// # Failures
    ///
    /// Only in strict mode, with a `TransportInit` error if the transport
    /// could not be created. Otherwise a warning is logged and the client
    /// discards every metric it is given.
    pub fn build(mut self) -> MetricResult<StatsdClient> {
        if self.strict {
            let transport = self.open_transport()?;
            Ok(self.into_client(transport))
        } else {
            Ok(self.build_lenient())
        }
    }

    fn build_lenient(mut self) -> StatsdClient {
        let transport = match self.open_transport() {
            Ok(transport) => transport,
            Err(e) => {
                self.warn.warn(&format!(
                    "Unable to create {:?} transport for {}:{}, metrics will be discarded: {}",
                    self.connection, self.host, self.port, e
                ));
                Box::new(NullTransport)
            }
        };

        self.into_client(transport)
    }

    fn open_transport(&mut self) -> MetricResult<BoxedTransport> {
        if let Some(transport) = self.transport.take() {
            return Ok(transport);
        }

        match self.connection {
            ConnectionType::Udp => Ok(Box::new(UdpTransport::connect(&self.host, self.port)?)),
            ConnectionType::Tcp => {
                let connector = TcpConnector::new(&self.host, self.port)?
                    .connect_timeout(self.connect_timeout)?
                    .write_timeout(self.write_timeout)?;

                let transport = TcpTransport::builder(connector)
                    .retry_attempts(self.retry_attempts)
                    .retry_on_disconnect(self.retry_on_disconnect)
                    .with_shared_warn_sink(Arc::clone(&self.warn))
                    .build();

                Ok(Box::new(transport))
            }
        }
    }

    fn into_client(self, transport: BoxedTransport) -> StatsdClient {
        StatsdClient {
            prefix: self.prefix,
            transport,
            warn: self.warn,
        }
    }

    fn formatted_prefix(prefix: &str) -> String {
        prefix.trim_matches('.').to_owned()
    }
}

/// Client for Statsd that implements various traits to record metrics.
///
/// # Traits
///
/// The client is the main entry point for users of this library. It supports
/// several traits for recording metrics of different types.
///
/// * `Counted` and `CountedExt` for emitting counters.
/// * `Timed` for emitting timings.
/// * `Gauged` for emitting gauge values.
/// * `Setted` for emitting set values.
/// * `Rawed` for emitting raw values.
/// * `Calendargrammed` for emitting calendargram values.
/// * `MetricClient` for a combination of all of the above.
///
/// Names can also be assembled one segment at a time with the `*_path`
/// methods, and `start_timer` records how long a scope took.
///
/// # Errors
///
/// Every method validates its input before anything is sent: an empty
/// name, a negative value, or a non-finite float results in an
/// `InvalidArgument` error and no line reaching the transport. Once a line
/// is formatted, delivery problems are handled by the transport and never
/// returned here.
///
/// # Threading
///
/// The `StatsdClient` is designed to work in a multithreaded application. All
/// parts of the client can be shared between threads (i.e. it is `Send` and
/// `Sync`). Wrap it in an `Arc` to share one client between threads.
///
/// ``` no_run
/// use std::panic::RefUnwindSafe;
/// use std::sync::Arc;
/// use std::thread;
/// use tally::prelude::*;
/// use tally::{StatsdClient, DEFAULT_PORT};
///
/// let metrics: Arc<dyn MetricClient + Send + Sync + RefUnwindSafe> =
///     Arc::new(StatsdClient::new("localhost", DEFAULT_PORT));
///
/// let metric_ref = metrics.clone();
/// let t = thread::spawn(move || {
///     metric_ref.count("request.handler", 1).unwrap();
/// });
///
/// t.join().unwrap();
/// ```
pub struct StatsdClient {
    prefix: String,
    transport: BoxedTransport,
    warn: Arc<dyn WarnSink>,
}

impl StatsdClient {
    /// Create a client sending metrics over UDP to the given host and port,
    /// without a prefix.
    ///
    /// If the host can't be resolved a warning is logged and the client
    /// silently discards metrics instead of failing.
    ///
    /// # Example
    ///
    /// ```
    /// use tally::prelude::*;
    /// use tally::{StatsdClient, DEFAULT_PORT};
    ///
    /// let client = StatsdClient::new("127.0.0.1", DEFAULT_PORT);
    /// client.incr("some.counter").unwrap();
    /// ```
    pub fn new(host: &str, port: u16) -> Self {
        Self::builder(host, port).build_lenient()
    }

    /// Create a new builder for a client sending to the given host and port.
    ///
    /// All other settings have defaults: no prefix, UDP, non-strict, three
    /// TCP attempts per metric, five second TCP timeouts, and warnings
    /// emitted through `tracing`.
    pub fn builder(host: &str, port: u16) -> StatsdClientBuilder {
        StatsdClientBuilder::new(host, port)
    }

    /// Create a client that uses the given prefix for all metrics sent to
    /// the given `Transport` implementation.
    ///
    /// # Example
    ///
    /// ```
    /// use tally::{StatsdClient, NullTransport};
    ///
    /// let client = StatsdClient::from_transport("my.stats", NullTransport);
    /// assert_eq!("my.stats", client.prefix());
    /// ```
    pub fn from_transport<T>(prefix: &str, transport: T) -> Self
    where
        T: Transport + Sync + Send + RefUnwindSafe + 'static,
    {
        Self::builder("", 0).prefix(prefix).transport(transport).build_lenient()
    }

    /// Validate, format, and send a single metric.
    ///
    /// This is the path every other method of the client goes through. The
    /// transport receives exactly one line if the name and value are valid,
    /// and nothing otherwise.
    ///
    /// Note that if you simply want to emit standard metrics, you don't need
    /// to use this method.
    pub fn log_metric(
        &self,
        kind: MetricKind,
        name: &str,
        value: MetricValue,
        suffix: Option<&str>,
    ) -> MetricResult<()> {
        if name.is_empty() {
            return Err(MetricError::from((
                ErrorKind::InvalidArgument,
                "Metric name cannot be empty",
            )));
        }

        value.validate_for(kind)?;
        let line = encode(kind, name, &self.prefix, &value, suffix);
        self.transport.send(&line);
        Ok(())
    }

    /// Normalized prefix, without any leading or trailing `.`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Telemetry of the underlying transport.
    pub fn stats(&self) -> TransportStats {
        self.transport.stats()
    }

    /// Start a count metric name built from path segments.
    pub fn count_path(&self) -> NameBuilder<'_> {
        NameBuilder::new(self, MetricKind::Count)
    }

    /// Start a timing metric name built from path segments.
    pub fn timing_path(&self) -> NameBuilder<'_> {
        NameBuilder::new(self, MetricKind::Timing)
    }

    /// Start a gauge metric name built from path segments.
    pub fn gauge_path(&self) -> NameBuilder<'_> {
        NameBuilder::new(self, MetricKind::Gauge)
    }

    /// Start a set metric name built from path segments.
    pub fn set_path(&self) -> NameBuilder<'_> {
        NameBuilder::new(self, MetricKind::Set)
    }

    /// Start timing something, recording the elapsed milliseconds as a
    /// timing with the given name when the guard is dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use tally::{StatsdClient, NullTransport};
    ///
    /// let client = StatsdClient::from_transport("my.stats", NullTransport);
    /// {
    ///     let _timer = client.start_timer("db.query");
    ///     // ... do the work being timed ...
    /// }
    ///
    /// let timer = client.start_timer("db.query");
    /// timer.stop().unwrap();
    /// ```
    pub fn start_timer(&self, name: &str) -> TimingGuard<'_> {
        TimingGuard {
            client: self,
            name: name.to_owned(),
            start: Instant::now(),
            stopped: false,
        }
    }
}

impl fmt::Debug for StatsdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatsdClient {{ prefix: {:?}, transport: ..., warn: ... }}",
            self.prefix
        )
    }
}

impl<T> Counted<T> for StatsdClient
where
    T: ToCountValue,
{
    fn count(&self, name: &str, value: T) -> MetricResult<()> {
        self.log_metric(MetricKind::Count, name, value.try_to_value()?, None)
    }
}

impl CountedExt for StatsdClient {}

impl<T> Timed<T> for StatsdClient
where
    T: ToTimingValue,
{
    fn time(&self, name: &str, time: T) -> MetricResult<()> {
        self.log_metric(MetricKind::Timing, name, time.try_to_value()?, None)
    }
}

impl<T> Gauged<T> for StatsdClient
where
    T: ToGaugeValue,
{
    fn gauge(&self, name: &str, value: T) -> MetricResult<()> {
        self.log_metric(MetricKind::Gauge, name, value.try_to_value()?, None)
    }
}

impl<T> Setted<T> for StatsdClient
where
    T: ToUniqueValue,
{
    fn set(&self, name: &str, value: T) -> MetricResult<()> {
        self.log_metric(MetricKind::Set, name, value.try_to_value()?, None)
    }
}

impl Rawed for StatsdClient {
    fn raw(&self, name: &str, value: i64, epoch: Option<i64>) -> MetricResult<()> {
        let epoch = epoch.map(|e| e.to_string());
        self.log_metric(MetricKind::Raw, name, MetricValue::Integer(value), epoch.as_deref())
    }
}

impl<T> Calendargrammed<T> for StatsdClient
where
    T: ToUniqueValue,
{
    fn calendargram(&self, name: &str, value: T, period: CalendargramPeriod) -> MetricResult<()> {
        self.log_metric(
            MetricKind::Calendargram,
            name,
            value.try_to_value()?,
            Some(period.code()),
        )
    }
}

impl MetricClient for StatsdClient {}

/// Guard that records a timing when it goes out of scope.
///
/// Created by `StatsdClient::start_timer`. Errors recording the timing on
/// drop are reported to the client's warning sink; call `stop()` instead to
/// get the result back.
#[must_use = "The timing is recorded when the guard is dropped"]
pub struct TimingGuard<'c> {
    client: &'c StatsdClient,
    name: String,
    start: Instant,
    stopped: bool,
}

impl<'c> TimingGuard<'c> {
    /// Time elapsed since the guard was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record the timing now and return the result of doing so.
    pub fn stop(mut self) -> MetricResult<()> {
        self.stopped = true;
        self.record()
    }

    fn record(&self) -> MetricResult<()> {
        self.client.time(&self.name, self.elapsed())
    }
}

impl<'c> Drop for TimingGuard<'c> {
    fn drop(&mut self) {
        if self.stopped {
            return;
        }

        if let Err(e) = self.record() {
            self.client
                .warn
                .warn(&format!("Unable to record timing {:?}: {}", self.name, e));
        }
    }
}

impl<'c> fmt::Debug for TimingGuard<'c> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimingGuard")
            .field("name", &self.name)
            .field("start", &self.start)
            .field("stopped", &self.stopped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Calendargrammed, Counted, CountedExt, Gauged, MetricClient, Rawed, Setted, StatsdClient, Timed,
    };
    use crate::builder::Decimal;
    use crate::transports::{NullTransport, SpyTransport};
    use crate::types::{CalendargramPeriod, ConnectionType, ErrorKind};
    use crossbeam_channel::Receiver;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn new_spy_client(prefix: &str) -> (Receiver<Vec<u8>>, StatsdClient) {
        let (rx, transport) = SpyTransport::new();
        (rx, StatsdClient::from_transport(prefix, transport))
    }

    fn next_line(rx: &Receiver<Vec<u8>>) -> String {
        String::from_utf8(rx.try_recv().unwrap()).unwrap()
    }

    #[test]
    fn test_statsd_client_prefix_trailing_separator() {
        let (rx, client) = new_spy_client("foo.");
        client.count("bar", 1).unwrap();
        assert_eq!("foo.bar:1|c", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_prefix_leading_separator() {
        let (rx, client) = new_spy_client(".foo.");
        assert_eq!("foo", client.prefix());
        client.count("bar", 1).unwrap();
        assert_eq!("foo.bar:1|c", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_empty_prefix() {
        let (rx, client) = new_spy_client("");
        client.count("bar", 1).unwrap();
        assert_eq!("bar:1|c", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_negative_count_rejected() {
        let (rx, client) = new_spy_client("foo");
        let res = client.count("bar", -1);

        assert_eq!(ErrorKind::InvalidArgument, res.unwrap_err().kind());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_statsd_client_empty_name_rejected() {
        let (rx, client) = new_spy_client("foo");
        let res = client.incr("");

        assert_eq!(ErrorKind::InvalidArgument, res.unwrap_err().kind());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_statsd_client_incr() {
        let (rx, client) = new_spy_client("");
        client.incr("logins").unwrap();
        assert_eq!("logins:1|c", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_time() {
        let (rx, client) = new_spy_client("app");
        client.time("query", 25).unwrap();
        client.time("query", Duration::from_micros(4_900)).unwrap();

        assert_eq!("app.query:25|ms", next_line(&rx));
        assert_eq!("app.query:4|ms", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_time_duration_overflow() {
        let (rx, client) = new_spy_client("app");
        let res = client.time("query", Duration::from_secs(u64::MAX));

        assert_eq!(ErrorKind::InvalidArgument, res.unwrap_err().kind());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_statsd_client_gauge_values() {
        let (rx, client) = new_spy_client("");
        client.gauge("conns", 12).unwrap();
        client.gauge("load", 0.25).unwrap();
        client.gauge("price", Decimal::new(1990, 2)).unwrap();

        assert_eq!("conns:12|g", next_line(&rx));
        assert_eq!("load:0.25|g", next_line(&rx));
        assert_eq!("price:19.90|g", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_gauge_rejects_bad_floats() {
        let (rx, client) = new_spy_client("");
        assert!(client.gauge("load", -0.25).is_err());
        assert!(client.gauge("load", f64::NAN).is_err());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_statsd_client_set() {
        let (rx, client) = new_spy_client("web");
        client.set("visitors", 42).unwrap();
        client.set("visitors", "user-42").unwrap();

        assert_eq!("web.visitors:42|s", next_line(&rx));
        assert_eq!("web.visitors:user-42|s", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_raw() {
        let (rx, client) = new_spy_client("");
        client.raw("my.raw.stat", 12934, None).unwrap();
        client.raw("my.raw.stat", 12934, Some(42)).unwrap();

        assert_eq!("my.raw.stat:12934|r", next_line(&rx));
        assert_eq!("my.raw.stat:12934|r|42", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_calendargram() {
        let (rx, client) = new_spy_client("web");
        client
            .calendargram("logins", "user-1", CalendargramPeriod::DayOfWeek)
            .unwrap();
        client.calendargram("logins", 7, CalendargramPeriod::FiveMinutes).unwrap();

        assert_eq!("web.logins:user-1|cg|dow", next_line(&rx));
        assert_eq!("web.logins:7|cg|5min", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_count_path() {
        let (rx, client) = new_spy_client("app");
        client.count_path().segment("api").segment("").segment("hits").add(3_i64).unwrap();
        assert_eq!("app.api.hits:3|c", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_path_untyped_literal() {
        let (rx, client) = new_spy_client("app");
        client.count_path().segment("api").segment("hits").add(1).unwrap();
        client.timing_path().segment("api").segment("latency").add(250).unwrap();
        let res = client.count_path().segment("api").segment("misses").add(-1);

        assert_eq!("app.api.hits:1|c", next_line(&rx));
        assert_eq!("app.api.latency:250|ms", next_line(&rx));
        assert_eq!(ErrorKind::InvalidArgument, res.unwrap_err().kind());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_statsd_client_gauge_path_dispatch() {
        let (rx, client) = new_spy_client("");
        client.gauge_path().segment("pool").segment("load").add(0.5).unwrap();
        client.gauge_path().segment("pool").segment("price").add(Decimal::new(5, 1)).unwrap();
        client.gauge_path().segment("pool").segment("size").add(10_u64).unwrap();

        assert_eq!("pool.load:0.5|g", next_line(&rx));
        assert_eq!("pool.price:0.5|g", next_line(&rx));
        assert_eq!("pool.size:10|g", next_line(&rx));
    }

    #[test]
    fn test_statsd_client_path_without_segments() {
        let (rx, client) = new_spy_client("app");
        let res = client.set_path().segment("").add(1_i64);

        assert_eq!(ErrorKind::InvalidArgument, res.unwrap_err().kind());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_statsd_client_timing_path_rejects_float() {
        let (rx, client) = new_spy_client("app");
        let res = client.timing_path().segment("db").add(1.5);

        assert_eq!(ErrorKind::InvalidArgument, res.unwrap_err().kind());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_statsd_client_timing_guard_drop() {
        let (rx, client) = new_spy_client("app");
        {
            let _timer = client.start_timer("block");
        }

        let line = next_line(&rx);
        assert!(line.starts_with("app.block:"), "unexpected line {}", line);
        assert!(line.ends_with("|ms"), "unexpected line {}", line);
    }

    #[test]
    fn test_statsd_client_timing_guard_stop() {
        let (rx, client) = new_spy_client("app");
        let timer = client.start_timer("block");
        timer.stop().unwrap();

        assert!(next_line(&rx).ends_with("|ms"));
        assert!(rx.is_empty());
    }

    #[test]
    fn test_statsd_client_timing_guard_warns_on_error() {
        let warnings = Arc::new(Mutex::new(Vec::new()));
        let warnings_ref = Arc::clone(&warnings);

        let client = StatsdClient::builder("", 0)
            .transport(NullTransport)
            .with_warn_sink(move |msg: &str| warnings_ref.lock().unwrap().push(msg.to_owned()))
            .build()
            .unwrap();

        drop(client.start_timer(""));
        assert_eq!(1, warnings.lock().unwrap().len());
    }

    #[test]
    fn test_statsd_client_strict_empty_tcp_host() {
        let res = StatsdClient::builder("", 8125)
            .connection(ConnectionType::Tcp)
            .strict(true)
            .build();

        assert_eq!(ErrorKind::TransportInit, res.unwrap_err().kind());
    }

    #[test]
    fn test_statsd_client_lenient_empty_tcp_host_falls_back() {
        let warnings = Arc::new(Mutex::new(Vec::new()));
        let warnings_ref = Arc::clone(&warnings);

        let client = StatsdClient::builder("", 8125)
            .connection(ConnectionType::Tcp)
            .with_warn_sink(move |msg: &str| warnings_ref.lock().unwrap().push(msg.to_owned()))
            .build()
            .unwrap();

        client.count("still.works", 1).unwrap();
        assert_eq!(1, warnings.lock().unwrap().len());
        assert_eq!(0, client.stats().lines_sent);
    }

    #[test]
    fn test_statsd_client_strict_zero_tcp_timeouts() {
        let connect = StatsdClient::builder("127.0.0.1", 8125)
            .connection(ConnectionType::Tcp)
            .connect_timeout(Duration::ZERO)
            .strict(true)
            .build();

        let write = StatsdClient::builder("127.0.0.1", 8125)
            .connection(ConnectionType::Tcp)
            .write_timeout(Duration::ZERO)
            .strict(true)
            .build();

        assert_eq!(ErrorKind::TransportInit, connect.unwrap_err().kind());
        assert_eq!(ErrorKind::TransportInit, write.unwrap_err().kind());
    }

    #[test]
    fn test_statsd_client_lenient_zero_tcp_timeout_falls_back() {
        let warnings = Arc::new(Mutex::new(Vec::new()));
        let warnings_ref = Arc::clone(&warnings);

        let client = StatsdClient::builder("127.0.0.1", 8125)
            .connection(ConnectionType::Tcp)
            .write_timeout(Duration::ZERO)
            .with_warn_sink(move |msg: &str| warnings_ref.lock().unwrap().push(msg.to_owned()))
            .build()
            .unwrap();

        client.count("still.works", 1).unwrap();
        assert_eq!(1, warnings.lock().unwrap().len());
        assert!(warnings.lock().unwrap()[0].contains("timeout cannot be zero"));
    }

    #[test]
    fn test_statsd_client_injected_transport_ignores_host() {
        let (rx, transport) = SpyTransport::new();
        let client = StatsdClient::builder("", 0)
            .prefix("injected")
            .transport(transport)
            .strict(true)
            .build()
            .unwrap();

        client.incr("ok").unwrap();
        assert_eq!("injected.ok:1|c", next_line(&rx));
        assert_eq!(1, client.stats().lines_sent);
    }

    #[test]
    fn test_statsd_client_as_metric_client() {
        let (rx, client) = new_spy_client("dyn");
        let client: Box<dyn MetricClient + Send + Sync> = Box::new(client);

        client.count("a", 1).unwrap();
        client.set("b", "x").unwrap();

        assert_eq!("dyn.a:1|c", next_line(&rx));
        assert_eq!("dyn.b:x|s", next_line(&rx));
    }
}
