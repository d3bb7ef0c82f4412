// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::client::StatsdClient;
use crate::types::{ErrorKind, MetricError, MetricResult};
use std::fmt::{self, Write};

pub use self::decimal::Decimal;

mod decimal;

/// Type of metric that knows how to display its wire code
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum MetricKind {
    Count,
    Timing,
    Gauge,
    Set,
    Raw,
    Calendargram,
}

impl MetricKind {
    pub fn code(&self) -> &'static str {
        match *self {
            MetricKind::Count => "c",
            MetricKind::Timing => "ms",
            MetricKind::Gauge => "g",
            MetricKind::Set => "s",
            MetricKind::Raw => "r",
            MetricKind::Calendargram => "cg",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.code().fmt(f)
    }
}

/// Holder for metric values that knows how to display itself
///
/// Each per-kind trait on the client converts its arguments into one of
/// these variants before the line is formatted. It is also the argument
/// of `NameBuilder::add`, where the variant decides which kinds accept it.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
}

impl MetricValue {
    /// Check that the value may be sent as a metric of the given kind.
    ///
    /// Values on the wire are never negative. Floating point and decimal
    /// values are only meaningful for gauges, and text values only for
    /// sets and calendargrams.
    pub fn validate_for(&self, kind: MetricKind) -> MetricResult<()> {
        let negative = || MetricError::from((ErrorKind::InvalidArgument, "Metric value cannot be negative"));
        let unsupported = || {
            MetricError::from((
                ErrorKind::InvalidArgument,
                "Value type not supported for metric kind",
            ))
        };

        match *self {
            MetricValue::Integer(v) if v < 0 => Err(negative()),
            MetricValue::Integer(_) | MetricValue::Unsigned(_) => Ok(()),
            MetricValue::Float(_) | MetricValue::Decimal(_) if kind != MetricKind::Gauge => Err(unsupported()),
            MetricValue::Float(v) if !v.is_finite() => Err(MetricError::from((
                ErrorKind::InvalidArgument,
                "Metric value must be finite",
            ))),
            MetricValue::Float(v) if v < 0.0 => Err(negative()),
            MetricValue::Float(_) => Ok(()),
            MetricValue::Decimal(d) if d.is_sign_negative() => Err(negative()),
            MetricValue::Decimal(_) => Ok(()),
            MetricValue::Text(_) if kind != MetricKind::Set && kind != MetricKind::Calendargram => Err(unsupported()),
            MetricValue::Text(ref s) if s.is_empty() => Err(MetricError::from((
                ErrorKind::InvalidArgument,
                "Metric value cannot be empty",
            ))),
            MetricValue::Text(_) => Ok(()),
        }
    }

    fn size_hint(&self) -> usize {
        match *self {
            MetricValue::Text(ref s) => s.len(),
            _ => 20,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Integer(v) => v.fmt(f),
            MetricValue::Unsigned(v) => v.fmt(f),
            // -0.0 would otherwise be written with a sign
            MetricValue::Float(v) if v == 0.0 => "0".fmt(f),
            MetricValue::Float(v) => v.fmt(f),
            MetricValue::Decimal(ref v) => v.fmt(f),
            MetricValue::Text(ref v) => v.fmt(f),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

// Unsuffixed integer literals fall back to i32
impl From<i32> for MetricValue {
    fn from(v: i32) -> Self {
        MetricValue::Integer(i64::from(v))
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Unsigned(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<Decimal> for MetricValue {
    fn from(v: Decimal) -> Self {
        MetricValue::Decimal(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_owned())
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        MetricValue::Text(v)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LineFormatter<'a> {
    prefix: &'a str,
    name: &'a str,
    value: &'a MetricValue,
    kind: MetricKind,
    suffix: Option<&'a str>,
}

impl<'a> LineFormatter<'a> {
    pub(crate) fn new(
        kind: MetricKind,
        name: &'a str,
        prefix: &'a str,
        value: &'a MetricValue,
        suffix: Option<&'a str>,
    ) -> Self {
        LineFormatter {
            prefix,
            name,
            value,
            kind,
            suffix,
        }
    }

    #[rustfmt::skip]
    fn size_hint(&self) -> usize {
        self.prefix.len() + 1 /* . */ + self.name.len() + 1 /* : */ + self.value.size_hint()
            + 1 /* | */ + 2 /* kind */ + self.suffix.map(|s| s.len() + 1).unwrap_or(0)
    }

    pub(crate) fn format(&self) -> String {
        let mut out = String::with_capacity(self.size_hint());
        if !self.prefix.is_empty() {
            out.push_str(self.prefix);
            out.push('.');
        }

        let _ = write!(out, "{}:{}|{}", self.name, self.value, self.kind);
        if let Some(suffix) = self.suffix {
            out.push('|');
            out.push_str(suffix);
        }

        out
    }
}

/// Format a single metric line in the Statsd wire protocol.
///
/// The result has the shape `[prefix.]name:value|code[|suffix]`, without a
/// line terminator. The prefix is joined to the name with a single `.` and
/// left out entirely when empty. No validation is done here: callers are
/// expected to have checked the name and value already.
///
/// # Example
///
/// ```
/// use tally::{encode, MetricKind, MetricValue};
///
/// let line = encode(MetricKind::Raw, "my.raw.stat", "", &MetricValue::Integer(12934), Some("42"));
/// assert_eq!("my.raw.stat:12934|r|42", line);
/// ```
pub fn encode(kind: MetricKind, name: &str, prefix: &str, value: &MetricValue, suffix: Option<&str>) -> String {
    LineFormatter::new(kind, name, prefix, value, suffix).format()
}

/// Builder for metric names assembled one path segment at a time.
///
/// Created by the `*_path` methods of `StatsdClient`. Segments are joined
/// with `.` and the metric is only sent when `.add()` is called with a
/// value; the variant of the value decides how it is formatted.
///
/// # Example
///
/// ```
/// use tally::{NullTransport, StatsdClient};
///
/// let client = StatsdClient::from_transport("my.prefix", NullTransport);
/// client.count_path().segment("api").segment("requests").add(1).unwrap();
/// client.gauge_path().segment("pool").segment("load").add(0.75).unwrap();
/// ```
#[must_use = "Did you forget to call .add() on the name builder?"]
#[derive(Debug)]
pub struct NameBuilder<'c> {
    client: &'c StatsdClient,
    kind: MetricKind,
    segments: Vec<String>,
}

impl<'c> NameBuilder<'c> {
    pub(crate) fn new(client: &'c StatsdClient, kind: MetricKind) -> Self {
        NameBuilder {
            client,
            kind,
            segments: Vec::new(),
        }
    }

    /// Append a segment to the metric name. Empty segments are skipped.
    pub fn segment<S: AsRef<str>>(mut self, name: S) -> Self {
        let name = name.as_ref();
        if !name.is_empty() {
            self.segments.push(name.to_owned());
        }
        self
    }

    /// The dotted name accumulated so far.
    pub fn name(&self) -> String {
        self.segments.join(".")
    }

    /// Send the metric with the accumulated name and the given value.
    ///
    /// Plain integer literals are sent as signed integers; use a `u64` for
    /// values above `i64::MAX`.
    ///
    /// Fails with `InvalidArgument` if no segments were added or if the
    /// value is not valid for the kind of metric being built.
    pub fn add<V: Into<MetricValue>>(self, value: V) -> MetricResult<()> {
        let name = self.name();
        self.client.log_metric(self.kind, &name, value.into(), None)
    }
}
