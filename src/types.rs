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
use std::io;
use std::str::FromStr;
use thiserror::Error;

/// Potential categories an error from this library falls into.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// A metric name or value was rejected before reaching a transport.
    InvalidArgument,
    /// A transport could not be created (unresolvable host, socket error).
    TransportInit,
    /// A lower level I/O error.
    IoError,
}

/// Error generated by this library, potentially wrapping an I/O error.
///
/// Only construction-time misconfiguration and input validation ever
/// reach callers. Failures delivering an already formatted line are
/// absorbed by the transport that encountered them.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct MetricError {
    repr: ErrorRepr,
}

#[derive(Debug, Error)]
enum ErrorRepr {
    #[error("{1}")]
    WithDescription(ErrorKind, &'static str),
    #[error("{1}: {2}")]
    WithCause(ErrorKind, &'static str, #[source] io::Error),
    #[error(transparent)]
    IoError(io::Error),
}

impl MetricError {
    /// Return the kind of the error
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::IoError(_) => ErrorKind::IoError,
            ErrorRepr::WithDescription(kind, _) => kind,
            ErrorRepr::WithCause(kind, _, _) => kind,
        }
    }
}

impl From<io::Error> for MetricError {
    fn from(err: io::Error) -> MetricError {
        MetricError {
            repr: ErrorRepr::IoError(err),
        }
    }
}

impl From<(ErrorKind, &'static str)> for MetricError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> MetricError {
        MetricError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

impl From<(ErrorKind, &'static str, io::Error)> for MetricError {
    fn from((kind, desc, err): (ErrorKind, &'static str, io::Error)) -> MetricError {
        MetricError {
            repr: ErrorRepr::WithCause(kind, desc, err),
        }
    }
}

pub type MetricResult<T> = Result<T, MetricError>;

/// The network protocol used to reach the Statsd server.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ConnectionType {
    /// Connectionless, best-effort delivery (recommended).
    #[default]
    Udp,
    /// Persistent stream with reconnect and bounded retry.
    Tcp,
}

/// Retention window for a calendargram metric.
///
/// Calendargrams count unique values seen within a recurring window. The
/// window is sent as the trailing suffix of the metric line.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum CalendargramPeriod {
    OneMinute,
    FiveMinutes,
    Hour,
    Day,
    Week,
    DayOfWeek,
    Month,
}

impl CalendargramPeriod {
    /// Wire code for this period, e.g. `"dow"` for `DayOfWeek`.
    pub fn code(&self) -> &'static str {
        match *self {
            CalendargramPeriod::OneMinute => "1min",
            CalendargramPeriod::FiveMinutes => "5min",
            CalendargramPeriod::Hour => "h",
            CalendargramPeriod::Day => "d",
            CalendargramPeriod::Week => "w",
            CalendargramPeriod::DayOfWeek => "dow",
            CalendargramPeriod::Month => "m",
        }
    }
}

impl fmt::Display for CalendargramPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.code().fmt(f)
    }
}

impl FromStr for CalendargramPeriod {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1min" => Ok(CalendargramPeriod::OneMinute),
            "5min" => Ok(CalendargramPeriod::FiveMinutes),
            "h" => Ok(CalendargramPeriod::Hour),
            "d" => Ok(CalendargramPeriod::Day),
            "w" => Ok(CalendargramPeriod::Week),
            "dow" => Ok(CalendargramPeriod::DayOfWeek),
            "m" => Ok(CalendargramPeriod::Month),
            _ => Err(MetricError::from((
                ErrorKind::InvalidArgument,
                "Unknown calendargram period",
            ))),
        }
    }
}
