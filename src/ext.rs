// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Advanced extension points for the Tally library
//!
//! Most users of Tally shouldn't need to make use of this module or
//! the included traits and types. However, users that need to extend the
//! library in unforeseen ways may find them useful.
//!
//! The various `To*Value` traits are used as markers for types that are
//! valid for each kind of metric. They also contain conversion logic for
//! the types in some cases (such as in the case of `Duration` objects).
//! Implement them for your own types to pass those types directly to the
//! methods of the client.
//!
//! `StatsdClient::log_metric` together with `MetricKind` and `MetricValue`
//! sends any metric through the same validation and transport as the
//! built-in methods.

pub use crate::builder::{MetricKind, MetricValue};
pub use crate::client::{ToCountValue, ToGaugeValue, ToTimingValue, ToUniqueValue};
