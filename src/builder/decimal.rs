// Tally - A resilient Statsd client for Rust!
//
// Copyright 2026 The Tally Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::{ErrorKind, MetricError};
use std::fmt;
use std::str::FromStr;

// Upper bound on fractional digits, matching what a 96 bit decimal mantissa
// can meaningfully carry.
const MAX_SCALE: u32 = 28;

/// Exact base-10 number, `mantissa * 10^-scale`.
///
/// Used for gauges that must be emitted without binary floating point
/// rounding. The scale given at construction is kept when displayed, so
/// `"1.50"` is sent as `1.50`, never as `1.5` or `1.500000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    /// Create a decimal equal to `mantissa * 10^-scale`.
    ///
    /// # Example
    ///
    /// ```
    /// use tally::Decimal;
    ///
    /// assert_eq!("12.05", Decimal::new(1205, 2).to_string());
    /// ```
    pub const fn new(mantissa: i128, scale: u32) -> Decimal {
        Decimal { mantissa, scale }
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// True if the value is strictly less than zero.
    pub fn is_sign_negative(&self) -> bool {
        self.mantissa < 0
    }
}

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        Decimal::new(i128::from(v), 0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa < 0 {
            f.write_str("-")?;
        }

        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }

        if digits.len() > scale {
            let (whole, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", whole, frac)
        } else {
            write!(f, "0.{:0>width$}", digits, width = scale)
        }
    }
}

impl FromStr for Decimal {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MetricError::from((ErrorKind::InvalidArgument, "Invalid decimal value"));

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (whole, frac) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }

        if frac.len() > MAX_SCALE as usize {
            return Err(invalid());
        }

        let mut mantissa: i128 = 0;
        for c in whole.chars().chain(frac.chars()) {
            let digit = c.to_digit(10).ok_or_else(invalid)?;
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(digit)))
                .ok_or_else(invalid)?;
        }

        if negative {
            mantissa = -mantissa;
        }

        Ok(Decimal::new(mantissa, frac.len() as u32))
    }
}
