//! Human readable wrappers for durations and counts.
use crate::Real;
use std::{
    fmt::{Display, Formatter, Result},
    ops::{Add, Div, Mul, Sub},
};

/// Integer which displays with thousands separators, e.g. `1,234,567`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PrettyInt(pub i64);

impl Display for PrettyInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let digits = self.0.unsigned_abs().to_string();
        let grouped = digits
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        if self.0 < 0 {
            write!(f, "-{grouped}")
        } else {
            write!(f, "{grouped}")
        }
    }
}

/// Broken-down representation of a duration.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dhms {
    pub positive: bool,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
}

/// Time duration in seconds, which displays in the most natural unit.
///
/// Behaves like a [Real] in arithmetic and can always be converted back into one.
#[derive(Default, Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PrettyDuration(pub Real);

impl PrettyDuration {
    /// Splits a number of seconds into days, hours, minutes, seconds and milliseconds.
    pub fn to_dhms(seconds: Real) -> Dhms {
        let positive = seconds >= 0.0;
        let seconds = seconds.abs();
        let mut milliseconds = ((seconds % 1.0) * 1000.0).round() as u64;
        let mut whole = seconds.floor() as u64;
        if milliseconds == 1000 {
            milliseconds = 0;
            whole += 1;
        }
        let (minutes, seconds) = (whole / 60, whole % 60);
        let (hours, minutes) = (minutes / 60, minutes % 60);
        let (days, hours) = (hours / 24, hours % 24);
        Dhms {
            positive,
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
        }
    }

    pub fn seconds(&self) -> Real {
        self.0
    }
}

impl Display for PrettyDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.0.is_nan() {
            return write!(f, "nan");
        }
        if self.0.is_infinite() {
            return write!(f, "inf");
        }
        let Dhms {
            positive,
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
        } = Self::to_dhms(self.0);

        let fraction = if milliseconds == 0 {
            String::new()
        } else if minutes == 0 {
            // Shown as a decimal fraction of a second, e.g. ".25".
            (milliseconds as Real / 1000.0)
                .to_string()
                .trim_start_matches('0')
                .to_owned()
        } else {
            format!(":{milliseconds:03}")
        };
        let day_str = if days > 0 {
            format!("{days} days ")
        } else {
            String::new()
        };
        let sign = if positive { "" } else { "-" };

        if hours > 0 {
            write!(
                f,
                "{sign}{day_str}{hours}:{minutes:02}:{seconds:02}{fraction} hours"
            )
        } else if minutes > 0 {
            write!(f, "{sign}{day_str}{minutes}:{seconds:02}{fraction} minutes")
        } else if seconds > 0 {
            write!(f, "{sign}{day_str}{seconds}{fraction} seconds")
        } else {
            write!(f, "{sign}{day_str}{milliseconds} milliseconds")
        }
    }
}

impl From<PrettyDuration> for Real {
    fn from(value: PrettyDuration) -> Self {
        value.0
    }
}

impl From<Real> for PrettyDuration {
    fn from(value: Real) -> Self {
        PrettyDuration(value)
    }
}

impl Add<Real> for PrettyDuration {
    type Output = PrettyDuration;

    fn add(self, rhs: Real) -> Self::Output {
        PrettyDuration(self.0 + rhs)
    }
}

impl Add for PrettyDuration {
    type Output = PrettyDuration;

    fn add(self, rhs: PrettyDuration) -> Self::Output {
        PrettyDuration(self.0 + rhs.0)
    }
}

impl Sub<Real> for PrettyDuration {
    type Output = PrettyDuration;

    fn sub(self, rhs: Real) -> Self::Output {
        PrettyDuration(self.0 - rhs)
    }
}

impl Sub for PrettyDuration {
    type Output = PrettyDuration;

    fn sub(self, rhs: PrettyDuration) -> Self::Output {
        PrettyDuration(self.0 - rhs.0)
    }
}

impl Mul<Real> for PrettyDuration {
    type Output = PrettyDuration;

    fn mul(self, rhs: Real) -> Self::Output {
        PrettyDuration(self.0 * rhs)
    }
}

impl Div<Real> for PrettyDuration {
    type Output = PrettyDuration;

    fn div(self, rhs: Real) -> Self::Output {
        PrettyDuration(self.0 / rhs)
    }
}
