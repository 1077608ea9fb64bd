//! A time span that reads and writes as text such as `"1h30m0s"`.
//!
//! Configuration schemas can use [`Duration`] for timeout-style fields and
//! get human-readable values in every format without per-field glue:
//!
//! ```toml
//! [network]
//! ping_interval = "5s"
//! idle_timeout = "1h30m0s"
//! ```
//!
//! # Grammar
//!
//! One or more `<number><unit>` groups, e.g. `300ms`, `1.5h`, `2h45m`.
//! Numbers are decimal with an optional fraction.  Units are `ns`, `us`
//! (or `µs`), `ms`, `s`, `m` and `h`.  A bare `0` is zero.  Negative spans
//! are rejected since the wrapped [`std::time::Duration`] is unsigned.
//! Every span [`Duration`] can hold, up to `std::time::Duration::MAX`,
//! parses back from its displayed text.

use std::fmt::{self, Write as _};
use std::ops::Deref;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const NANOSECOND: u128 = 1;
const MICROSECOND: u128 = 1_000 * NANOSECOND;
const MILLISECOND: u128 = 1_000 * MICROSECOND;
const SECOND: u128 = 1_000 * MILLISECOND;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;

/// Largest span accepted by the parser, in nanoseconds: the range of
/// [`std::time::Duration`].
const MAX_NANOS: u128 = u64::MAX as u128 * SECOND + (SECOND - 1);

/// Fraction digits beyond this scale are below a nanosecond for every unit.
const MAX_FRACTION_SCALE: u128 = 10u128.pow(18);

/// Errors returned when parsing a [`Duration`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("duration {0:?} is out of range")]
    Overflow(String),

    #[error("negative duration {0:?} is not supported")]
    Negative(String),
}

/// Text-serialized wrapper around [`std::time::Duration`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(pub std::time::Duration);

impl Duration {
    pub const ZERO: Duration = Duration(std::time::Duration::ZERO);

    pub const fn from_secs(secs: u64) -> Self {
        Duration(std::time::Duration::from_secs(secs))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Duration(std::time::Duration::from_millis(millis))
    }

    pub const fn as_std(&self) -> std::time::Duration {
        self.0
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        Duration(d)
    }
}

impl From<Duration> for std::time::Duration {
    fn from(d: Duration) -> Self {
        d.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();

        if nanos < SECOND {
            return match nanos {
                0 => f.write_str("0s"),
                n if n < MICROSECOND => write!(f, "{n}ns"),
                n if n < MILLISECOND => {
                    let (whole, frac) = split_frac(n, 3);
                    write!(f, "{whole}{frac}µs")
                }
                n => {
                    let (whole, frac) = split_frac(n, 6);
                    write!(f, "{whole}{frac}ms")
                }
            };
        }

        let (secs, frac) = split_frac(nanos, 9);
        let mut out = String::new();
        let minutes = secs / 60;
        if minutes > 0 {
            let hours = minutes / 60;
            if hours > 0 {
                write!(out, "{hours}h")?;
            }
            write!(out, "{}m", minutes % 60)?;
        }
        write!(out, "{}{frac}s", secs % 60)?;
        f.write_str(&out)
    }
}

/// Splits `value` at `prec` decimal digits: returns the integer part and the
/// fractional part rendered as `.ddd` with trailing zeros removed (empty when
/// the fraction is zero).
fn split_frac(value: u128, prec: u32) -> (u128, String) {
    let scale = 10u128.pow(prec);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return (whole, String::new());
    }
    let digits = format!("{frac:0width$}", width = prec as usize);
    (whole, format!(".{}", digits.trim_end_matches('0')))
}

impl FromStr for Duration {
    type Err = DurationParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationParseError::Invalid(input.to_string());

        let (negative, mut rest) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            _ => (false, input),
        };

        if rest == "0" {
            return Ok(Duration::ZERO);
        }
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut total: u128 = 0;
        while !rest.is_empty() {
            if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
                return Err(invalid());
            }

            let (whole, after_whole) = leading_int(rest)
                .ok_or_else(|| DurationParseError::Overflow(input.to_string()))?;
            let has_whole = after_whole.len() != rest.len();
            rest = after_whole;

            let mut frac: u128 = 0;
            let mut scale: u128 = 1;
            let mut has_frac = false;
            if let Some(after_dot) = rest.strip_prefix('.') {
                let (f, s, after_frac) = leading_fraction(after_dot);
                has_frac = after_frac.len() != after_dot.len();
                frac = f;
                scale = s;
                rest = after_frac;
            }
            if !has_whole && !has_frac {
                return Err(invalid());
            }

            let unit_len = rest
                .find(|c: char| c == '.' || c.is_ascii_digit())
                .unwrap_or(rest.len());
            if unit_len == 0 {
                return Err(DurationParseError::MissingUnit(input.to_string()));
            }
            let (unit_text, after_unit) = rest.split_at(unit_len);
            let unit = unit_nanos(unit_text).ok_or_else(|| DurationParseError::UnknownUnit {
                unit: unit_text.to_string(),
                input: input.to_string(),
            })?;
            rest = after_unit;

            let overflow = || DurationParseError::Overflow(input.to_string());
            total = whole
                .checked_mul(unit)
                .and_then(|n| n.checked_add(frac * unit / scale))
                .and_then(|n| n.checked_add(total))
                .ok_or_else(overflow)?;
            if total > MAX_NANOS {
                return Err(DurationParseError::Overflow(input.to_string()));
            }
        }

        if negative && total != 0 {
            return Err(DurationParseError::Negative(input.to_string()));
        }
        let secs = u64::try_from(total / SECOND)
            .map_err(|_| DurationParseError::Overflow(input.to_string()))?;
        let subsec = (total % SECOND) as u32;
        Ok(Duration(std::time::Duration::new(secs, subsec)))
    }
}

/// Consumes leading ASCII digits.  `None` when the number overflows the
/// accepted range.
fn leading_int(s: &str) -> Option<(u128, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u128 = 0;
    for b in s[..end].bytes() {
        value = value * 10 + u128::from(b - b'0');
        if value > MAX_NANOS {
            return None;
        }
    }
    Some((value, &s[end..]))
}

/// Consumes the digits after a decimal point.  Returns the digits as an
/// integer together with its power-of-ten scale; digits past the precision
/// that fits are ignored.
fn leading_fraction(s: &str) -> (u128, u128, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u128 = 0;
    let mut scale: u128 = 1;
    for b in s[..end].bytes() {
        if scale >= MAX_FRACTION_SCALE {
            continue;
        }
        value = value * 10 + u128::from(b - b'0');
        scale *= 10;
    }
    (value, scale, &s[end..])
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(NANOSECOND),
        // U+00B5 micro sign and U+03BC Greek small letter mu
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Duration, DurationParseError> {
        text.parse()
    }

    fn nanos(n: u64) -> Duration {
        Duration(std::time::Duration::from_nanos(n))
    }

    // ── Display ───────────────────────────────────────────────────────────────

    #[test]
    fn test_display_ninety_minutes() {
        assert_eq!(Duration::from_secs(5400).to_string(), "1h30m0s");
    }

    #[test]
    fn test_display_keeps_zero_minutes_under_hours() {
        assert_eq!(Duration::from_secs(3600).to_string(), "1h0m0s");
        assert_eq!(Duration::from_secs(3605).to_string(), "1h0m5s");
    }

    #[test]
    fn test_display_minutes_and_seconds() {
        assert_eq!(Duration::from_secs(90).to_string(), "1m30s");
        assert_eq!(Duration::from_secs(60).to_string(), "1m0s");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Duration::ZERO.to_string(), "0s");
    }

    #[test]
    fn test_display_fractional_seconds() {
        assert_eq!(Duration::from_millis(1500).to_string(), "1.5s");
        assert_eq!(nanos(61_000_000_001).to_string(), "1m1.000000001s");
    }

    #[test]
    fn test_display_sub_second_units() {
        assert_eq!(nanos(250).to_string(), "250ns");
        assert_eq!(nanos(1_500).to_string(), "1.5µs");
        assert_eq!(Duration::from_millis(300).to_string(), "300ms");
        assert_eq!(nanos(1_234_567).to_string(), "1.234567ms");
    }

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_hours_minutes_seconds() {
        assert_eq!(parse("1h30m0s").unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn test_parse_fractional_units() {
        assert_eq!(parse("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse("5.s").unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_all_units() {
        assert_eq!(parse("7ns").unwrap(), nanos(7));
        assert_eq!(parse("7us").unwrap(), nanos(7_000));
        assert_eq!(parse("7µs").unwrap(), nanos(7_000));
        assert_eq!(parse("7μs").unwrap(), nanos(7_000));
        assert_eq!(parse("7ms").unwrap(), Duration::from_millis(7));
        assert_eq!(parse("7s").unwrap(), Duration::from_secs(7));
        assert_eq!(parse("7m").unwrap(), Duration::from_secs(420));
        assert_eq!(parse("7h").unwrap(), Duration::from_secs(25_200));
    }

    #[test]
    fn test_parse_zero_and_signs() {
        assert_eq!(parse("0").unwrap(), Duration::ZERO);
        assert_eq!(parse("-0").unwrap(), Duration::ZERO);
        assert_eq!(parse("+2s").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_parse_rejects_negative_spans() {
        assert!(matches!(parse("-1s"), Err(DurationParseError::Negative(_))));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse("not-a-duration"),
            Err(DurationParseError::Invalid(_))
        ));
        assert!(matches!(parse(""), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse("."), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse("-"), Err(DurationParseError::Invalid(_))));
    }

    #[test]
    fn test_parse_rejects_missing_unit() {
        assert!(matches!(parse("10"), Err(DurationParseError::MissingUnit(_))));
        assert!(matches!(parse("1h30"), Err(DurationParseError::MissingUnit(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_unit() {
        assert_eq!(
            parse("3d"),
            Err(DurationParseError::UnknownUnit {
                unit: "d".to_string(),
                input: "3d".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(matches!(
            parse("99999999999999999999h"),
            Err(DurationParseError::Overflow(_))
        ));
        assert!(matches!(
            parse("5124095576030431h0m16s"),
            Err(DurationParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_spans_beyond_u64_nanoseconds_parse() {
        assert_eq!(
            parse("6000000h").unwrap(),
            Duration::from_secs(6_000_000 * 3600)
        );
    }

    #[test]
    fn test_max_duration_round_trips_through_text() {
        let max = Duration(std::time::Duration::MAX);
        let text = max.to_string();

        assert_eq!(text, "5124095576030431h0m15.999999999s");
        assert_eq!(parse(&text).unwrap(), max);
    }

    #[test]
    fn test_max_duration_round_trips_through_serde() {
        let max = Duration(std::time::Duration::MAX);
        let json = serde_json::to_string(&max).unwrap();
        let back: Duration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, max);
    }

    #[test]
    fn test_display_output_parses_back() {
        for secs in [1, 59, 60, 61, 3599, 3600, 86_400 + 7] {
            let d = Duration::from_secs(secs);
            assert_eq!(parse(&d.to_string()).unwrap(), d, "secs = {secs}");
        }
    }

    // ── Serde ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Duration::from_secs(5400)).unwrap();
        assert_eq!(json, "\"1h30m0s\"");
    }

    #[test]
    fn test_deserializes_from_string() {
        let d: Duration = serde_json::from_str("\"1h30m0s\"").unwrap();
        assert_eq!(d.as_secs(), 5400);
    }

    #[test]
    fn test_deserialize_reports_parse_error() {
        let err = serde_json::from_str::<Duration>("\"not-a-duration\"").unwrap_err();
        assert!(err.to_string().contains("invalid duration"), "got: {err}");
    }

    #[test]
    fn test_converts_to_and_from_std() {
        let std_d = std::time::Duration::from_secs(3);
        let d: Duration = std_d.into();
        assert_eq!(std::time::Duration::from(d), std_d);
        assert_eq!(d.as_std(), std_d);
    }
}
