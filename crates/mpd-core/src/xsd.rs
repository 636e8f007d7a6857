//! # XML Duration Data Type codec
//!
//! Text form of [`Duration`] as used in MPD attributes:
//!
//! ```text
//! P [n D] [T [n H] [n M] [n[.f] S]]
//! ```
//!
//! Only the day and time fields are supported; years and months have no
//! fixed elapsed length. The formatter never emits days either and lets
//! hours accumulate, so `P3DT4H` reads back as `PT76H`. Digits are produced
//! with integer division into a fixed buffer, never through float formatting.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::duration::{Duration, HOUR, MINUTE, SECOND};
use crate::error::{DurationError, DurationField};

/// Room for the longest rendering, `-2562047H47M16.854775808S`.
const FORMAT_BUF_LEN: usize = 32;

/// Number of fractional second digits (nanosecond resolution).
const FRAC_DIGITS: usize = 9;

/// Days and the time group are both optional; inside the group, fields must
/// appear in H, M, S order.
static XML_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(?P<days>[0-9]+)D)?(?:T(?:(?P<hours>[0-9]+)H)?(?:(?P<minutes>[0-9]+)M)?(?:(?P<seconds>[0-9.]+)S)?)?$",
    )
    .expect("Invalid XML duration regex")
});

// ─── Formatting ──────────────────────────────────────────────────────────────

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; FORMAT_BUF_LEN];
        let w = format_fields(&mut buf, self.as_nanos());
        let fields = std::str::from_utf8(&buf[w..]).map_err(|_| fmt::Error)?;
        f.write_str("PT")?;
        f.write_str(fields)
    }
}

/// Write the time fields of `nanos` (everything after `PT`) into the tail of
/// `buf`. Returns the index where the output begins.
///
/// Zero-valued fields are left out once a larger field is present; below one
/// minute the seconds field is always written, so zero renders as `0S`.
fn format_fields(buf: &mut [u8; FORMAT_BUF_LEN], nanos: i64) -> usize {
    let neg = nanos < 0;
    let u = nanos.unsigned_abs();
    let per_sec = SECOND.as_nanos() as u64;

    let (secs, frac) = (u / per_sec, u % per_sec);
    let (mins, sec) = (secs / 60, secs % 60);
    // Stop at hours: days are never folded out.
    let (hours, min) = (mins / 60, mins % 60);

    let mut w = buf.len();
    if sec != 0 || frac != 0 || mins == 0 {
        w -= 1;
        buf[w] = b'S';
        w = fmt_frac(&mut buf[..w], frac, FRAC_DIGITS);
        w = fmt_int(&mut buf[..w], sec);
    }
    if min != 0 {
        w -= 1;
        buf[w] = b'M';
        w = fmt_int(&mut buf[..w], min);
    }
    if hours != 0 {
        w -= 1;
        buf[w] = b'H';
        w = fmt_int(&mut buf[..w], hours);
    }

    if neg {
        w -= 1;
        buf[w] = b'-';
    }
    w
}

/// Format `v` as a `prec`-digit fraction (e.g. ".12345") into the tail of
/// `buf`, dropping trailing zeros and the decimal point when `v` is zero.
/// Returns the start index.
fn fmt_frac(buf: &mut [u8], mut v: u64, prec: usize) -> usize {
    let mut w = buf.len();
    let mut print = false;
    for _ in 0..prec {
        let digit = (v % 10) as u8;
        print = print || digit != 0;
        if print {
            w -= 1;
            buf[w] = digit + b'0';
        }
        v /= 10;
    }
    if print {
        w -= 1;
        buf[w] = b'.';
    }
    w
}

/// Format `v` into the tail of `buf`. Returns the start index.
fn fmt_int(buf: &mut [u8], mut v: u64) -> usize {
    let mut w = buf.len();
    if v == 0 {
        w -= 1;
        buf[w] = b'0';
    } else {
        while v > 0 {
            w -= 1;
            buf[w] = (v % 10) as u8 + b'0';
            v /= 10;
        }
    }
    w
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse an XML duration (`P[nD][T[nH][nM][nS]]`) into a [`Duration`].
///
/// Negative durations, years and months are rejected. Seconds may carry a
/// fraction; digits past nanosecond precision are truncated.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    parse_fields(input)
        .inspect_err(|e| tracing::trace!(input, error = %e, "rejected duration"))
}

fn parse_fields(input: &str) -> Result<Duration, DurationError> {
    if input.len() < 3 {
        return Err(DurationError::TooShort);
    }
    if input.contains('-') {
        return Err(DurationError::Negative);
    }
    let caps = XML_DURATION
        .captures(input)
        .ok_or(DurationError::InvalidFormat)?;

    let mut total = Duration::ZERO;

    let whole_fields = [
        ("days", DurationField::Days, 24 * HOUR),
        ("hours", DurationField::Hours, HOUR),
        ("minutes", DurationField::Minutes, MINUTE),
    ];
    for (name, field, unit) in whole_fields {
        let Some(m) = caps.name(name) else { continue };
        let count = parse_count(m.as_str(), field)?;
        let nanos = count
            .checked_mul(unit.as_nanos())
            .ok_or(DurationError::Overflow { field })?;
        total = total
            .checked_add(Duration::from_nanos(nanos))
            .ok_or(DurationError::Overflow { field })?;
    }

    if let Some(m) = caps.name("seconds") {
        let nanos = parse_seconds(m.as_str())?;
        total = total
            .checked_add(Duration::from_nanos(nanos))
            .ok_or(DurationError::Overflow {
                field: DurationField::Seconds,
            })?;
    }

    Ok(total)
}

fn parse_count(text: &str, field: DurationField) -> Result<i64, DurationError> {
    text.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => DurationError::Overflow { field },
        _ => DurationError::Field {
            field,
            reason: e.to_string(),
        },
    })
}

/// Convert a decimal seconds value to whole nanoseconds, truncating digits
/// beyond the ninth fractional place. Done in integer arithmetic so that
/// every value the formatter emits reads back tick-for-tick.
fn parse_seconds(text: &str) -> Result<i64, DurationError> {
    let field = DurationField::Seconds;
    let invalid = |reason: &str| DurationError::Field {
        field,
        reason: reason.to_string(),
    };

    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("no digits"));
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("invalid decimal number"));
    }

    let secs = if whole.is_empty() {
        0
    } else {
        parse_count(whole, field)?
    };

    let mut sub = 0i64;
    let mut digits = 0;
    for b in frac.bytes().take(FRAC_DIGITS) {
        sub = sub * 10 + i64::from(b - b'0');
        digits += 1;
    }
    for _ in digits..FRAC_DIGITS {
        sub *= 10;
    }

    secs.checked_mul(SECOND.as_nanos())
        .and_then(|n| n.checked_add(sub))
        .ok_or(DurationError::Overflow { field })
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{MICROSECOND, MILLISECOND, NANOSECOND};

    fn fmt(d: Duration) -> String {
        d.to_string()
    }

    // ─── formatting ───────────────────────────────────────────────────────

    #[test]
    fn zero_is_pt0s() {
        assert_eq!(fmt(Duration::ZERO), "PT0S");
    }

    #[test]
    fn whole_fields() {
        assert_eq!(fmt(90 * SECOND), "PT1M30S");
        assert_eq!(fmt(3661 * SECOND), "PT1H1M1S");
        assert_eq!(fmt(HOUR + 30 * MINUTE), "PT1H30M");
        assert_eq!(fmt(HOUR), "PT1H");
        assert_eq!(fmt(MINUTE), "PT1M");
        assert_eq!(fmt(HOUR + 5 * SECOND), "PT1H5S");
    }

    #[test]
    fn fraction_is_stripped() {
        assert_eq!(fmt(1500 * MILLISECOND), "PT1.5S");
        assert_eq!(fmt(2 * SECOND), "PT2S");
        assert_eq!(fmt(SECOND + NANOSECOND), "PT1.000000001S");
        assert_eq!(fmt(MINUTE + 250 * MICROSECOND), "PT1M0.00025S");
    }

    #[test]
    fn sub_second_uses_seconds_only() {
        assert_eq!(fmt(500 * MILLISECOND), "PT0.5S");
        assert_eq!(fmt(NANOSECOND), "PT0.000000001S");
        assert_eq!(fmt(999_999_999 * NANOSECOND), "PT0.999999999S");
    }

    #[test]
    fn minutes_and_hours_suppressed_below_a_minute() {
        let s = fmt(45 * SECOND);
        assert_eq!(s, "PT45S");
        assert!(!s.contains('M'));
        assert!(!s.contains('H'));
    }

    #[test]
    fn days_fold_into_hours() {
        assert_eq!(fmt(3 * 24 * HOUR + 4 * HOUR), "PT76H");
    }

    #[test]
    fn extremes_fit_the_buffer() {
        assert_eq!(
            fmt(Duration::from_nanos(i64::MAX)),
            "PT2562047H47M16.854775807S"
        );
        assert_eq!(
            fmt(Duration::from_nanos(i64::MIN)),
            "PT-2562047H47M16.854775808S"
        );
    }

    #[test]
    fn negative_renders_sign_after_pt() {
        assert_eq!(fmt(-1500 * MILLISECOND), "PT-1.5S");
    }

    // ─── parsing ──────────────────────────────────────────────────────────

    #[test]
    fn parse_literal_cases() {
        assert_eq!(parse_duration("PT0S").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("PT1M30S").unwrap(), 90 * SECOND);
        assert_eq!(parse_duration("PT1H1M1S").unwrap(), 3661 * SECOND);
        assert_eq!(parse_duration("PT1H30M").unwrap(), HOUR + 30 * MINUTE);
        assert_eq!(parse_duration("PT12.5S").unwrap(), 12_500 * MILLISECOND);
        assert_eq!(parse_duration("P3DT4H").unwrap(), 76 * HOUR);
        assert_eq!(parse_duration("P1D").unwrap(), 24 * HOUR);
    }

    #[test]
    fn parse_accepts_unnormalized_fields() {
        assert_eq!(parse_duration("PT90M").unwrap(), 90 * MINUTE);
        assert_eq!(parse_duration("PT3600S").unwrap(), HOUR);
        assert_eq!(parse_duration("P1DT").unwrap(), 24 * HOUR);
    }

    #[test]
    fn parse_fraction_forms() {
        assert_eq!(parse_duration("PT.5S").unwrap(), 500 * MILLISECOND);
        assert_eq!(parse_duration("PT2.S").unwrap(), 2 * SECOND);
        assert_eq!(parse_duration("PT0.000000001S").unwrap(), NANOSECOND);
        // tenth digit is below tick resolution
        assert_eq!(
            parse_duration("PT0.1234567899S").unwrap(),
            123_456_789 * NANOSECOND
        );
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(parse_duration(""), Err(DurationError::TooShort));
        assert_eq!(parse_duration("1H"), Err(DurationError::TooShort));
        assert_eq!(parse_duration("PT"), Err(DurationError::TooShort));
    }

    #[test]
    fn rejects_negative() {
        assert_eq!(parse_duration("P-1D"), Err(DurationError::Negative));
        assert_eq!(parse_duration("-PT1S"), Err(DurationError::Negative));
        assert_eq!(parse_duration("PT-1.5S"), Err(DurationError::Negative));
    }

    #[test]
    fn rejects_grammar_mismatch() {
        for input in [
            "P1Y", "P1M", "PT1M1H", "PT1S1M", "1H30M", "PT1H30", "P1H", "pt1h", " PT1H", "PT1H ",
            "PT1,5S", "PT1H1H",
        ] {
            let err = parse_duration(input).unwrap_err();
            assert_eq!(err, DurationError::InvalidFormat, "{input}");
            assert!(err.is_format_error());
        }
    }

    #[test]
    fn rejects_non_ascii_digits() {
        assert_eq!(parse_duration("P١D"), Err(DurationError::InvalidFormat));
    }

    #[test]
    fn malformed_seconds_name_the_field() {
        for input in ["PT.S", "PT1.2.3S"] {
            let err = parse_duration(input).unwrap_err();
            assert!(
                matches!(
                    err,
                    DurationError::Field {
                        field: DurationField::Seconds,
                        ..
                    }
                ),
                "{input}: {err:?}"
            );
        }
    }

    #[test]
    fn overflow_is_reported_per_field() {
        let err = parse_duration("P999999999999999999999D").unwrap_err();
        assert_eq!(err.field(), Some(DurationField::Days));
        assert!(matches!(err, DurationError::Overflow { .. }));

        let err = parse_duration("PT2562048H").unwrap_err();
        assert_eq!(
            err,
            DurationError::Overflow {
                field: DurationField::Hours
            }
        );

        let err = parse_duration("PT2562047H47M17S").unwrap_err();
        assert_eq!(
            err,
            DurationError::Overflow {
                field: DurationField::Seconds
            }
        );
    }

    #[test]
    fn largest_value_round_trips() {
        let max = Duration::from_nanos(i64::MAX);
        assert_eq!(parse_duration(&fmt(max)).unwrap(), max);
    }

    #[test]
    fn from_str_matches_parse_duration() {
        let d: Duration = "PT1H30M".parse().unwrap();
        assert_eq!(d, HOUR + 30 * MINUTE);
        assert!("P1Y".parse::<Duration>().is_err());
    }
}
