//! Attribute values and typed-on-read parsing.
//!
//! Attributes are stored as strings. Writers convert through [`AttrValue`],
//! readers parse on demand with the helpers in this module.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A value that can be stored as a Meta attribute.
///
/// Returning `None` means "absent": the attribute is dropped instead of being
/// stored as an empty or placeholder string.
///
/// ```
/// use mpi_meta::Meta;
///
/// let nick: Option<&str> = None;
/// let m = Meta::new("User")
///     .with_attr("age", 42)
///     .with_attr("admin", true)
///     .with_attr("nick", nick);
///
/// assert_eq!(m.attr("age"), Some("42"));
/// assert_eq!(m.attr("admin"), Some("true"));
/// assert!(!m.has_attr("nick"));
/// ```
pub trait AttrValue {
    /// Converts the value into its canonical string form, or `None` to drop it.
    fn into_attr(self) -> Option<String>;
}

impl AttrValue for String {
    fn into_attr(self) -> Option<String> {
        Some(self)
    }
}

impl AttrValue for &str {
    fn into_attr(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl AttrValue for &String {
    fn into_attr(self) -> Option<String> {
        Some(self.clone())
    }
}

impl AttrValue for bool {
    fn into_attr(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl AttrValue for f64 {
    fn into_attr(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl AttrValue for f32 {
    fn into_attr(self) -> Option<String> {
        Some(self.to_string())
    }
}

macro_rules! int_attr_value {
    ($($ty:ty),*) => {
        $(
            impl AttrValue for $ty {
                fn into_attr(self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

int_attr_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T: AttrValue> AttrValue for Option<T> {
    fn into_attr(self) -> Option<String> {
        self.and_then(AttrValue::into_attr)
    }
}

/// Parses a boolean from the fixed attribute vocabulary.
///
/// `1`, `true`, `yes`, `on` are true; `0`, `false`, `no`, `off` are false.
/// Matching is case-insensitive. Anything else is `None`.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses a number. Blank strings and `NaN` are rejected.
#[must_use]
pub fn parse_num(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Parses an integral number. `"12"` and `"1e3"` parse, `"1.5"` does not.
///
/// Plain integers are parsed exactly. Values outside the `i64` range are
/// rejected rather than saturated.
#[must_use]
pub fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    // 2^63 is exactly representable; i64::MAX as f64 rounds up to it.
    let limit = 2f64.powi(63);
    let n = parse_num(value)?;
    if n.is_finite() && n.fract() == 0.0 && (-limit..limit).contains(&n) {
        Some(n as i64)
    } else {
        None
    }
}

/// Parses a timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (or with a space
/// separator) and a bare `YYYY-MM-DD`. Naive forms are taken as UTC.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn bool_vocabulary() {
        for yes in ["1", "true", "TRUE", "Yes", "on"] {
            assert_eq!(parse_bool(yes), Some(true), "{yes}");
        }
        for no in ["0", "false", "No", "OFF"] {
            assert_eq!(parse_bool(no), Some(false), "{no}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn integers_must_be_integral() {
        assert_eq!(parse_int("12"), Some(12));
        assert_eq!(parse_int(" -7 "), Some(-7));
        assert_eq!(parse_int("1e3"), Some(1000));
        assert_eq!(parse_int("1.5"), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn integers_keep_full_precision() {
        assert_eq!(parse_int("9007199254740993"), Some(9_007_199_254_740_993));
        assert_eq!(parse_int("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int("9223372036854775808"), None);
        assert_eq!(parse_int("-9223372036854775809"), None);
        assert_eq!(parse_int("1e19"), None);
    }

    #[test]
    fn numbers_reject_nan() {
        assert_eq!(parse_num("2.5"), Some(2.5));
        assert_eq!(parse_num("NaN"), None);
    }

    #[test]
    fn dates_in_several_shapes() {
        let dt = parse_date("2024-03-01T10:20:30Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 1));
        assert_eq!(dt.hour(), 10);

        let offset = parse_date("2024-03-01T10:20:30+02:00").unwrap();
        assert_eq!(offset.hour(), 8);

        let naive = parse_date("2024-03-01T10:20:30.250").unwrap();
        assert_eq!(naive.minute(), 20);

        let day = parse_date("2024-03-01").unwrap();
        assert_eq!(day.hour(), 0);

        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn optional_values_drop_when_absent() {
        assert_eq!(None::<i32>.into_attr(), None);
        assert_eq!(Some("x").into_attr(), Some("x".to_string()));
        assert_eq!(2.0_f64.into_attr(), Some("2".to_string()));
    }
}
