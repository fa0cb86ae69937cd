use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Loose numeric coercion applied to every numeric ledger field.
///
/// Numbers pass through when finite. Strings are read up to the longest
/// numeric prefix (`"12.5usd"` is 12.5). Everything else, including NaN and
/// infinities, becomes 0.
pub fn safe_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    };
    match n {
        Some(x) if x.is_finite() => x,
        _ => 0.0,
    }
}

/// [`safe_number`] for an optional field; absent reads as 0.
pub fn safe_number_opt(value: Option<&Value>) -> f64 {
    value.map(safe_number).unwrap_or(0.0)
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Parse a ledger timestamp into a comparable UTC instant.
///
/// Accepts RFC 3339 strings, offset-less ISO-8601 (read as UTC), bare
/// `YYYY-MM-DD` dates, epoch milliseconds (number or numeric string) and
/// Firestore-style `{ "seconds", "nanoseconds" }` objects.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        Value::Object(map) => {
            let secs = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))?;
            let nanos = match map.get("nanoseconds").or_else(|| map.get("_nanoseconds")) {
                Some(v) => u32::try_from(v.as_u64()?).ok()?,
                None => 0,
            };
            DateTime::from_timestamp(secs, nanos)
        }
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    if let Ok(millis) = s.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_number_passes_finite_numbers() {
        assert!((safe_number(&json!(12.5)) - 12.5).abs() < 1e-12);
        assert!((safe_number(&json!(-3)) + 3.0).abs() < 1e-12);
    }

    #[test]
    fn safe_number_reads_numeric_prefix() {
        assert!((safe_number(&json!("42")) - 42.0).abs() < 1e-12);
        assert!((safe_number(&json!("  -7.25 ")) + 7.25).abs() < 1e-12);
        assert!((safe_number(&json!("12.5usd")) - 12.5).abs() < 1e-12);
        assert!((safe_number(&json!(".5")) - 0.5).abs() < 1e-12);
        assert!((safe_number(&json!("1e3x")) - 1000.0).abs() < 1e-12);
        assert!((safe_number(&json!("2e")) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn safe_number_garbage_is_zero() {
        assert_eq!(safe_number(&json!("abc")), 0.0);
        assert_eq!(safe_number(&json!("$12")), 0.0);
        assert_eq!(safe_number(&json!("")), 0.0);
        assert_eq!(safe_number(&json!("-")), 0.0);
        assert_eq!(safe_number(&json!(".")), 0.0);
        assert_eq!(safe_number(&json!(null)), 0.0);
        assert_eq!(safe_number(&json!(true)), 0.0);
        assert_eq!(safe_number(&json!([1, 2])), 0.0);
        assert_eq!(safe_number(&json!({"v": 1})), 0.0);
        assert_eq!(safe_number(&json!("1e999")), 0.0);
        assert_eq!(safe_number_opt(None), 0.0);
    }

    #[test]
    fn parse_timestamp_formats() {
        let expected = DateTime::parse_from_rfc3339("2024-03-10T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(parse_timestamp(&json!("2024-03-10T10:00:00Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2024-03-10T10:00:00.000Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2024-03-10T12:00:00+02:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2024-03-10T10:00:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2024-03-10 10:00:00")), Some(expected));
        assert_eq!(
            parse_timestamp(&json!(expected.timestamp_millis())),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!(expected.timestamp_millis().to_string())),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!({"seconds": expected.timestamp(), "nanoseconds": 0})),
            Some(expected)
        );
    }

    #[test]
    fn parse_timestamp_seconds_object_variants() {
        let expected = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(
            parse_timestamp(&json!({"seconds": 1.7e9, "nanoseconds": 0})),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!({"_seconds": 1_700_000_000.9})),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!({"seconds": 1_700_000_000, "nanoseconds": 500})),
            Some(expected + chrono::Duration::nanoseconds(500))
        );
    }

    #[test]
    fn parse_timestamp_rejects_oversized_nanoseconds() {
        let too_big = u64::from(u32::MAX) + 6;
        assert_eq!(
            parse_timestamp(&json!({"seconds": 1_700_000_000, "nanoseconds": too_big})),
            None
        );
        assert_eq!(
            parse_timestamp(&json!({"seconds": 1_700_000_000, "nanoseconds": -1})),
            None
        );
    }

    #[test]
    fn parse_timestamp_date_only_is_midnight_utc() {
        let ts = parse_timestamp(&json!("2024-03-10")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-10T00:00:00+00:00");
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(&json!("")), None);
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
        assert_eq!(parse_timestamp(&json!(false)), None);
    }
}
