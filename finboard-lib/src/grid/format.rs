//! Date and number formatting for cell renderers.

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Date display formats accepted in a column's `date_format`.
///
/// Display configs name formats with `dd`/`MMM`/`yyyy` style patterns; only
/// the patterns listed here are honored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `ddMMMyyyy`, e.g. `05Mar2024`.
    #[default]
    Compact,
    /// `dd MMM yyyy`, e.g. `05 Mar 2024`.
    Spaced,
    /// `dd-MM-yyyy`
    Dashed,
    /// `dd/MM/yyyy`
    Slashed,
    /// `MM/dd/yyyy`
    MonthFirst,
    /// `yyyy-MM-dd`
    Iso,
    /// `dd MMM yyyy HH:mm`
    SpacedWithTime,
}

impl DateFormat {
    pub const ALL: [DateFormat; 7] = [
        DateFormat::Compact,
        DateFormat::Spaced,
        DateFormat::Dashed,
        DateFormat::Slashed,
        DateFormat::MonthFirst,
        DateFormat::Iso,
        DateFormat::SpacedWithTime,
    ];

    /// The pattern as written in display configs.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Compact => "ddMMMyyyy",
            DateFormat::Spaced => "dd MMM yyyy",
            DateFormat::Dashed => "dd-MM-yyyy",
            DateFormat::Slashed => "dd/MM/yyyy",
            DateFormat::MonthFirst => "MM/dd/yyyy",
            DateFormat::Iso => "yyyy-MM-dd",
            DateFormat::SpacedWithTime => "dd MMM yyyy HH:mm",
        }
    }

    fn strftime(&self) -> &'static str {
        match self {
            DateFormat::Compact => "%d%b%Y",
            DateFormat::Spaced => "%d %b %Y",
            DateFormat::Dashed => "%d-%m-%Y",
            DateFormat::Slashed => "%d/%m/%Y",
            DateFormat::MonthFirst => "%m/%d/%Y",
            DateFormat::Iso => "%Y-%m-%d",
            DateFormat::SpacedWithTime => "%d %b %Y %H:%M",
        }
    }

    /// Looks up an allow-listed pattern.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        Self::ALL.into_iter().find(|f| f.pattern() == pattern)
    }

    /// Formats a timestamp.
    pub fn format(&self, value: &NaiveDateTime) -> String {
        value.format(self.strftime()).to_string()
    }
}

/// Parses the date representations the data API emits.
///
/// Offsets are dropped and the wall-clock time is kept.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Rounds half away from zero and renders with thousands separators.
///
/// ```
/// use finboard_lib::grid::format::round_off;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_off(Decimal::new(12345, 1), 2), "1,234.50");
/// ```
pub fn round_off(value: Decimal, precision: u32) -> String {
    let precision = precision.min(28);
    let mut rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(precision);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    group_thousands(&rounded.to_string())
}

fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(number.len() + int.len() / 3);
    out.push_str(sign);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_lookup() {
        assert_eq!(DateFormat::from_pattern("dd-MM-yyyy"), Some(DateFormat::Dashed));
        assert_eq!(DateFormat::from_pattern("YYYY/DD"), None);
        for format in DateFormat::ALL {
            assert_eq!(DateFormat::from_pattern(format.pattern()), Some(format));
        }
    }

    #[test]
    fn test_parse_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_date_time("2024-03-05T14:30:00Z"), Some(expected));
        assert_eq!(parse_date_time("2024-03-05T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_date_time("2024-03-05 14:30:00"), Some(expected));
        assert_eq!(parse_date_time("2024-03-05T14:30:00.000"), Some(expected));
        assert!(parse_date_time("2024-03-05").is_some());
        assert_eq!(parse_date_time("not-a-date"), None);
    }

    #[test]
    fn test_format_compact() {
        let dt = parse_date_time("2024-03-05").unwrap();
        assert_eq!(DateFormat::Compact.format(&dt), "05Mar2024");
        assert_eq!(DateFormat::MonthFirst.format(&dt), "03/05/2024");
    }

    #[test]
    fn test_round_off() {
        assert_eq!(round_off(Decimal::new(1234567891, 3), 2), "1,234,567.89");
        assert_eq!(round_off(Decimal::new(-1005, 3), 2), "-1.01");
        assert_eq!(round_off(Decimal::new(-1, 3), 2), "0.00");
        assert_eq!(round_off(Decimal::from(120), 0), "120");
        assert_eq!(round_off(Decimal::from(999), 2), "999.00");
    }
}
