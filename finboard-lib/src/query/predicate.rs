//! Column predicates produced by filter translation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A constraint on a single column.
///
/// Each variant maps onto lookup parameters understood by the data API
/// (`<column>__<lookup>=<value>`). Multi-valued predicates repeat the lookup
/// once per value.
///
/// # Example
///
/// ```
/// use finboard_lib::query::Predicate;
///
/// let p = Predicate::In(vec!["a".into(), "b".into()]);
/// assert_eq!(p.lookups(), vec![("__in", "a".to_string()), ("__in", "b".to_string())]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring: `__icontains`.
    Contains(String),
    /// Value in set: `__in`.
    In(Vec<String>),
    /// Equality: `__exact`.
    Equals(String),
    /// Inclusive date range: `__gte` and `__lte`.
    DateRange { start: NaiveDate, end: NaiveDate },
    /// Inclusive numeric range; open sides are omitted.
    AmountRange {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    /// Tag path or any of its descendants: `__regex` anchored on whole
    /// segments, so `finance` never matches `finances/q1`.
    TagSubtree(String),
    /// Exactly this tag path: `__exact`.
    TagExact(String),
    /// Any array element contains any of the terms: `__array_icontains`.
    AnyContains(Vec<String>),
}

impl Predicate {
    /// Returns the `(lookup suffix, value)` pairs for this predicate.
    pub fn lookups(&self) -> Vec<(&'static str, String)> {
        match self {
            Predicate::Contains(term) => vec![("__icontains", term.clone())],
            Predicate::In(values) => values.iter().map(|v| ("__in", v.clone())).collect(),
            Predicate::Equals(value) => vec![("__exact", value.clone())],
            Predicate::DateRange { start, end } => vec![
                ("__gte", start.format("%Y-%m-%d").to_string()),
                ("__lte", end.format("%Y-%m-%d").to_string()),
            ],
            Predicate::AmountRange { min, max } => {
                let mut lookups = Vec::with_capacity(2);
                if let Some(min) = min {
                    lookups.push(("__gte", min.normalize().to_string()));
                }
                if let Some(max) = max {
                    lookups.push(("__lte", max.normalize().to_string()));
                }
                lookups
            }
            Predicate::TagSubtree(path) => vec![("__regex", format!("^{}(/|$)", regex::escape(path)))],
            Predicate::TagExact(path) => vec![("__exact", path.clone())],
            Predicate::AnyContains(terms) => terms
                .iter()
                .map(|t| ("__array_icontains", t.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_lookups() {
        let p = Predicate::DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };
        assert_eq!(
            p.lookups(),
            vec![("__gte", "2024-01-01".to_string()), ("__lte", "2024-01-31".to_string())]
        );
    }

    #[test]
    fn test_open_amount_range() {
        let p = Predicate::AmountRange {
            min: Some(Decimal::new(1000, 2)),
            max: None,
        };
        assert_eq!(p.lookups(), vec![("__gte", "10".to_string())]);
    }

    #[test]
    fn test_any_contains_repeats_lookup() {
        let p = Predicate::AnyContains(vec!["fl".into(), "ho".into()]);
        assert_eq!(
            p.lookups(),
            vec![("__array_icontains", "fl".to_string()), ("__array_icontains", "ho".to_string())]
        );
    }

    #[test]
    fn test_in_keeps_commas_inside_values() {
        let p = Predicate::In(vec!["Acme, Inc.".into(), "Globex".into()]);
        assert_eq!(
            p.lookups(),
            vec![("__in", "Acme, Inc.".to_string()), ("__in", "Globex".to_string())]
        );
    }

    #[test]
    fn test_tag_subtree_is_segment_bounded() {
        let p = Predicate::TagSubtree("finance".into());
        let lookups = p.lookups();
        assert_eq!(lookups, vec![("__regex", "^finance(/|$)".to_string())]);

        let re = regex::Regex::new(&lookups[0].1).unwrap();
        assert!(re.is_match("finance"));
        assert!(re.is_match("finance/travel"));
        assert!(!re.is_match("finances/q1"));
        assert!(!re.is_match("finance_ops/x"));
    }

    #[test]
    fn test_tag_subtree_escapes_path() {
        let p = Predicate::TagSubtree("fy2024.q1".into());
        assert_eq!(p.lookups(), vec![("__regex", r"^fy2024\.q1(/|$)".to_string())]);
    }
}
