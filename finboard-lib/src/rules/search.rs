//! Free-text search over rule cards.

use std::borrow::Cow;

use crate::model::Condition;
use crate::model::RuleCard;

/// Filters rules by a case-insensitive substring.
///
/// A rule matches when the term appears in its value, in any condition's
/// column name or alias, or in any condition value (each array element is
/// checked on its own). Order is preserved. An empty or blank term returns
/// the input as-is without copying.
///
/// # Example
///
/// ```
/// use finboard_lib::model::{Condition, ConditionColumn, RuleCard};
/// use finboard_lib::rules::search;
///
/// let rules = vec![
///     RuleCard::new("Vendors").condition(Condition::new(ConditionColumn::new("vendor"), "acme_entity")),
///     RuleCard::new("Payroll"),
/// ];
///
/// assert_eq!(search(&rules, "ACME").len(), 1);
/// assert_eq!(search(&rules, "").len(), 2);
/// ```
pub fn search<'a>(rules: &'a [RuleCard], term: &str) -> Cow<'a, [RuleCard]> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Cow::Borrowed(rules);
    }

    Cow::Owned(
        rules
            .iter()
            .filter(|rule| matches_lowercase(rule, &needle))
            .cloned()
            .collect(),
    )
}

/// Returns `true` if a single rule matches the term.
pub fn matches(rule: &RuleCard, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    needle.is_empty() || matches_lowercase(rule, &needle)
}

fn matches_lowercase(rule: &RuleCard, needle: &str) -> bool {
    contains(&rule.value, needle)
        || rule
            .conditions()
            .iter()
            .any(|condition| condition_matches(condition, needle))
}

fn condition_matches(condition: &Condition, needle: &str) -> bool {
    contains(&condition.column.column, needle)
        || condition
            .column
            .alias
            .as_deref()
            .is_some_and(|alias| contains(alias, needle))
        || condition
            .value
            .texts()
            .iter()
            .any(|value| contains(value, needle))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConditionColumn;

    fn rules() -> Vec<RuleCard> {
        vec![
            RuleCard::new("Travel").condition(Condition::new(
                ConditionColumn::new("vendor").alias("Vendor Name"),
                "acme_entity",
            )),
            RuleCard::new("Payroll").condition(Condition::new(
                ConditionColumn::new("memo"),
                vec!["salary", "Bonus Q4"],
            )),
            RuleCard::new("Software"),
        ]
    }

    #[test]
    fn test_empty_term_is_identity() {
        let rules = rules();
        let result = search(&rules, "");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ptr(), rules.as_ptr());

        assert!(matches!(search(&rules, "   "), Cow::Borrowed(_)));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let rules = rules();
        let result = search(&rules, "  acme ");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value, "Travel");
        assert!(matches(&rules[0], " ACME "));
        assert!(!matches(&rules[2], " acme"));
    }

    #[test]
    fn test_condition_value_case_insensitive() {
        let rules = rules();
        let result = search(&rules, "ACME");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value, "Travel");
    }

    #[test]
    fn test_matches_rule_value() {
        let rules = rules();
        assert_eq!(search(&rules, "soft")[0].value, "Software");
    }

    #[test]
    fn test_matches_alias_and_column() {
        let rules = rules();
        assert_eq!(search(&rules, "vendor name")[0].value, "Travel");
        assert_eq!(search(&rules, "MEMO")[0].value, "Payroll");
    }

    #[test]
    fn test_matches_array_element() {
        let rules = rules();
        assert_eq!(search(&rules, "bonus")[0].value, "Payroll");
    }

    #[test]
    fn test_preserves_order() {
        let rules = rules();
        let result = search(&rules, "a");
        let values: Vec<_> = result.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["Travel", "Payroll", "Software"]);
    }

    #[test]
    fn test_no_match() {
        let rules = rules();
        assert!(search(&rules, "zzz").is_empty());
        assert!(!matches(&rules[2], "zzz"));
    }
}
