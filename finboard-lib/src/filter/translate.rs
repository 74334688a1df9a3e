//! Filter value to query fragment translation.

use super::DateMode;
use super::FilterDescriptor;
use super::FilterKind;
use super::FilterValue;
use crate::error::FilterError;
use crate::model::tag;
use crate::query::Predicate;
use crate::query::QueryFragment;

/// Builds the predicate a filter value stands for.
///
/// Returns `Ok(None)` when the value is empty, which clears the filter.
/// A value whose shape does not match the descriptor's kind is rejected.
pub fn predicate_for(
    descriptor: &FilterDescriptor,
    value: &FilterValue,
) -> Result<Option<Predicate>, FilterError> {
    if !value.fits(descriptor.kind) {
        return Err(FilterError::value_shape(
            &descriptor.key,
            descriptor.kind.expected_shape(),
            value.shape_name(),
        ));
    }
    if value.is_empty() {
        return Ok(None);
    }

    let predicate = match (descriptor.kind, value) {
        (FilterKind::Search, FilterValue::Text(term)) => Predicate::Contains(term.trim().to_string()),
        (FilterKind::SingleSelect, FilterValue::Text(choice)) => Predicate::Equals(choice.clone()),
        (FilterKind::MultiSelect, FilterValue::List(choices)) => Predicate::In(non_blank(choices)),
        (FilterKind::ArraySearch, FilterValue::List(terms)) => Predicate::AnyContains(non_blank(terms)),
        (FilterKind::DateRange, FilterValue::DateRange(range)) => {
            let end = match descriptor.date_mode {
                DateMode::Single => range.start_date,
                DateMode::Range => range.end_date,
            };
            Predicate::DateRange {
                start: range.start_date,
                end,
            }
        }
        (FilterKind::AmountRange, FilterValue::AmountRange(range)) => Predicate::AmountRange {
            min: range.min,
            max: range.max,
        },
        (FilterKind::Tags, FilterValue::Tag(path)) => {
            let path = tag::normalize(path);
            // A top-level tag selects its whole subtree.
            if tag::depth(&path) == 1 {
                Predicate::TagSubtree(path)
            } else {
                Predicate::TagExact(path)
            }
        }
        _ => {
            return Err(FilterError::value_shape(
                &descriptor.key,
                descriptor.kind.expected_shape(),
                value.shape_name(),
            ));
        }
    };
    Ok(Some(predicate))
}

/// Translates a filter value into one query fragment per target.
///
/// # Example
///
/// ```
/// use finboard_lib::filter::{translate, FilterDescriptor, FilterKind, FilterTarget, FilterValue};
///
/// let filter = FilterDescriptor::new("entity", "Entity", FilterKind::MultiSelect)
///     .target(FilterTarget::new("d1", "c1"))
///     .target(FilterTarget::new("d2", "c2"));
///
/// let fragments = translate(&filter, &FilterValue::List(vec!["a".into(), "b".into()])).unwrap();
/// assert_eq!(fragments.len(), 2);
/// assert_eq!(fragments[1].dataset_id, "d2");
/// ```
pub fn translate(
    descriptor: &FilterDescriptor,
    value: &FilterValue,
) -> Result<Vec<QueryFragment>, FilterError> {
    let Some(predicate) = predicate_for(descriptor, value)? else {
        return Ok(Vec::new());
    };

    Ok(descriptor
        .targets
        .iter()
        .map(|target| QueryFragment::new(&target.dataset_id, &target.column, predicate.clone()))
        .collect())
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
