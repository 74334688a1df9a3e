//! Filter state for a page of widgets.

use std::collections::HashMap;
use std::time::Duration;

use super::FilterDescriptor;
use super::FilterKind;
use super::FilterValue;
use super::translate;
use crate::error::FilterError;
use crate::query::QueryFragment;
use crate::query::QueryParams;

/// Widgets to refetch after a filter change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefetchPlan {
    /// Key of the filter that changed.
    pub filter_key: String,
    /// Widgets in the filter's scope, in declaration order.
    pub widgets: Vec<String>,
    /// Wait this long before fetching; `None` means immediately.
    pub debounce: Option<Duration>,
}

/// Holds the filters of a page and their current values.
///
/// Values are validated against their descriptor on entry, so the fragments
/// produced later never fail. Two filters that share a widget may not set
/// the same query parameter.
///
/// # Example
///
/// ```
/// use finboard_lib::filter::{FilterBoard, FilterDescriptor, FilterKind, FilterTarget, FilterValue};
///
/// let mut board = FilterBoard::new(vec![
///     FilterDescriptor::new("ccy", "Currency", FilterKind::SingleSelect)
///         .target(FilterTarget::new("payments", "ccy"))
///         .widget("w1"),
/// ])?;
///
/// let plan = board.set("ccy", FilterValue::Text("EUR".into()))?;
/// assert_eq!(plan.widgets, vec!["w1"]);
/// assert_eq!(board.params_for("w1").get("payments.ccy__exact"), Some("EUR"));
/// # Ok::<(), finboard_lib::error::FilterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterBoard {
    descriptors: Vec<FilterDescriptor>,
    values: HashMap<String, FilterValue>,
}

impl FilterBoard {
    /// Creates a board; filter keys must be unique.
    pub fn new(descriptors: Vec<FilterDescriptor>) -> Result<Self, FilterError> {
        for (i, descriptor) in descriptors.iter().enumerate() {
            if descriptors[..i].iter().any(|d| d.key == descriptor.key) {
                return Err(FilterError::DuplicateKey {
                    key: descriptor.key.clone(),
                });
            }
        }
        Ok(Self {
            descriptors,
            values: HashMap::new(),
        })
    }

    pub fn descriptors(&self) -> &[FilterDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, key: &str) -> Option<&FilterDescriptor> {
        self.descriptors.iter().find(|d| d.key == key)
    }

    /// Current value of a filter.
    pub fn value(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Sets a filter value and returns the widgets to refetch.
    ///
    /// An empty value clears the filter, subject to the same rules as
    /// [`clear`](Self::clear).
    pub fn set(&mut self, key: &str, value: FilterValue) -> Result<RefetchPlan, FilterError> {
        let descriptor = self.descriptor(key).ok_or_else(|| FilterError::unknown(key))?;
        if !value.fits(descriptor.kind) {
            return Err(FilterError::value_shape(
                key,
                descriptor.kind.expected_shape(),
                value.shape_name(),
            ));
        }
        if value.is_empty() {
            return self.clear(key);
        }

        self.check_conflicts(descriptor, &value)?;

        log::debug!("filter '{}' set to {:?}", key, value);
        let plan = plan_for(descriptor);
        self.values.insert(key.to_string(), value);
        Ok(plan)
    }

    /// Clears a filter and returns the widgets to refetch.
    ///
    /// Single selects with `allow_clear = false` always keep a selection.
    pub fn clear(&mut self, key: &str) -> Result<RefetchPlan, FilterError> {
        let descriptor = self.descriptor(key).ok_or_else(|| FilterError::unknown(key))?;
        if descriptor.kind == FilterKind::SingleSelect && !descriptor.allow_clear {
            return Err(FilterError::ClearForbidden {
                key: key.to_string(),
            });
        }

        let plan = plan_for(descriptor);
        self.values.remove(key);
        Ok(plan)
    }

    /// Query fragments of every active filter.
    pub fn fragments(&self) -> Vec<QueryFragment> {
        self.fragments_where(|_| true)
    }

    /// Merged query parameters of every active filter scoped to the widget.
    pub fn params_for(&self, widget_id: &str) -> QueryParams {
        self.fragments_where(|d| d.is_in_scope(widget_id))
            .into_iter()
            .collect()
    }

    /// Rejects a value whose parameters another active filter already sets
    /// for a widget both filters refetch.
    fn check_conflicts(
        &self,
        descriptor: &FilterDescriptor,
        value: &FilterValue,
    ) -> Result<(), FilterError> {
        let params: QueryParams = translate(descriptor, value)?.into_iter().collect();

        for other in &self.descriptors {
            if other.key == descriptor.key || !shares_widget(descriptor, other) {
                continue;
            }
            let Some(other_value) = self.values.get(&other.key) else {
                continue;
            };
            let taken: QueryParams = translate(other, other_value)?.into_iter().collect();
            if let Some(param) = params.keys().find(|k| taken.contains_key(k)) {
                log::warn!("filter '{}' conflicts with '{}' on {}", descriptor.key, other.key, param);
                return Err(FilterError::Conflict {
                    key: descriptor.key.clone(),
                    other: other.key.clone(),
                    param: param.to_string(),
                });
            }
        }
        Ok(())
    }

    fn fragments_where(&self, keep: impl Fn(&FilterDescriptor) -> bool) -> Vec<QueryFragment> {
        self.descriptors
            .iter()
            .filter(|d| keep(d))
            .filter_map(|d| self.values.get(&d.key).map(|v| (d, v)))
            .flat_map(|(d, v)| {
                // Values were shape-checked on entry.
                translate(d, v).unwrap_or_default()
            })
            .collect()
    }
}

fn shares_widget(a: &FilterDescriptor, b: &FilterDescriptor) -> bool {
    a.widgets_in_scope.iter().any(|w| b.is_in_scope(w))
}

fn plan_for(descriptor: &FilterDescriptor) -> RefetchPlan {
    RefetchPlan {
        filter_key: descriptor.key.clone(),
        widgets: descriptor.widgets_in_scope.clone(),
        debounce: descriptor.debounce_duration(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::filter::AmountRange;
    use crate::filter::FilterTarget;

    fn board() -> FilterBoard {
        FilterBoard::new(vec![
            FilterDescriptor::new("amount", "Amount", FilterKind::AmountRange)
                .target(FilterTarget::new("payments", "amount"))
                .target(FilterTarget::new("invoices", "total"))
                .widget("w-payments")
                .widget("w-invoices"),
            FilterDescriptor::new("ccy", "Currency", FilterKind::SingleSelect)
                .values(["EUR", "USD"])
                .allow_clear(false)
                .target(FilterTarget::new("payments", "ccy"))
                .widget("w-payments"),
            FilterDescriptor::new("q", "Search", FilterKind::Search)
                .debounce(250)
                .target(FilterTarget::new("invoices", "memo"))
                .widget("w-invoices"),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = FilterBoard::new(vec![
            FilterDescriptor::new("a", "A", FilterKind::Search),
            FilterDescriptor::new("a", "A again", FilterKind::Search),
        ])
        .unwrap_err();
        assert_eq!(err, FilterError::DuplicateKey { key: "a".into() });
    }

    #[test]
    fn test_set_returns_scope_and_no_debounce() {
        let mut board = board();
        let range = AmountRange::new(Some(Decimal::from(100)), None);
        let plan = board.set("amount", FilterValue::AmountRange(range)).unwrap();
        assert_eq!(plan.widgets, vec!["w-payments", "w-invoices"]);
        assert_eq!(plan.debounce, None);
    }

    #[test]
    fn test_debounce_is_reported() {
        let mut board = board();
        let plan = board.set("q", FilterValue::Text("taxi".into())).unwrap();
        assert_eq!(plan.debounce, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_params_only_include_scoped_filters() {
        let mut board = board();
        board
            .set("amount", FilterValue::AmountRange(AmountRange::new(Some(Decimal::from(100)), None)))
            .unwrap();
        board.set("ccy", FilterValue::Text("EUR".into())).unwrap();
        board.set("q", FilterValue::Text("taxi".into())).unwrap();

        let payments = board.params_for("w-payments");
        assert_eq!(payments.get("payments.amount__gte"), Some("100"));
        assert_eq!(payments.get("invoices.total__gte"), Some("100"));
        assert_eq!(payments.get("payments.ccy__exact"), Some("EUR"));
        assert_eq!(payments.get("invoices.memo__icontains"), None);

        let invoices = board.params_for("w-invoices");
        assert_eq!(invoices.get("invoices.memo__icontains"), Some("taxi"));
        assert_eq!(invoices.get("payments.ccy__exact"), None);
    }

    #[test]
    fn test_single_select_without_clear() {
        let mut board = board();
        board.set("ccy", FilterValue::Text("EUR".into())).unwrap();
        assert_eq!(
            board.clear("ccy").unwrap_err(),
            FilterError::ClearForbidden { key: "ccy".into() }
        );
        assert!(board.set("ccy", FilterValue::Text(String::new())).is_err());
        assert_eq!(board.value("ccy"), Some(&FilterValue::Text("EUR".into())));
    }

    #[test]
    fn test_empty_value_clears_filter() {
        let mut board = board();
        board.set("q", FilterValue::Text("taxi".into())).unwrap();
        board.set("q", FilterValue::Text(String::new())).unwrap();
        assert_eq!(board.value("q"), None);
        assert!(board.params_for("w-invoices").is_empty());
    }

    #[test]
    fn test_colliding_filters_rejected() {
        let mut board = FilterBoard::new(vec![
            FilterDescriptor::new("status", "Status", FilterKind::SingleSelect)
                .target(FilterTarget::new("d1", "tags"))
                .widget("w1"),
            FilterDescriptor::new("tag", "Tag", FilterKind::Tags)
                .target(FilterTarget::new("d1", "tags"))
                .widget("w1"),
        ])
        .unwrap();

        board.set("status", FilterValue::Text("paid".into())).unwrap();
        let err = board
            .set("tag", FilterValue::Tag("finance/travel".into()))
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::Conflict {
                key: "tag".into(),
                other: "status".into(),
                param: "d1.tags__exact".into(),
            }
        );
        assert_eq!(board.value("tag"), None);
        assert_eq!(board.params_for("w1").get_all("d1.tags__exact"), ["paid"]);

        // A top-level tag uses a different lookup and can coexist.
        board.set("tag", FilterValue::Tag("finance".into())).unwrap();
        let params = board.params_for("w1");
        assert_eq!(params.get("d1.tags__exact"), Some("paid"));
        assert_eq!(params.get("d1.tags__regex"), Some("^finance(/|$)"));
    }

    #[test]
    fn test_same_parameter_on_separate_widgets_allowed() {
        let mut board = FilterBoard::new(vec![
            FilterDescriptor::new("a", "A", FilterKind::SingleSelect)
                .target(FilterTarget::new("d1", "ccy"))
                .widget("w1"),
            FilterDescriptor::new("b", "B", FilterKind::SingleSelect)
                .target(FilterTarget::new("d1", "ccy"))
                .widget("w2"),
        ])
        .unwrap();

        board.set("a", FilterValue::Text("EUR".into())).unwrap();
        board.set("b", FilterValue::Text("USD".into())).unwrap();
        assert_eq!(board.params_for("w1").get("d1.ccy__exact"), Some("EUR"));
        assert_eq!(board.params_for("w2").get("d1.ccy__exact"), Some("USD"));
    }

    #[test]
    fn test_unknown_and_mismatched() {
        let mut board = board();
        assert_eq!(
            board.set("nope", FilterValue::Text("x".into())).unwrap_err(),
            FilterError::unknown("nope")
        );
        assert!(matches!(
            board.set("amount", FilterValue::Text("x".into())),
            Err(FilterError::ValueShape { .. })
        ));
    }
}
