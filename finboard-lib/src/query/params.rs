//! Flat query parameters for data requests.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use super::Predicate;

/// A predicate applied to one column of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFragment {
    pub dataset_id: String,
    pub column: String,
    pub predicate: Predicate,
}

impl QueryFragment {
    pub fn new(dataset_id: impl Into<String>, column: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            column: column.into(),
            predicate,
        }
    }

    /// Returns the parameter pairs for this fragment.
    ///
    /// Keys are `<dataset_id>.<column><lookup>`.
    pub fn params(&self) -> Vec<(String, String)> {
        self.predicate
            .lookups()
            .into_iter()
            .map(|(suffix, value)| (format!("{}.{}{}", self.dataset_id, self.column, suffix), value))
            .collect()
    }
}

/// An ordered map of query parameters.
///
/// A key may carry several values; each is sent as its own `key=value` pair,
/// so values containing commas survive intact.
///
/// # Example
///
/// ```
/// use finboard_lib::query::{Predicate, QueryFragment, QueryParams};
///
/// let mut params = QueryParams::new();
/// params.push_fragment(&QueryFragment::new("d1", "vendor", Predicate::Contains("acme co".into())));
/// assert_eq!(params.to_query_string(), "d1.vendor__icontains=acme%20co");
///
/// params.push_fragment(&QueryFragment::new("d1", "entity", Predicate::In(vec!["Acme, Inc.".into(), "Globex".into()])));
/// assert_eq!(params.get_all("d1.entity__in"), ["Acme, Inc.", "Globex"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, replacing every previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), vec![value.into()]);
    }

    /// Adds a value under a key, keeping the values already there.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// Sets a parameter (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds every parameter of a fragment.
    ///
    /// Values already present under the same key are kept.
    pub fn push_fragment(&mut self, fragment: &QueryFragment) {
        for (key, value) in fragment.params() {
            self.append(key, value);
        }
    }

    /// Merges another parameter set into this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: &QueryParams) {
        for (key, values) in &other.params {
            self.params.insert(key.clone(), values.clone());
        }
    }

    /// First value of a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value of a parameter, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.params.remove(key)
    }

    /// Iterates over `(key, value)` pairs; repeated keys appear once per value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Number of `(key, value)` pairs.
    pub fn len(&self) -> usize {
        self.params.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encodes the parameters as a URL query string (without `?`).
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Appends the parameters to a URL's query.
    pub fn append_to(&self, url: &mut Url) {
        if self.params.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (key, value) in self.iter() {
            pairs.append_pair(key, value);
        }
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl FromIterator<QueryFragment> for QueryParams {
    fn from_iter<I: IntoIterator<Item = QueryFragment>>(iter: I) -> Self {
        let mut params = Self::new();
        for fragment in iter {
            params.push_fragment(&fragment);
        }
        params
    }
}
