//! Hierarchical tags
//!
//! A tag is a `/`-delimited path such as `finance/travel/flights`. Each
//! segment is shown as its own chip. Segments that are already in use render
//! uncolored; freshly authored ones get a color derived from their text.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use super::Row;
use super::Value;

/// Path separator for tag hierarchies.
pub const TAG_SEPARATOR: char = '/';

/// Splits a tag path into its ordered, non-empty segments.
///
/// ```
/// use finboard_lib::model::tag;
///
/// assert_eq!(tag::segments("finance/travel/flights"), ["finance", "travel", "flights"]);
/// assert_eq!(tag::segments(" finance // travel "), ["finance", "travel"]);
/// ```
pub fn segments(path: &str) -> Vec<&str> {
    path.split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rejoins the segments of a path, dropping empty ones and stray whitespace.
pub fn normalize(path: &str) -> String {
    segments(path).join("/")
}

/// Number of segments in a path.
pub fn depth(path: &str) -> usize {
    segments(path).len()
}

/// Returns the chain of ancestor paths, ending with the path itself.
///
/// `"a/b/c"` yields `["a", "a/b", "a/b/c"]`.
pub fn ancestors(path: &str) -> Vec<String> {
    let parts = segments(path);
    (1..=parts.len()).map(|n| parts[..n].join("/")).collect()
}

/// Collects every tag path held by a cell value.
///
/// Tag cells hold either one path or a list of paths.
pub fn paths_in(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.as_str()],
        Value::List(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Chip color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Magenta,
    Red,
    Volcano,
    Orange,
    Gold,
    Lime,
    Green,
    Cyan,
    Blue,
    GeekBlue,
    Purple,
}

impl TagColor {
    const PALETTE: [TagColor; 11] = [
        TagColor::Magenta,
        TagColor::Red,
        TagColor::Volcano,
        TagColor::Orange,
        TagColor::Gold,
        TagColor::Lime,
        TagColor::Green,
        TagColor::Cyan,
        TagColor::Blue,
        TagColor::GeekBlue,
        TagColor::Purple,
    ];

    /// Picks a palette entry from the tag text.
    ///
    /// Stable across runs and platforms.
    pub fn for_text(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        let index = u16::from_be_bytes([digest[0], digest[1]]) as usize % Self::PALETTE.len();
        Self::PALETTE[index]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagColor::Magenta => "magenta",
            TagColor::Red => "red",
            TagColor::Volcano => "volcano",
            TagColor::Orange => "orange",
            TagColor::Gold => "gold",
            TagColor::Lime => "lime",
            TagColor::Green => "green",
            TagColor::Cyan => "cyan",
            TagColor::Blue => "blue",
            TagColor::GeekBlue => "geekblue",
            TagColor::Purple => "purple",
        }
    }
}

/// A single rendered tag segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChip {
    pub label: String,
    /// `None` for tags that already exist.
    pub color: Option<TagColor>,
}

impl TagChip {
    pub fn existing(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
        }
    }

    pub fn new_tag(label: impl Into<String>) -> Self {
        let label = label.into();
        let color = Some(TagColor::for_text(&label));
        Self { label, color }
    }

    pub fn is_existing(&self) -> bool {
        self.color.is_none()
    }
}

/// Tag paths known to the system, e.g. the options list from the tags API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownTags {
    paths: BTreeSet<String>,
    segments: HashSet<String>,
}

impl KnownTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a path and each of its segments.
    pub fn insert(&mut self, path: &str) {
        let normalized = normalize(path);
        if normalized.is_empty() {
            return;
        }
        for segment in segments(&normalized) {
            self.segments.insert(segment.to_string());
        }
        self.paths.insert(normalized);
    }

    /// Returns `true` if the exact (normalized) path is known.
    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains(&normalize(path))
    }

    /// Returns `true` if any known path uses this segment.
    pub fn contains_segment(&self, segment: &str) -> bool {
        self.segments.contains(segment.trim())
    }

    /// Known full paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KnownTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut known = Self::new();
        for path in iter {
            known.insert(path.as_ref());
        }
        known
    }
}

/// Per-column count of rows using each tag segment.
///
/// A row contributes at most once per segment, so a segment whose count is
/// above one appears on some other row too.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    counts: HashMap<String, usize>,
}

impl TagIndex {
    /// Indexes the tag column of every row.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a Row>, column: &str) -> Self {
        let mut index = Self::default();
        for row in rows {
            if let Some(value) = row.get(column) {
                index.add_cell(value);
            }
        }
        index
    }

    /// Counts the segments of one cell.
    pub fn add_cell(&mut self, value: &Value) {
        let mut seen = HashSet::new();
        for path in paths_in(value) {
            for segment in segments(path) {
                if seen.insert(segment) {
                    *self.counts.entry(segment.to_string()).or_default() += 1;
                }
            }
        }
    }

    /// Number of indexed rows using the segment.
    pub fn rows_with(&self, segment: &str) -> usize {
        self.counts.get(segment).copied().unwrap_or(0)
    }

    /// Returns `true` if the segment is used by a row other than the one
    /// being rendered (which is assumed to be part of the index).
    pub fn used_elsewhere(&self, segment: &str) -> bool {
        self.rows_with(segment) > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_keep_order() {
        assert_eq!(segments("finance/travel/flights"), vec!["finance", "travel", "flights"]);
        assert!(segments("").is_empty());
        assert!(segments("///").is_empty());
    }

    #[test]
    fn test_ancestors() {
        assert_eq!(ancestors("a/b/c"), vec!["a", "a/b", "a/b/c"]);
        assert_eq!(ancestors("solo"), vec!["solo"]);
        assert!(ancestors("").is_empty());
    }

    #[test]
    fn test_depth_and_normalize() {
        assert_eq!(depth("a / b"), 2);
        assert_eq!(normalize(" a / b /"), "a/b");
    }

    #[test]
    fn test_color_is_deterministic() {
        assert_eq!(TagColor::for_text("travel"), TagColor::for_text("travel"));
        assert_eq!(TagChip::new_tag("travel").color, Some(TagColor::for_text("travel")));
        assert!(TagChip::existing("travel").is_existing());
    }

    #[test]
    fn test_known_tags() {
        let known: KnownTags = ["finance/travel", "ops"].into_iter().collect();
        assert!(known.contains_path("finance / travel"));
        assert!(!known.contains_path("finance"));
        assert!(known.contains_segment("finance"));
        assert_eq!(known.paths().collect::<Vec<_>>(), vec!["finance/travel", "ops"]);
    }

    #[test]
    fn test_tag_index_counts_rows_once() {
        let rows = vec![
            Row::new().set("tags", vec!["finance/travel", "finance/meals"]),
            Row::new().set("tags", "finance/payroll"),
            Row::new().set("tags", "ops"),
        ];
        let index = TagIndex::from_rows(&rows, "tags");
        assert_eq!(index.rows_with("finance"), 2);
        assert!(index.used_elsewhere("finance"));
        assert!(!index.used_elsewhere("travel"));
        assert_eq!(index.rows_with("missing"), 0);
    }
}
