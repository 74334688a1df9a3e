//! Cell editors

use serde::Serialize;

use crate::model::CustomColumnType;
use crate::model::tag;
use crate::model::tag::KnownTags;
use crate::model::tag::TagChip;

/// Editor attached to an editable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellEditor {
    Tag,
}

impl CellEditor {
    /// Editor for a custom column component.
    pub fn for_custom(custom: CustomColumnType) -> Self {
        match custom {
            CustomColumnType::Tag => CellEditor::Tag,
        }
    }
}

/// Where a tag editor is in its edit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagEditorState {
    #[default]
    Idle,
    Typing {
        input: String,
    },
}

/// Result of finishing a tag edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCommit {
    /// An existing tag path was chosen.
    Existing(String),
    /// A new tag path was authored. Carries the full path as one tag.
    Created(String),
}

impl TagCommit {
    pub fn path(&self) -> &str {
        match self {
            TagCommit::Existing(path) | TagCommit::Created(path) => path,
        }
    }
}

/// Autocomplete editor for hierarchical tags.
///
/// Created tags join the option list, so submitting the same path again
/// selects it instead of creating a duplicate.
///
/// # Example
///
/// ```
/// use finboard_lib::grid::{TagCommit, TagEditor};
///
/// let mut editor = TagEditor::new(["finance/travel"].into_iter().collect());
/// editor.input("ops/it");
/// assert!(editor.can_create());
/// assert_eq!(editor.submit(), Some(TagCommit::Created("ops/it".into())));
///
/// editor.input("ops/it");
/// assert_eq!(editor.submit(), Some(TagCommit::Existing("ops/it".into())));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TagEditor {
    options: KnownTags,
    state: TagEditorState,
}

impl TagEditor {
    pub fn new(options: KnownTags) -> Self {
        Self {
            options,
            state: TagEditorState::Idle,
        }
    }

    pub fn state(&self) -> &TagEditorState {
        &self.state
    }

    pub fn options(&self) -> &KnownTags {
        &self.options
    }

    /// Updates the typed text.
    pub fn input(&mut self, text: impl Into<String>) {
        self.state = TagEditorState::Typing { input: text.into() };
    }

    fn typed(&self) -> Option<&str> {
        match &self.state {
            TagEditorState::Typing { input } if !tag::normalize(input).is_empty() => Some(input),
            _ => None,
        }
    }

    /// Existing options containing the typed text, case-insensitively.
    pub fn suggestions(&self) -> Vec<&str> {
        let Some(input) = self.typed() else {
            return self.options.paths().collect();
        };
        let needle = tag::normalize(input).to_lowercase();
        self.options
            .paths()
            .filter(|path| path.to_lowercase().contains(&needle))
            .collect()
    }

    /// Chips for the typed path, colored as a new tag would be.
    pub fn preview(&self) -> Vec<TagChip> {
        let Some(input) = self.typed() else {
            return Vec::new();
        };
        tag::segments(input)
            .into_iter()
            .map(|segment| {
                if self.options.contains_segment(segment) {
                    TagChip::existing(segment)
                } else {
                    TagChip::new_tag(segment)
                }
            })
            .collect()
    }

    /// Returns `true` if the typed path has no exact match among the options.
    pub fn can_create(&self) -> bool {
        self.typed()
            .is_some_and(|input| !self.options.contains_path(input))
    }

    /// Picks an option from the suggestion list.
    ///
    /// Returns `None` if the option is not a known path.
    pub fn select(&mut self, option: &str) -> Option<TagCommit> {
        if !self.options.contains_path(option) {
            return None;
        }
        self.state = TagEditorState::Idle;
        Some(TagCommit::Existing(tag::normalize(option)))
    }

    /// Commits the typed path, selecting it if it exists and creating it
    /// otherwise. Returns `None` when nothing was typed.
    pub fn submit(&mut self) -> Option<TagCommit> {
        let path = tag::normalize(self.typed()?);
        let commit = if self.options.contains_path(&path) {
            TagCommit::Existing(path)
        } else {
            log::debug!("creating tag '{}'", path);
            self.options.insert(&path);
            TagCommit::Created(path)
        };
        self.state = TagEditorState::Idle;
        Some(commit)
    }

    /// Abandons the edit.
    pub fn cancel(&mut self) {
        self.state = TagEditorState::Idle;
    }
}
