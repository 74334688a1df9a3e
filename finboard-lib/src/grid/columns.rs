//! Column definitions built from display configs

use serde::Serialize;

use super::CellContent;
use super::CellEditor;
use super::GridConfig;
use super::RenderContext;
use super::RenderDegradation;
use super::render;
use crate::model::ColumnConfig;
use crate::model::ColumnDescriptor;
use crate::model::CustomColumnType;
use crate::model::Row;
use crate::model::Session;
use crate::model::ValueFormatType;

/// How the cells of a column are rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum CellRenderer {
    /// A registry formatter keyed by value format.
    Format {
        format: ValueFormatType,
        config: ColumnConfig,
    },
    /// Hierarchical tag chips.
    Tags,
    /// The live value verbatim, or a skeleton while it is missing.
    Value,
}

impl CellRenderer {
    /// Resolves the strategy for a descriptor.
    pub fn for_descriptor(descriptor: &ColumnDescriptor) -> Self {
        if let Some(CustomColumnType::Tag) = descriptor.custom_column_type {
            return CellRenderer::Tags;
        }
        match descriptor.value_format_type {
            ValueFormatType::Plain => CellRenderer::Value,
            format => CellRenderer::Format {
                format,
                config: descriptor.config.clone(),
            },
        }
    }
}

/// A grid column ready for the grid component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub header: String,
    /// Row key; empty when the descriptor had no column name.
    pub field: String,
    pub min_width: u32,
    pub renderer: CellRenderer,
    pub editor: Option<CellEditor>,
}

impl ColumnSpec {
    /// Creates a verbatim column.
    pub fn new(header: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            field: field.into(),
            min_width: GridConfig::default().min_column_width,
            renderer: CellRenderer::Value,
            editor: None,
        }
    }

    pub fn with_renderer(mut self, renderer: CellRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_editor(mut self, editor: CellEditor) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn is_editable(&self) -> bool {
        self.editor.is_some()
    }

    /// Renders this column's cell of a row, reporting degradations.
    pub fn try_render(&self, ctx: &RenderContext, row: &Row) -> Result<CellContent, RenderDegradation> {
        let raw = row.get(&self.field);
        match &self.renderer {
            CellRenderer::Value => match raw {
                Some(value) if !value.is_blank() => Ok(CellContent::Text(value.to_string())),
                _ => Ok(CellContent::Skeleton),
            },
            CellRenderer::Tags => {
                let raw = raw.ok_or(RenderDegradation::Empty)?;
                render::render_tags(ctx, &self.field, raw)
            }
            CellRenderer::Format { format, config } => {
                let raw = raw.ok_or(RenderDegradation::Empty)?;
                render::render_format(*format, config, ctx, row, raw)
            }
        }
    }

    /// Renders this column's cell of a row, falling back to the raw value.
    pub fn render(&self, ctx: &RenderContext, row: &Row) -> CellContent {
        self.try_render(ctx, row).unwrap_or_else(|degradation| {
            if degradation != RenderDegradation::Empty {
                log::trace!("column '{}' degraded: {}", self.field, degradation);
            }
            degradation.fallback()
        })
    }
}

/// Builds one column spec per descriptor, in order.
///
/// Editors are attached to tag columns only when the session may edit.
///
/// # Example
///
/// ```
/// use finboard_lib::grid::{build_columns, GridConfig};
/// use finboard_lib::model::{ColumnDescriptor, Role, Session};
///
/// let descriptors = vec![
///     ColumnDescriptor::new("Vendor", "vendor"),
///     ColumnDescriptor::new("", "memo"),
/// ];
/// let session = Session::new("ana@example.com", Role::Viewer);
///
/// let columns = build_columns(&descriptors, &session, &GridConfig::default());
/// assert_eq!(columns[0].header, "Vendor");
/// assert_eq!(columns[1].header, "memo");
/// assert_eq!(columns[1].min_width, 150);
/// ```
pub fn build_columns(
    descriptors: &[ColumnDescriptor],
    session: &Session,
    config: &GridConfig,
) -> Vec<ColumnSpec> {
    descriptors
        .iter()
        .enumerate()
        .map(|(position, descriptor)| build_column(position, descriptor, session, config))
        .collect()
}

fn build_column(
    position: usize,
    descriptor: &ColumnDescriptor,
    session: &Session,
    config: &GridConfig,
) -> ColumnSpec {
    if descriptor.column_name.trim().is_empty() {
        log::warn!(
            "column {} ('{}') has no column_name; cells will render empty",
            position,
            descriptor.display_name
        );
    }

    let header = if descriptor.display_name.trim().is_empty() {
        descriptor.column_name.clone()
    } else {
        descriptor.display_name.clone()
    };

    let editor = descriptor
        .custom_column_type
        .filter(|_| session.can_edit())
        .map(CellEditor::for_custom);

    ColumnSpec {
        header,
        field: descriptor.column_name.trim().to_string(),
        min_width: config.min_column_width,
        renderer: CellRenderer::for_descriptor(descriptor),
        editor,
    }
}
