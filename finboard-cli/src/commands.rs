use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use comfy_table::ContentArrangement;
use comfy_table::Table as TextTable;
use comfy_table::presets;
use finboard_lib::DashboardClient;
use finboard_lib::filter::FilterBoard;
use finboard_lib::filter::FilterDescriptor;
use finboard_lib::filter::FilterValue;
use finboard_lib::grid::GridConfig;
use finboard_lib::grid::RenderedRow;
use finboard_lib::grid::RowSource;
use finboard_lib::grid::Table;
use finboard_lib::grid::build_columns;
use finboard_lib::model::ColumnDescriptor;
use finboard_lib::model::DisplayConfig;
use finboard_lib::model::Role;
use finboard_lib::model::Row;
use finboard_lib::model::RuleCard;
use finboard_lib::model::Session;
use finboard_lib::model::tag::KnownTags;
use finboard_lib::query::QueryParams;
use finboard_lib::rules;
use serde::de::DeserializeOwned;

/// Connection settings for commands that can fetch from the API.
pub struct Remote {
    url: Option<String>,
    token: Option<String>,
}

impl Remote {
    pub fn new(url: Option<String>, token: Option<String>) -> Self {
        Self { url, token }
    }

    fn client(&self) -> Result<DashboardClient> {
        let Some(url) = &self.url else {
            bail!("no API URL given; pass --url or set FINBOARD_URL");
        };
        let mut builder = DashboardClient::builder().url(url);
        if let Some(token) = &self.token {
            builder = builder.token(token);
        }
        Ok(builder.build()?)
    }

    pub async fn descriptors(
        &self,
        config: Option<PathBuf>,
        dataset: Option<String>,
    ) -> Result<Vec<ColumnDescriptor>> {
        match (config, dataset) {
            (Some(path), _) => Ok(read_json::<DisplayConfig>(&path)?.display_config),
            (None, Some(dataset)) => self
                .client()?
                .display_config(&dataset)
                .await
                .with_context(|| format!("failed to fetch display config of '{}'", dataset)),
            (None, None) => bail!("pass --config or --dataset"),
        }
    }

    pub async fn rows(&self, path: Option<PathBuf>, widget: Option<String>) -> Result<Vec<Row>> {
        match (path, widget) {
            (Some(path), _) => read_json(&path),
            (None, Some(widget)) => self
                .client()?
                .widget_data(&widget, &QueryParams::new())
                .await
                .with_context(|| format!("failed to fetch rows of widget '{}'", widget)),
            (None, None) => bail!("pass --rows or --widget"),
        }
    }

    pub async fn rules(&self, path: Option<PathBuf>) -> Result<Vec<RuleCard>> {
        match path {
            Some(path) => read_json(&path),
            None => self
                .client()?
                .rules()
                .await
                .context("failed to fetch rules"),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn columns(descriptors: &[ColumnDescriptor], role: Role) -> Result<()> {
    let session = Session::new("", role);
    let columns = build_columns(descriptors, &session, &GridConfig::default());
    println!("{}", serde_json::to_string_pretty(&columns)?);
    Ok(())
}

pub fn render(
    descriptors: &[ColumnDescriptor],
    rows: &[Row],
    known_tags: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let known: KnownTags = match known_tags {
        Some(path) => read_json::<Vec<String>>(&path)?.into_iter().collect(),
        None => KnownTags::default(),
    };

    let session = Session::new("", Role::Viewer);
    let columns = build_columns(descriptors, &session, &GridConfig::default());
    let table = Table::new(columns, RowSource::Static(Vec::new())).with_known_tags(known);
    let rendered = table.render(rows);

    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        let headers: Vec<&str> = table.columns().iter().map(|c| c.header.as_str()).collect();
        print_table(&headers, &rendered);
    }
    Ok(())
}

fn print_table(headers: &[&str], rows: &[RenderedRow]) {
    println!("{}", format_table(headers, rows));
}

fn format_table(headers: &[&str], rows: &[RenderedRow]) -> TextTable {
    let mut table = TextTable::new();
    table
        .load_preset(presets::ASCII_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    for row in rows {
        table.add_row(row.cells.iter().map(|c| c.content.to_plain()));
    }
    table
}

pub fn search(rules: &[RuleCard], term: &str) -> Result<()> {
    let found = rules::search(rules, term);
    log::info!("{} of {} rules match '{}'", found.len(), rules.len(), term);
    println!("{}", serde_json::to_string_pretty(found.as_ref())?);
    Ok(())
}

pub fn translate(filters: &Path, values: &Path, widget: Option<&str>) -> Result<()> {
    let descriptors: Vec<FilterDescriptor> = read_json(filters)?;
    let values: BTreeMap<String, FilterValue> = read_json(values)?;

    let mut board = FilterBoard::new(descriptors)?;
    for (key, value) in values {
        board
            .set(&key, value)
            .with_context(|| format!("invalid value for filter '{}'", key))?;
    }

    let params: QueryParams = match widget {
        Some(widget) => board.params_for(widget),
        None => board.fragments().into_iter().collect(),
    };
    for (key, value) in params.iter() {
        println!("{}={}", key, value);
    }
    Ok(())
}
