//! viewdeck - filter, sort and page a JSON document from the terminal.
//!
//! Reads a JSON document, picks the record array at `--path`, applies the
//! given controls and prints one page as text, HTML or JSON.
//!
//! ```text
//! viewdeck tasks.json --path tasks.items --filter status=Open --sort due --desc --page 2
//! ```
//!
//! Without `--config`, every field found in the records can be filtered and
//! sorted on, `id` (or the first field) is the default sort key, and the
//! first field holding only dates drives `--from`/`--to`.
//! `VIEWDECK_LOG` sets the log filter, e.g. `VIEWDECK_LOG=viewdeck=debug`.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use viewdeck::viewdeck_seeker::{DateRange, Dir, JsonRecord, PageNav, SortKind, Timestamp};
use viewdeck::{
    parse_records, ColumnSpec, Format, TemplateRenderer, ViewConfig, ViewController, ViewError,
    ViewState,
};

#[derive(Parser, Debug)]
#[command(name = "viewdeck")]
#[command(version)]
#[command(about = "Filter, sort and page the records of a JSON document")]
struct Cli {
    /// JSON document holding the records
    data: PathBuf,

    /// Page config (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dotted path to the record array, e.g. tasks.items
    #[arg(long, default_value = "")]
    path: String,

    /// Free-text search
    #[arg(short, long)]
    query: Option<String>,

    /// Field filter, repeatable
    #[arg(short, long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// First day of the date range
    #[arg(long, value_name = "YYYY-MM-DD", default_value = "")]
    from: String,

    /// Last day of the date range (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD", default_value = "")]
    to: String,

    /// Sort key
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Items per page
    #[arg(long)]
    page_size: Option<String>,

    /// Page number, or first, prev, next, last
    #[arg(short, long, default_value = "1")]
    page: String,

    /// Print the filter options for a field instead of a page
    #[arg(long, value_name = "FIELD")]
    options: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

fn parse_filter(text: &str) -> std::result::Result<(String, String), String> {
    match text.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{text}'")),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("VIEWDECK_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config used when none is given: every field is filterable and
/// sortable, string fields are searchable, and `id` (or the first field)
/// is the default sort. Fields whose values all parse as timestamps sort
/// by time, and the first of them is the date field.
fn inferred_config(records: &[JsonRecord]) -> ViewConfig {
    let mut fields = BTreeSet::new();
    let mut text_fields = BTreeSet::new();
    let mut non_numeric = BTreeSet::new();
    let mut non_temporal = BTreeSet::new();
    for record in records {
        for (name, value) in &record.0 {
            fields.insert(name.clone());
            if value.is_string() {
                text_fields.insert(name.clone());
            }
            if !value.is_number() {
                non_numeric.insert(name.clone());
            }
            if value.as_str().and_then(Timestamp::parse).is_none() {
                non_temporal.insert(name.clone());
            }
        }
    }
    let sort_key = if fields.contains("id") {
        "id".to_string()
    } else {
        fields.first().cloned().unwrap_or_else(|| "id".to_string())
    };

    let mut config = ViewConfig::new(sort_key)
        .searchable(text_fields)
        .filterable(fields.iter().cloned());
    if let Some(date_field) = fields.iter().find(|f| !non_temporal.contains(*f)) {
        config = config.date_field(date_field.as_str());
    }
    for field in &fields {
        let kind = if !non_temporal.contains(field) {
            SortKind::Temporal
        } else if non_numeric.contains(field) {
            SortKind::Text
        } else {
            SortKind::Numeric
        };
        config = config.sort_key(field.as_str(), kind);
    }
    config.columns = fields
        .into_iter()
        .map(|field| ColumnSpec { field, label: None })
        .collect();
    config
}

fn apply_controls(state: &mut ViewState, config: &ViewConfig, cli: &Cli) -> Result<()> {
    if let Some(query) = &cli.query {
        state.set_query_text(query.as_str());
    }
    for (field, value) in &cli.filters {
        if !config.filter.is_filterable(field) {
            bail!(ViewError::UnknownFilterField(field.clone()));
        }
        state.set_field_filter(field.as_str(), value.as_str());
    }
    let range = DateRange::parse(&cli.from, &cli.to)?;
    if !range.is_unbounded() && config.filter.date_field.is_none() {
        bail!(ViewError::NoDateField);
    }
    state.set_date_range(range);
    if let Some(key) = &cli.sort {
        if config.sort_kind(key).is_none() {
            bail!(ViewError::UnknownSortKey(key.clone()));
        }
        if *key != state.sort().key {
            state.set_sort_key(key.as_str());
        }
    }
    if cli.desc {
        state.set_sort_direction(Dir::Desc);
    }
    if let Some(size) = &cli.page_size {
        state.set_page_size_input(size)?;
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<String> {
    let body = fs::read_to_string(&cli.data)
        .with_context(|| format!("failed to read {}", cli.data.display()))?;
    let loaded = parse_records(&body, &cli.path);

    let mut config = match &cli.config {
        Some(path) => ViewConfig::from_path(path)?,
        None => inferred_config(loaded.as_deref().unwrap_or_default()),
    };
    if config.columns.is_empty() {
        config.columns = inferred_config(loaded.as_deref().unwrap_or_default()).columns;
    }
    let rules = config.clone();

    let format = match cli.format {
        OutputFormat::Html => Format::Html,
        OutputFormat::Text | OutputFormat::Json => Format::Text,
    };
    let renderer = TemplateRenderer::new(format, config.columns.clone())?;
    let mut controller = ViewController::from_load(config, loaded, renderer)?;

    if let Some(field) = &cli.options {
        return Ok(controller.filter_options(field).join("\n") + "\n");
    }

    controller.batch(|state| apply_controls(state, &rules, cli))?;
    let nav: PageNav = cli.page.parse().map_err(ViewError::from)?;
    controller.go_to_page(nav);
    debug!(state = ?controller.state(), "controls applied");

    match cli.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&controller.view())? + "\n"),
        _ => Ok(controller.renderer().output().to_string()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    print!("{}", run(&cli)?);
    Ok(())
}
