//! Reference rendering of a view.
//!
//! Rendering happens in two steps. [`describe`] is a pure function from a
//! [`ViewResult`] to a [`PageView`]: the display text of every cell, the
//! "showing" summary and which pager buttons are live. A [`Renderer`] then
//! turns that description into output. [`TemplateRenderer`] does so with
//! MiniJinja, either as HTML (auto-escaped) or as plain text.
//!
//! Record text is untrusted. The HTML template relies on MiniJinja's
//! auto-escaping for `.html` templates, so every cell is escaped on output.

use minijinja::{context, Environment};
use serde::Serialize;
use tracing::warn;
use viewdeck_seeker::Record;

use crate::config::ColumnSpec;
use crate::error::Result;
use crate::state::ViewState;
use crate::view::ViewResult;

/// Receives every recomputed view.
///
/// Renderers may hold their own output but must not reach back into the
/// engine; the state is passed read-only so controls can show their
/// current values.
pub trait Renderer<R> {
    /// Draws one view.
    fn render(&mut self, view: &ViewResult<&R>, state: &ViewState);
}

/// A renderer backed by a closure. Build one with [`from_fn`].
pub struct FnRenderer<F>(F);

/// Wraps a closure as a [`Renderer`].
///
/// ```
/// use viewdeck::{from_fn, ViewConfig, ViewController};
/// use viewdeck_seeker::JsonRecord;
///
/// let mut totals = Vec::new();
/// let records = vec![JsonRecord::new().with("id", 1)];
/// let controller = ViewController::new(
///     ViewConfig::new("id"),
///     records,
///     from_fn(|view: &viewdeck::ViewResult<&JsonRecord>| totals.push(view.total_count)),
/// )
/// .unwrap();
/// drop(controller);
/// assert_eq!(totals, vec![1]);
/// ```
pub fn from_fn<R, F>(f: F) -> FnRenderer<F>
where
    F: FnMut(&ViewResult<&R>),
{
    FnRenderer(f)
}

impl<R, F> Renderer<R> for FnRenderer<F>
where
    F: FnMut(&ViewResult<&R>),
{
    fn render(&mut self, view: &ViewResult<&R>, _state: &ViewState) {
        (self.0)(view)
    }
}

/// Pager buttons and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pager {
    /// 1-based current page.
    pub current: usize,
    /// Number of pages.
    pub count: usize,
    /// "First" and "Prev" are live.
    pub has_prev: bool,
    /// "Next" and "Last" are live.
    pub has_next: bool,
}

/// Declarative description of one rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    /// Column headers.
    pub columns: Vec<String>,
    /// Display text of each cell, row by row.
    pub rows: Vec<Vec<String>>,
    /// "Showing a-b of n" or the empty-state message.
    pub summary: String,
    /// Active filters, if any.
    pub filter_summary: Option<String>,
    /// Current sort, e.g. `due desc`.
    pub sort: String,
    /// Pager state.
    pub pager: Pager,
    /// No record survived filtering.
    pub empty: bool,
}

/// Message shown when nothing matches.
pub const EMPTY_MESSAGE: &str = "No items found";

/// Describes a view for display.
pub fn describe<R: Record>(
    view: &ViewResult<&R>,
    state: &ViewState,
    columns: &[ColumnSpec],
) -> PageView {
    let rows = view
        .items
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| {
                    record
                        .field(&column.field)
                        .text()
                        .map(|text| text.into_owned())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let summary = if view.total_count == 0 {
        EMPTY_MESSAGE.to_string()
    } else {
        format!(
            "Showing {}-{} of {}",
            view.window_start + 1,
            view.window_end,
            view.total_count
        )
    };

    let window = view.window();
    PageView {
        columns: columns.iter().map(|c| c.label().to_string()).collect(),
        rows,
        summary,
        filter_summary: state.filter().summary(),
        sort: format!("{} {}", state.sort().key, state.sort().direction),
        pager: Pager {
            current: window.current_page,
            count: window.page_count,
            has_prev: window.has_prev(),
            has_next: window.has_next(),
        },
        empty: view.total_count == 0,
    }
}

const HTML_TEMPLATE: &str = include_str!("templates/page.html");
const TEXT_TEMPLATE: &str = include_str!("templates/page.txt");

/// Output format of the [`TemplateRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Escaped HTML table with pager.
    #[default]
    Html,
    /// Plain text table for terminals.
    Text,
}

impl Format {
    fn template_name(self) -> &'static str {
        match self {
            Format::Html => "page.html",
            Format::Text => "page.txt",
        }
    }
}

/// Renders views through MiniJinja and keeps the latest output.
pub struct TemplateRenderer {
    env: Environment<'static>,
    format: Format,
    columns: Vec<ColumnSpec>,
    output: String,
}

impl TemplateRenderer {
    /// Creates a renderer for the given columns.
    pub fn new(format: Format, columns: Vec<ColumnSpec>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("page.html", HTML_TEMPLATE)?;
        env.add_template("page.txt", TEXT_TEMPLATE)?;
        Ok(TemplateRenderer {
            env,
            format,
            columns,
            output: String::new(),
        })
    }

    /// Output of the most recent successful render.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Renders a page description without storing it.
    pub fn render_page(&self, page: &PageView) -> Result<String> {
        let template = self.env.get_template(self.format.template_name())?;
        Ok(template.render(context! { page => page })?)
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("format", &self.format)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<R: Record> Renderer<R> for TemplateRenderer {
    fn render(&mut self, view: &ViewResult<&R>, state: &ViewState) {
        let page = describe(view, state, &self.columns);
        match self.render_page(&page) {
            Ok(output) => self.output = output,
            // Keep showing the previous output.
            Err(err) => warn!(%err, "template render failed"),
        }
    }
}

/// Renderer that keeps an owned copy of every view it receives.
#[derive(Debug, Clone)]
pub struct Recorder<R> {
    views: Vec<ViewResult<R>>,
}

impl<R> Recorder<R> {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Recorder { views: Vec::new() }
    }

    /// Every view received, oldest first.
    pub fn views(&self) -> &[ViewResult<R>] {
        &self.views
    }

    /// The most recent view.
    pub fn last(&self) -> Option<&ViewResult<R>> {
        self.views.last()
    }

    /// Number of renders so far.
    pub fn count(&self) -> usize {
        self.views.len()
    }
}

impl<R> Default for Recorder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> Renderer<R> for Recorder<R> {
    fn render(&mut self, view: &ViewResult<&R>, _state: &ViewState) {
        self.views.push(view.cloned());
    }
}
