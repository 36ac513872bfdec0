//! Document Builder / Renderer Adapter (§4.G, §4.H): turns a `PlanSummary`
//! into a `Document` and emits it in one of five formats to a `Sink`.

pub mod collapsible;
pub mod csv;
pub mod document;
pub mod html;
pub mod json;
pub mod markdown;
pub mod sink;
pub mod table;
pub mod view;

use crate::error::RenderError;
use crate::plan::model::PlanSummary;

pub use collapsible::CollapsibleValue;
pub use document::Document;
pub use sink::{Sink, StringSink, WriterSink};
pub use view::{OutputFormat, ViewOptions, ALL_FORMATS};

/// The header fields every format emits, in the fixed order of §4.G item 1:
/// engine/version, timestamp, then the six counters.
pub(crate) fn header_fields(doc: &Document) -> Vec<(&'static str, String)> {
    vec![
        ("engine_version", doc.engine_version.clone()),
        ("generated_at", doc.generated_at.to_rfc3339()),
        ("total", doc.statistics.total.to_string()),
        ("added", doc.statistics.added.to_string()),
        ("removed", doc.statistics.removed.to_string()),
        ("modified", doc.statistics.modified.to_string()),
        ("replacements", doc.statistics.replacements.to_string()),
        ("dangerous", doc.statistics.dangerous.to_string()),
    ]
}

pub(crate) const NO_CHANGES_LINE: &str = "No changes detected";

/// Build a `Document` from `summary` and emit it through `sink` in
/// `opts.format` (§4.G contract: `render(summary, view_options, sink)`).
pub fn render(
    summary: &PlanSummary,
    opts: &ViewOptions,
    sink: &mut dyn Sink,
) -> Result<(), RenderError> {
    let doc = document::build(summary, opts);
    let rendered = match opts.format {
        OutputFormat::Table => table::render(&doc, opts),
        OutputFormat::Json => json::render(&doc, opts),
        OutputFormat::Html => html::render(&doc, opts),
        OutputFormat::Markdown => markdown::render(&doc, opts),
        OutputFormat::Csv => csv::render(&doc, opts),
    };
    sink.write(&rendered)
}

/// Parse a format identifier, surfacing `UnsupportedFormat` before any bytes
/// are sent to the sink (§7).
pub fn parse_format(raw: &str) -> Result<OutputFormat, RenderError> {
    OutputFormat::parse(raw).ok_or_else(|| RenderError::UnsupportedFormat(raw.to_string()))
}
