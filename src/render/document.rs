//! Document builder (§4.G): turns a `PlanSummary` into the intermediate,
//! format-agnostic `Document` the emitters consume. Builds collapsible
//! cells, applies the risk-based sort, and applies no-op/empty filtering.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::plan::model::{ChangeStatistics, ChangeType, OutputChange, PathSegment, PlanSummary, PropertyAction, PropertyChange, ResourceChange};
use crate::render::collapsible::CollapsibleValue;
use crate::render::view::ViewOptions;

/// The sensitivity warning glyph attached as a `format_hints` entry on a
/// `property_changes` cell whenever any of its properties are sensitive
/// (§4.G item 4: "prefix with a warning glyph in non-JSON formats").
pub const SENSITIVE_GLYPH: &str = "\u{26A0}";

/// One resource row, ready for emission (§4.G item 3).
#[derive(Debug, Clone)]
pub struct ResourceRow {
    pub address: String,
    pub resource_type: String,
    pub change_type: ChangeType,
    pub is_dangerous: bool,
    pub property_changes: CollapsibleValue,
    pub replacement_hints: CollapsibleValue,
}

/// A provider's rows plus its own statistics subtotal, excluding no-ops
/// (§4.G item 9, §9 design note).
#[derive(Debug, Clone)]
pub struct ProviderGroup {
    pub provider: String,
    pub rows: Vec<ResourceRow>,
    pub subtotal: ChangeStatistics,
}

/// One output row, ready for emission. Outputs carry no provider and no
/// property-level diff, only a whole before/after value (§3 `OutputChange`).
#[derive(Debug, Clone)]
pub struct OutputRow {
    pub name: String,
    pub change_type: ChangeType,
    pub is_sensitive: bool,
    pub before: String,
    pub after: String,
}

/// The format-agnostic document the emitters render (§4.G).
#[derive(Debug, Clone)]
pub struct Document {
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub statistics: ChangeStatistics,
    pub groups: Vec<ProviderGroup>,
    pub outputs: Vec<OutputRow>,
    pub is_empty: bool,
}

/// Build a `Document` from `summary` honoring `opts` (§4.G items 1, 3, 5, 6, 9).
pub fn build(summary: &PlanSummary, opts: &ViewOptions) -> Document {
    let visible: Vec<&ResourceChange> = summary
        .resources
        .iter()
        .filter(|r| opts.show_no_ops || !r.is_no_op)
        .collect();

    let mut rows_by_provider: Vec<(String, Vec<&ResourceChange>)> = Vec::new();
    for r in &visible {
        if let Some(entry) = rows_by_provider.iter_mut().find(|(p, _)| p == &r.provider) {
            entry.1.push(r);
        } else {
            rows_by_provider.push((r.provider.clone(), vec![r]));
        }
    }

    let distinct_providers = rows_by_provider.len();
    let grouping_active = opts.group_by_provider
        && distinct_providers > 1
        && visible.len() >= opts.provider_grouping_threshold;

    let mut groups = Vec::new();
    if grouping_active {
        rows_by_provider.sort_by(|a, b| a.0.cmp(&b.0));
        for (provider, resources) in rows_by_provider {
            let rows = build_rows(&resources, opts);
            if rows.is_empty() || table_suppressed(&rows, opts) {
                continue;
            }
            let subtotal = subtotal_excluding_no_ops(&resources);
            groups.push(ProviderGroup {
                provider,
                rows,
                subtotal,
            });
        }
    } else {
        let rows = build_rows(&visible, opts);
        if !rows.is_empty() && !table_suppressed(&rows, opts) {
            let subtotal = subtotal_excluding_no_ops(&visible);
            groups.push(ProviderGroup {
                provider: String::new(),
                rows,
                subtotal,
            });
        }
    }

    let outputs: Vec<OutputRow> = summary
        .outputs
        .iter()
        .filter(|o| opts.show_no_ops || !o.is_no_op)
        .map(output_row)
        .collect();

    let is_empty = groups.iter().all(|g| g.rows.is_empty()) && outputs.is_empty();

    Document {
        engine_version: summary.engine_version.clone(),
        generated_at: summary.generated_at,
        statistics: summary.statistics,
        groups,
        outputs,
        is_empty,
    }
}

fn output_row(o: &OutputChange) -> OutputRow {
    OutputRow {
        name: o.name.clone(),
        change_type: o.change_type,
        is_sensitive: o.is_sensitive,
        before: render_value(o.before.as_ref()),
        after: render_value(o.after.as_ref()),
    }
}

fn subtotal_excluding_no_ops(resources: &[&ResourceChange]) -> ChangeStatistics {
    let mut stats = ChangeStatistics::default();
    for r in resources {
        if r.is_no_op {
            continue;
        }
        stats.total += 1;
        if r.is_dangerous {
            stats.dangerous += 1;
        }
        match r.change_type {
            ChangeType::Create => stats.added += 1,
            ChangeType::Update => stats.modified += 1,
            ChangeType::Delete => stats.removed += 1,
            ChangeType::Replace => stats.replacements += 1,
            ChangeType::NoOp => {}
        }
    }
    stats
}

fn build_rows(resources: &[&ResourceChange], opts: &ViewOptions) -> Vec<ResourceRow> {
    let mut rows: Vec<(usize, &ResourceChange)> = resources.iter().copied().enumerate().collect();
    rows.sort_by(|(ia, a), (ib, b)| risk_order(a, b).then_with(|| ia.cmp(ib)));

    rows.into_iter()
        .map(|(_, r)| ResourceRow {
            address: r.address.clone(),
            resource_type: r.resource_type.clone(),
            change_type: r.change_type,
            is_dangerous: r.is_dangerous,
            property_changes: property_changes_cell(r, opts),
            replacement_hints: replacement_hints_cell(r),
        })
        .collect()
}

/// `view_options.show_details` (§4.G): when false, a table whose rows are
/// entirely no-ops is suppressed outright, even if `show_no_ops` kept those
/// rows around — distinct from the always-on empty-table suppression of
/// item 6, which only fires when `rows` is literally empty.
fn table_suppressed(rows: &[ResourceRow], opts: &ViewOptions) -> bool {
    !opts.show_details && rows.iter().all(|r| r.change_type == ChangeType::NoOp)
}

/// The risk-based sort of §4.G item 5: dangerous first, then action order,
/// then address case-insensitively; stable (ties broken by input order by
/// the caller via an index key).
fn risk_order(a: &ResourceChange, b: &ResourceChange) -> Ordering {
    b.is_dangerous
        .cmp(&a.is_dangerous)
        .then_with(|| a.change_type.sort_rank().cmp(&b.change_type.sort_rank()))
        .then_with(|| a.address.to_lowercase().cmp(&b.address.to_lowercase()))
}

fn property_changes_cell(r: &ResourceChange, opts: &ViewOptions) -> CollapsibleValue {
    let n = r.property_changes.count;
    let any_sensitive = r.property_changes.changes.iter().any(|c| c.sensitive);
    let summary = format!("{} properties changed", n);

    let mut lines: Vec<String> = r
        .property_changes
        .changes
        .iter()
        .map(diff_line)
        .collect();
    if r.property_changes.truncated {
        lines.push(opts.truncate_indicator.clone());
    }
    let details = lines.join("\n");

    let mut cv = CollapsibleValue::new(summary, details, any_sensitive || opts.expand_all)
        .unwrap_or_else(|_| CollapsibleValue {
            summary: format!("{} properties changed", n),
            default_expanded: any_sensitive,
            ..CollapsibleValue::default()
        });

    cv = cv.with_hint("csv", "detail_column_prefix", "property_changes_detail");
    if any_sensitive {
        for format in ["table", "markdown", "html", "csv"] {
            cv = cv.with_hint(format, "sensitive_glyph", SENSITIVE_GLYPH);
        }
    }
    cv
}

fn diff_line(pc: &PropertyChange) -> String {
    match pc.action {
        PropertyAction::Add => format!("  + {} = {}", pc.name, render_value(pc.after.as_ref())),
        PropertyAction::Remove => format!("  - {} = {}", pc.name, render_value(pc.before.as_ref())),
        PropertyAction::Update => format!(
            "  ~ {} = {} -> {}",
            pc.name,
            render_value(pc.before.as_ref()),
            render_value(pc.after.as_ref())
        ),
    }
}

/// Render a property value for a diff line: quoted strings, small
/// maps/arrays inline, larger ones as a placeholder (§4.G item 4).
fn render_value(v: Option<&Value>) -> String {
    match v {
        None => "null".to_string(),
        Some(Value::String(s)) if s == crate::plan::differ::MASKED_TOKEN => s.clone(),
        Some(Value::String(s)) => format!("\"{}\"", s),
        Some(Value::Object(m)) if m.len() <= 3 => {
            let inner: Vec<String> = m
                .iter()
                .map(|(k, v)| format!("{}: {}", k, render_value(Some(v))))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Some(Value::Object(m)) => format!("<map[{}]>", m.len()),
        Some(Value::Array(a)) if a.len() <= 3 => {
            let inner: Vec<String> = a.iter().map(|v| render_value(Some(v))).collect();
            format!("[{}]", inner.join(", "))
        }
        Some(Value::Array(a)) => format!("<list[{}]>", a.len()),
        Some(other) => other.to_string(),
    }
}

fn replacement_hints_cell(r: &ResourceChange) -> CollapsibleValue {
    if r.replacement_hints.is_empty() {
        return CollapsibleValue::new("", "", false).expect("empty details never nest");
    }
    let summary = format!("{} hint(s)", r.replacement_hints.len());
    let details = r
        .replacement_hints
        .iter()
        .map(|p| format_path(p))
        .collect::<Vec<_>>()
        .join("\n");
    CollapsibleValue::new(summary, details, false)
        .expect("plain text never nests")
        .with_hint("csv", "detail_column_prefix", "replacement_hints_detail")
}

fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, seg) in path.iter().enumerate() {
        if seg.starts_with('[') {
            out.push_str(seg);
        } else {
            if i > 0 {
                out.push('.');
            }
            out.push_str(seg);
        }
    }
    out
}
