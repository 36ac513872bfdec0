//! Terminal table emitter (§4.G item 7, `table` format).

use crate::render::document::Document;
use crate::render::{header_fields, view::ViewOptions, NO_CHANGES_LINE};

const EXPAND_GLYPH: &str = "+";
const COLLAPSE_GLYPH: &str = "...";
const FORMAT: &str = "table";

pub fn render(doc: &Document, opts: &ViewOptions) -> String {
    let mut out = String::new();

    for (label, value) in header_fields(doc) {
        out.push_str(&format!("{}: {}\n", label, value));
    }
    out.push('\n');

    if doc.is_empty {
        out.push_str(NO_CHANGES_LINE);
        out.push('\n');
        return out;
    }

    for group in &doc.groups {
        if !group.provider.is_empty() {
            out.push_str(&format!("== {} ==\n", group.provider));
            out.push_str(&format!(
                "  total: {}  dangerous: {}\n",
                group.subtotal.total, group.subtotal.dangerous
            ));
        }

        for row in &group.rows {
            let danger = if row.is_dangerous { "DANGER" } else { "-" };
            out.push_str(&format!(
                "{}  {}  {:?}  {}\n",
                row.address, row.resource_type, row.change_type, danger
            ));

            let sensitive_prefix = row.property_changes.sensitive_prefix(FORMAT);
            let expanded = row.property_changes.is_expanded(opts.expand_all);
            if expanded {
                out.push_str(&format!(
                    "  {}{}\n",
                    sensitive_prefix, row.property_changes.summary
                ));
                let details = row
                    .property_changes
                    .truncated_details(opts.max_details_chars, &opts.truncate_indicator);
                for line in details.lines() {
                    out.push_str(&format!("  {}\n", line));
                }
            } else {
                out.push_str(&format!(
                    "  {}{} {}\n",
                    sensitive_prefix, row.property_changes.summary, COLLAPSE_GLYPH
                ));
            }

            if !row.replacement_hints.summary.is_empty() {
                if row.replacement_hints.is_expanded(opts.expand_all) {
                    out.push_str(&format!("  hints: {}\n", row.replacement_hints.details));
                } else {
                    out.push_str(&format!(
                        "  hints: {} {}\n",
                        row.replacement_hints.summary, EXPAND_GLYPH
                    ));
                }
            }
        }
        out.push('\n');
    }

    if !doc.outputs.is_empty() {
        out.push_str("Outputs:\n");
        for o in &doc.outputs {
            out.push_str(&format!(
                "  {}  {:?}  {} -> {}\n",
                o.name, o.change_type, o.before, o.after
            ));
        }
        out.push('\n');
    }

    out
}
