//! HTML emitter (§4.G item 7): the same `<details>` disclosure protocol as
//! the Markdown emitter, wrapped in a minimal standalone document.

use crate::render::document::Document;
use crate::render::{header_fields, view::ViewOptions, CollapsibleValue, NO_CHANGES_LINE};

const FORMAT: &str = "html";

pub fn render(doc: &Document, opts: &ViewOptions) -> String {
    let mut out = String::new();
    out.push_str("<html><body>\n<h1>Plan summary</h1>\n<ul>\n");
    for (label, value) in header_fields(doc) {
        out.push_str(&format!(
            "<li><strong>{}</strong>: {}</li>\n",
            escape(label),
            escape(&value)
        ));
    }
    out.push_str("</ul>\n");

    if doc.is_empty {
        out.push_str(&format!("<p>{}</p>\n", NO_CHANGES_LINE));
        out.push_str("</body></html>\n");
        return out;
    }

    for group in &doc.groups {
        if !group.provider.is_empty() {
            out.push_str(&format!("<h2>{}</h2>\n", escape(&group.provider)));
            out.push_str(&format!(
                "<p>total: {}, dangerous: {}</p>\n",
                group.subtotal.total, group.subtotal.dangerous
            ));
        }

        out.push_str("<table>\n<tr><th>address</th><th>type</th><th>change</th><th>danger</th><th>property changes</th><th>replacement hints</th></tr>\n");
        for row in &group.rows {
            out.push_str("<tr>");
            out.push_str(&format!("<td>{}</td>", escape(&row.address)));
            out.push_str(&format!("<td>{}</td>", escape(&row.resource_type)));
            out.push_str(&format!("<td>{:?}</td>", row.change_type));
            out.push_str(&format!(
                "<td>{}</td>",
                if row.is_dangerous { "danger" } else { "" }
            ));
            out.push_str(&format!(
                "<td>{}</td>",
                disclosure(&row.property_changes, opts, &row.property_changes.sensitive_prefix(FORMAT))
            ));
            out.push_str(&format!(
                "<td>{}</td>",
                disclosure(&row.replacement_hints, opts, "")
            ));
            out.push_str("</tr>\n");
        }
        out.push_str("</table>\n");
    }

    if !doc.outputs.is_empty() {
        out.push_str("<h2>Outputs</h2>\n");
        out.push_str("<table>\n<tr><th>name</th><th>change</th><th>before</th><th>after</th></tr>\n");
        for o in &doc.outputs {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{:?}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&o.name),
                o.change_type,
                escape(&o.before),
                escape(&o.after)
            ));
        }
        out.push_str("</table>\n");
    }

    out.push_str("</body></html>\n");
    out
}

fn disclosure(cv: &CollapsibleValue, opts: &ViewOptions, prefix: &str) -> String {
    if cv.summary.is_empty() {
        return String::new();
    }
    let open_attr = if cv.is_expanded(opts.expand_all) {
        " open"
    } else {
        ""
    };
    let details = cv.truncated_details(opts.max_details_chars, &opts.truncate_indicator);
    format!(
        "<details{}><summary>{}{}</summary><pre>{}</pre></details>",
        open_attr,
        escape(prefix),
        escape(&cv.summary),
        escape(&details)
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
