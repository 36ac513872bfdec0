//! Markdown emitter (§4.G item 7): collapsibles become `<details>` blocks,
//! which GitHub-flavored Markdown renders as native disclosure widgets.

use crate::render::document::Document;
use crate::render::{header_fields, view::ViewOptions, CollapsibleValue, NO_CHANGES_LINE};

const FORMAT: &str = "markdown";

pub fn render(doc: &Document, opts: &ViewOptions) -> String {
    let mut out = String::new();

    out.push_str("# Plan summary\n\n");
    for (label, value) in header_fields(doc) {
        out.push_str(&format!("- **{}**: {}\n", label, value));
    }
    out.push('\n');

    if doc.is_empty {
        out.push_str(NO_CHANGES_LINE);
        out.push('\n');
        return out;
    }

    for group in &doc.groups {
        if !group.provider.is_empty() {
            out.push_str(&format!("## {}\n\n", group.provider));
            out.push_str(&format!(
                "total: {}, dangerous: {}\n\n",
                group.subtotal.total, group.subtotal.dangerous
            ));
        }

        out.push_str("| address | type | change | danger | property changes | replacement hints |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for row in &group.rows {
            out.push_str(&format!(
                "| {} | {} | {:?} | {} | {} | {} |\n",
                row.address,
                row.resource_type,
                row.change_type,
                if row.is_dangerous { "yes" } else { "no" },
                disclosure(&row.property_changes, opts, &row.property_changes.sensitive_prefix(FORMAT)),
                disclosure(&row.replacement_hints, opts, ""),
            ));
        }
        out.push('\n');
    }

    if !doc.outputs.is_empty() {
        out.push_str("## Outputs\n\n");
        out.push_str("| name | change | before | after |\n");
        out.push_str("|---|---|---|---|\n");
        for o in &doc.outputs {
            out.push_str(&format!(
                "| {} | {:?} | {} | {} |\n",
                o.name, o.change_type, o.before, o.after
            ));
        }
        out.push('\n');
    }

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
        open_attr, prefix, cv.summary, details
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::{ChangeStatistics, ChangeType, PlanSummary, PropertyChangeAnalysis, ResourceChange};
    use crate::render::document;
    use chrono::Utc;

    #[test]
    fn empty_plan_emits_no_changes_line() {
        let summary = PlanSummary {
            format_version: None,
            engine_version: "1.0".to_string(),
            resources: vec![],
            outputs: vec![],
            statistics: ChangeStatistics::default(),
            generated_at: Utc::now(),
        };
        let doc = document::build(&summary, &ViewOptions::default());
        assert!(render(&doc, &ViewOptions::default()).contains(NO_CHANGES_LINE));
    }

    #[test]
    fn resource_row_renders_a_details_disclosure() {
        let summary = PlanSummary {
            format_version: None,
            engine_version: "1.0".to_string(),
            resources: vec![ResourceChange {
                address: "aws_instance.web".to_string(),
                resource_type: "aws_instance".to_string(),
                provider: "aws".to_string(),
                change_type: ChangeType::Update,
                is_dangerous: false,
                danger_reason: String::new(),
                replacement_hints: vec![],
                property_changes: PropertyChangeAnalysis::default(),
                is_no_op: false,
                module_path: String::new(),
            }],
            outputs: vec![],
            statistics: ChangeStatistics {
                total: 1,
                modified: 1,
                ..ChangeStatistics::default()
            },
            generated_at: Utc::now(),
        };
        let doc = document::build(&summary, &ViewOptions::default());
        let rendered = render(&doc, &ViewOptions::default());
        assert!(rendered.contains("<details"));
        assert!(rendered.contains("aws_instance.web"));
    }

    #[test]
    fn sensitive_property_change_is_prefixed_with_the_warning_glyph() {
        use crate::plan::model::{PropertyAction, PropertyChange};
        let summary = PlanSummary {
            format_version: None,
            engine_version: "1.0".to_string(),
            resources: vec![ResourceChange {
                address: "aws_db_instance.main".to_string(),
                resource_type: "aws_db_instance".to_string(),
                provider: "aws".to_string(),
                change_type: ChangeType::Update,
                is_dangerous: false,
                danger_reason: String::new(),
                replacement_hints: vec![],
                property_changes: PropertyChangeAnalysis {
                    count: 1,
                    truncated: false,
                    total_size: 0,
                    changes: vec![PropertyChange {
                        name: "password".to_string(),
                        path: vec![],
                        action: PropertyAction::Update,
                        before: Some(serde_json::json!("***")),
                        after: Some(serde_json::json!("***")),
                        sensitive: true,
                        size: 0,
                        triggers_replacement: false,
                    }],
                },
                is_no_op: false,
                module_path: String::new(),
            }],
            outputs: vec![],
            statistics: ChangeStatistics {
                total: 1,
                modified: 1,
                ..ChangeStatistics::default()
            },
            generated_at: Utc::now(),
        };
        let doc = document::build(&summary, &ViewOptions::default());
        let rendered = render(&doc, &ViewOptions::default());
        assert!(rendered.contains("\u{26A0}"));
    }

    #[test]
    fn outputs_section_renders_a_table() {
        use crate::plan::model::OutputChange;
        let summary = PlanSummary {
            format_version: None,
            engine_version: "1.0".to_string(),
            resources: vec![],
            outputs: vec![OutputChange {
                name: "endpoint".to_string(),
                change_type: ChangeType::Update,
                is_sensitive: false,
                is_no_op: false,
                before: Some(serde_json::json!("old")),
                after: Some(serde_json::json!("new")),
            }],
            statistics: ChangeStatistics::default(),
            generated_at: Utc::now(),
        };
        let doc = document::build(&summary, &ViewOptions::default());
        let rendered = render(&doc, &ViewOptions::default());
        assert!(rendered.contains("## Outputs"));
        assert!(rendered.contains("endpoint"));
    }
}
