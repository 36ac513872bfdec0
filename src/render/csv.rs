//! CSV emitter (§4.G item 7): summary columns plus numbered detail columns
//! (`property_changes_detail_1`, `_2`, …) appended per row.

use crate::render::document::Document;
use crate::render::{header_fields, view::ViewOptions};

const FORMAT: &str = "csv";
const DEFAULT_DETAIL_PREFIX: &str = "property_changes_detail";
const BASE_COLUMNS: &[&str] = &["address", "type", "change_type", "danger", "property_changes", "replacement_hints"];

pub fn render(doc: &Document, opts: &ViewOptions) -> String {
    let mut out = String::new();
    for (label, value) in header_fields(doc) {
        out.push_str(&format!("# {},{}\n", label, csv_field(&value)));
    }

    if doc.is_empty {
        out.push_str(&format!("{}\n", crate::render::NO_CHANGES_LINE));
        return out;
    }

    let all_rows: Vec<_> = doc.groups.iter().flat_map(|g| g.rows.iter()).collect();

    if !all_rows.is_empty() {
        let max_detail_lines = all_rows
            .iter()
            .map(|r| {
                r.property_changes
                    .truncated_details(opts.max_details_chars, &opts.truncate_indicator)
                    .lines()
                    .count()
            })
            .max()
            .unwrap_or(0);

        let detail_prefix = all_rows
            .iter()
            .find_map(|r| r.property_changes.hint(FORMAT, "detail_column_prefix"))
            .unwrap_or(DEFAULT_DETAIL_PREFIX);

        let mut header: Vec<String> = BASE_COLUMNS.iter().map(|s| s.to_string()).collect();
        for i in 1..=max_detail_lines {
            header.push(format!("{}_{}", detail_prefix, i));
        }

        out.push_str(&header.iter().map(|c| csv_field(c)).collect::<Vec<_>>().join(","));
        out.push('\n');

        for row in all_rows {
            let details = row
                .property_changes
                .truncated_details(opts.max_details_chars, &opts.truncate_indicator);
            let detail_lines: Vec<&str> = details.lines().collect();
            let sensitive_prefix = row.property_changes.sensitive_prefix(FORMAT);

            let mut fields = vec![
                csv_field(&row.address),
                csv_field(&row.resource_type),
                csv_field(&format!("{:?}", row.change_type)),
                csv_field(if row.is_dangerous { "true" } else { "false" }),
                csv_field(&format!("{}{}", sensitive_prefix, row.property_changes.summary)),
                csv_field(&row.replacement_hints.summary),
            ];
            for i in 0..max_detail_lines {
                fields.push(csv_field(detail_lines.get(i).copied().unwrap_or("")));
            }
            out.push_str(&fields.join(","));
            out.push('\n');
        }
    }

    if !doc.outputs.is_empty() {
        out.push('\n');
        out.push_str("name,change_type,sensitive,before,after\n");
        for o in &doc.outputs {
            let fields = vec![
                csv_field(&o.name),
                csv_field(&format!("{:?}", o.change_type)),
                csv_field(if o.is_sensitive { "true" } else { "false" }),
                csv_field(&o.before),
                csv_field(&o.after),
            ];
            out.push_str(&fields.join(","));
            out.push('\n');
        }
    }

    out
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
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
        let rendered = render(&doc, &ViewOptions::default());
        assert!(rendered.contains(crate::render::NO_CHANGES_LINE));
        assert!(rendered.starts_with("# engine_version,"));
    }

    #[test]
    fn quotes_fields_containing_commas() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn header_includes_base_columns() {
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
        let header = rendered
            .lines()
            .find(|l| !l.starts_with('#'))
            .expect("a non-comment header line");
        assert!(header.starts_with("address,type,change_type,danger,property_changes,replacement_hints"));
    }

    #[test]
    fn header_prelude_carries_engine_version_and_statistics() {
        let summary = PlanSummary {
            format_version: None,
            engine_version: "1.2.3".to_string(),
            resources: vec![],
            outputs: vec![],
            statistics: ChangeStatistics {
                total: 4,
                ..ChangeStatistics::default()
            },
            generated_at: Utc::now(),
        };
        let doc = document::build(&summary, &ViewOptions::default());
        let rendered = render(&doc, &ViewOptions::default());
        assert!(rendered.contains("# engine_version,1.2.3"));
        assert!(rendered.contains("# total,4"));
    }

    #[test]
    fn sensitive_property_change_is_prefixed_with_the_warning_glyph() {
        use crate::plan::model::{PropertyAction, PropertyChange, PropertyChangeAnalysis};
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
    fn detail_column_prefix_hint_is_consumed_for_the_header_name() {
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
                property_changes: crate::plan::model::PropertyChangeAnalysis {
                    count: 1,
                    truncated: false,
                    total_size: 0,
                    changes: vec![crate::plan::model::PropertyChange {
                        name: "size".to_string(),
                        path: vec![],
                        action: crate::plan::model::PropertyAction::Update,
                        before: Some(serde_json::json!(1)),
                        after: Some(serde_json::json!(2)),
                        sensitive: false,
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
        assert!(rendered.contains("property_changes_detail_1"));
    }

    #[test]
    fn outputs_appended_as_their_own_block_when_no_resources() {
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
        assert!(rendered.contains("name,change_type,sensitive,before,after"));
        assert!(rendered.contains("endpoint"));
    }
}
