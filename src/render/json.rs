//! JSON emitter (§4.G item 7): collapsibles become
//! `{type: "collapsible", summary, details, expanded}` objects.

use serde_json::json;

use crate::render::document::Document;
use crate::render::view::ViewOptions;
use crate::render::CollapsibleValue;

pub fn render(doc: &Document, opts: &ViewOptions) -> String {
    let outputs: Vec<_> = doc
        .outputs
        .iter()
        .map(|o| {
            json!({
                "name": o.name,
                "change_type": o.change_type,
                "sensitive": o.is_sensitive,
                "before": o.before,
                "after": o.after,
            })
        })
        .collect();

    let body = if doc.is_empty {
        json!({
            "engine_version": doc.engine_version,
            "generated_at": doc.generated_at.to_rfc3339(),
            "statistics": doc.statistics,
            "message": crate::render::NO_CHANGES_LINE,
            "groups": [],
            "outputs": outputs,
        })
    } else {
        let groups: Vec<_> = doc
            .groups
            .iter()
            .map(|g| {
                json!({
                    "provider": g.provider,
                    "statistics": g.subtotal,
                    "resources": g.rows.iter().map(|r| {
                        json!({
                            "address": r.address,
                            "type": r.resource_type,
                            "change_type": r.change_type,
                            "danger": r.is_dangerous,
                            "property_changes": collapsible_json(&r.property_changes, opts),
                            "replacement_hints": collapsible_json(&r.replacement_hints, opts),
                        })
                    }).collect::<Vec<_>>(),
                })
            })
            .collect();

        json!({
            "engine_version": doc.engine_version,
            "generated_at": doc.generated_at.to_rfc3339(),
            "statistics": doc.statistics,
            "groups": groups,
            "outputs": outputs,
        })
    };

    serde_json::to_string_pretty(&body).unwrap_or_else(|_| "{}".to_string())
}

fn collapsible_json(cv: &CollapsibleValue, opts: &ViewOptions) -> serde_json::Value {
    let expanded = cv.is_expanded(opts.expand_all);
    json!({
        "type": "collapsible",
        "summary": cv.summary,
        "details": cv.truncated_details(opts.max_details_chars, &opts.truncate_indicator),
        "expanded": expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::{ChangeStatistics, ChangeType, PlanSummary, PropertyChangeAnalysis, ResourceChange};
    use crate::render::document;
    use chrono::Utc;

    #[test]
    fn empty_plan_has_message_field() {
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
        let v: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(v["message"], crate::render::NO_CHANGES_LINE);
    }

    #[test]
    fn property_changes_cell_is_a_collapsible_object() {
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
        let v: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let cell = &v["groups"][0]["resources"][0]["property_changes"];
        assert_eq!(cell["type"], "collapsible");
        assert_eq!(cell["summary"], "0 properties changed");
    }

    #[test]
    fn outputs_are_emitted_as_a_sibling_array() {
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
        let v: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(v["outputs"][0]["name"], "endpoint");
        assert!(v.get("message").is_none());
    }
}
