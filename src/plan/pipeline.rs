//! Summary Assembler and orchestrator (§4.F, §5): wires the Change
//! Extractor, Property Differ, Risk Classifier, and Statistics Aggregator
//! into one immutable `PlanSummary`, preserving input order throughout.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::StrataError;
use crate::plan::classifier::{self, RiskRules};
use crate::plan::differ::{self, DiffLimits, MASKED_TOKEN};
use crate::plan::model::{ChangeType, OutputChange, PlanSummary, ResourceChange};
use crate::plan::raw::RawPlanDocument;
use crate::plan::{aggregator, extractor};

/// A caller-supplied cancellation signal, checked between resources and at
/// property-recursion sub-tree boundaries (§5). The pipeline returns
/// `StrataError::Cancelled` and produces no partial `PlanSummary` once this
/// reports `true`.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// The default signal: never cancels.
pub struct NeverCancelled;

impl Cancellation for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Run the full analysis pipeline over an already-loaded plan document,
/// producing a `PlanSummary` (§4.F) or a `StrataError` (§7).
#[instrument(skip_all, fields(engine_version = engine_version))]
pub fn analyze(
    doc: RawPlanDocument,
    rules: &RiskRules,
    limits: &DiffLimits,
    engine_version: &str,
    generated_at: DateTime<Utc>,
    cancel: &dyn Cancellation,
) -> Result<PlanSummary, StrataError> {
    let format_version = doc.format_version.clone();
    let (raw_resources, raw_outputs) = extractor::extract(doc);

    let mut resources = Vec::with_capacity(raw_resources.len());
    let mut seen_addresses = std::collections::HashSet::with_capacity(raw_resources.len());

    for raw in raw_resources {
        if cancel.is_cancelled() {
            info!("analysis cancelled while processing resources");
            return Err(StrataError::Cancelled);
        }

        if !seen_addresses.insert(raw.address.clone()) {
            return Err(StrataError::Internal(format!(
                "duplicate resource address in plan: {}",
                raw.address
            )));
        }

        resources.push(build_resource_change(raw, rules, limits));
    }

    let mut outputs = Vec::with_capacity(raw_outputs.len());
    for raw in raw_outputs {
        if cancel.is_cancelled() {
            info!("analysis cancelled while processing outputs");
            return Err(StrataError::Cancelled);
        }
        outputs.push(build_output_change(raw));
    }

    let statistics = aggregator::aggregate(&resources, &outputs);
    debug!(
        total = statistics.total,
        dangerous = statistics.dangerous,
        "plan analysis complete"
    );

    Ok(PlanSummary {
        format_version,
        engine_version: engine_version.to_string(),
        resources,
        outputs,
        statistics,
        generated_at,
    })
}

/// Top-level JSON `null` is treated as absent (§3 open questions): Terraform
/// emits `before: null` for creates and `after: null` for deletes.
fn non_null(v: Option<Value>) -> Option<Value> {
    v.filter(|v| !v.is_null())
}

fn build_resource_change(
    raw: crate::plan::raw::RawResourceChange,
    rules: &RiskRules,
    limits: &DiffLimits,
) -> ResourceChange {
    let change_type = ChangeType::from_actions(&raw.change.actions);

    let replace_paths: Vec<Vec<String>> = raw
        .change
        .replace_paths
        .unwrap_or_default()
        .iter()
        .map(|segs| differ::normalize_path(segs))
        .collect();

    let before = non_null(raw.change.before);
    let after = non_null(raw.change.after);

    let property_changes = differ::diff(
        before.as_ref(),
        after.as_ref(),
        raw.change.before_sensitive.as_ref(),
        raw.change.after_sensitive.as_ref(),
        &replace_paths,
        limits,
    );

    let (is_dangerous, danger_reason) = classifier::classify(
        &raw.resource_type,
        change_type,
        &property_changes.changes,
        rules,
    );

    let replacement_hints = if change_type == ChangeType::Replace {
        if replace_paths.is_empty() {
            vec![vec!["(unknown)".to_string()]]
        } else {
            replace_paths
        }
    } else {
        Vec::new()
    };

    ResourceChange {
        address: raw.address,
        resource_type: raw.resource_type,
        provider: raw.provider_name.unwrap_or_else(|| "unknown".to_string()),
        change_type,
        is_dangerous,
        danger_reason,
        replacement_hints,
        property_changes,
        is_no_op: change_type == ChangeType::NoOp,
        module_path: raw.module_address.unwrap_or_default(),
    }
}

fn build_output_change(raw: crate::plan::raw::RawOutputChange) -> OutputChange {
    let change_type = ChangeType::from_actions(&raw.actions);

    let mask = |v: Option<Value>| -> Option<Value> {
        let v = non_null(v)?;
        if raw.sensitive {
            Some(Value::String(MASKED_TOKEN.to_string()))
        } else {
            Some(v)
        }
    };

    OutputChange {
        name: raw.name,
        change_type,
        is_sensitive: raw.sensitive,
        is_no_op: change_type == ChangeType::NoOp,
        before: mask(raw.before),
        after: mask(raw.after),
    }
}
