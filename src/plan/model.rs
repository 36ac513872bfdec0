//! The derived data model (§3): immutable once built, owned top-down from
//! `PlanSummary` down through each resource's property analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A path segment: a map key, or an array index rendered as `[n]`.
pub type PathSegment = String;

/// One of the five derived change kinds for a resource (§3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
    Replace,
    NoOp,
}

impl ChangeType {
    /// Action ordering used by the risk-based sort (§4.G item 5):
    /// `Delete < Replace < Update < Create < NoOp`.
    pub fn sort_rank(self) -> u8 {
        match self {
            ChangeType::Delete => 0,
            ChangeType::Replace => 1,
            ChangeType::Update => 2,
            ChangeType::Create => 3,
            ChangeType::NoOp => 4,
        }
    }

    /// Derive a `ChangeType` from the raw action tokens of a plan entry,
    /// applying the first-match-wins rule of §3.
    pub fn from_actions(actions: &[String]) -> ChangeType {
        let has = |tok: &str| actions.iter().any(|a| a == tok);
        if has("delete") && has("create") {
            ChangeType::Replace
        } else if actions == ["create"] {
            ChangeType::Create
        } else if actions == ["delete"] {
            ChangeType::Delete
        } else if actions == ["update"] {
            ChangeType::Update
        } else if actions == ["no-op"] || actions == ["read"] {
            ChangeType::NoOp
        } else {
            ChangeType::Update
        }
    }
}

/// One atomic property-level diff (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyChange {
    pub name: String,
    pub path: Vec<PathSegment>,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub action: PropertyAction,
    pub sensitive: bool,
    pub size: usize,
    pub triggers_replacement: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyAction {
    Add,
    Remove,
    Update,
}

/// The full per-resource diff result, including truncation bookkeeping (§3).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PropertyChangeAnalysis {
    pub changes: Vec<PropertyChange>,
    pub count: usize,
    pub truncated: bool,
    pub total_size: usize,
}

/// A single resource's derived change record (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceChange {
    pub address: String,
    pub resource_type: String,
    pub provider: String,
    pub change_type: ChangeType,
    pub is_dangerous: bool,
    pub danger_reason: String,
    pub replacement_hints: Vec<Vec<PathSegment>>,
    pub property_changes: PropertyChangeAnalysis,
    pub is_no_op: bool,
    pub module_path: String,
}

/// A single output's derived change record (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputChange {
    pub name: String,
    pub change_type: ChangeType,
    pub is_sensitive: bool,
    pub is_no_op: bool,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

/// Aggregate counters across the entire change set (§3, §4.E).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ChangeStatistics {
    pub total: usize,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub replacements: usize,
    pub dangerous: usize,
    pub no_ops: usize,
    pub outputs_changed: usize,
}

/// The immutable result of the analyzer and the input to the renderer (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub format_version: Option<String>,
    pub engine_version: String,
    pub resources: Vec<ResourceChange>,
    pub outputs: Vec<OutputChange>,
    pub statistics: ChangeStatistics,
    pub generated_at: DateTime<Utc>,
}

impl PlanSummary {
    /// Whether the whole change set is empty of effect: zero resources or
    /// every resource is a no-op, and no outputs changed either.
    pub fn is_effectively_empty(&self, show_no_ops: bool) -> bool {
        let visible_resources = self
            .resources
            .iter()
            .filter(|r| show_no_ops || !r.is_no_op)
            .count();
        let visible_outputs = self
            .outputs
            .iter()
            .filter(|o| show_no_ops || !o.is_no_op)
            .count();
        visible_resources == 0 && visible_outputs == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_type_replace_wins_over_others() {
        let actions = vec!["delete".to_string(), "create".to_string()];
        assert_eq!(ChangeType::from_actions(&actions), ChangeType::Replace);
    }

    #[test]
    fn change_type_create_only() {
        assert_eq!(
            ChangeType::from_actions(&["create".to_string()]),
            ChangeType::Create
        );
    }

    #[test]
    fn change_type_unknown_falls_back_to_update() {
        assert_eq!(
            ChangeType::from_actions(&["move".to_string()]),
            ChangeType::Update
        );
    }

    #[test]
    fn sort_rank_orders_delete_first() {
        assert!(ChangeType::Delete.sort_rank() < ChangeType::Replace.sort_rank());
        assert!(ChangeType::Replace.sort_rank() < ChangeType::Update.sort_rank());
        assert!(ChangeType::Update.sort_rank() < ChangeType::Create.sort_rank());
        assert!(ChangeType::Create.sort_rank() < ChangeType::NoOp.sort_rank());
    }
}
