//! Raw plan document shapes (§3, §6), deserialized directly from the
//! external IaC tool's JSON output. Field names follow the wire format.

use serde::Deserialize;
use serde_json::Value;

/// The raw parsed plan document (§3 `PlanDocument`).
#[derive(Debug, Deserialize)]
pub struct RawPlanDocument {
    pub format_version: Option<String>,
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub resource_changes: Vec<RawResourceChange>,
    #[serde(default)]
    pub output_changes: Vec<RawOutputChange>,
    #[serde(default)]
    pub configuration: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawResourceChange {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub module_address: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    pub change: RawChange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChange {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
    #[serde(default)]
    pub before_sensitive: Option<Value>,
    #[serde(default)]
    pub after_sensitive: Option<Value>,
    /// Per §9: some plans omit this key entirely on a replace, others emit
    /// `[]`. Both deserialize to `None`/`Some(vec![])` respectively and are
    /// treated identically downstream — "no hints supplied".
    #[serde(default)]
    pub replace_paths: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOutputChange {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
    #[serde(default)]
    pub sensitive: bool,
}
