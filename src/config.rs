//! Layered configuration loader: built-in defaults, then an optional
//! JSON file, then `STRATA_*` environment variables, then CLI flags (applied
//! by the caller last, since `clap` parses those independently).

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::plan::classifier::RiskRules;
use crate::render::view::ViewOptions;

/// Resource types treated as sensitive by default (§4.D supplement),
/// drawn from common high-risk resource categories across major providers.
const DEFAULT_SENSITIVE_RESOURCE_TYPES: &[&str] = &[
    "aws_db_instance",
    "aws_rds_cluster",
    "aws_elasticache_cluster",
    "aws_elasticsearch_domain",
    "aws_opensearch_domain",
    "google_sql_database_instance",
    "azurerm_sql_database",
    "azurerm_postgresql_server",
    "aws_s3_bucket",
    "google_storage_bucket",
    "azurerm_storage_account",
    "aws_iam_role",
    "aws_iam_policy",
    "google_project_iam_binding",
    "azurerm_role_assignment",
    "aws_security_group",
    "google_compute_firewall",
    "azurerm_network_security_group",
    "aws_vpc",
    "google_compute_network",
    "azurerm_virtual_network",
    "aws_kms_key",
    "google_kms_crypto_key",
    "azurerm_key_vault",
];

/// Default `(resource_type, property_name)` pairs treated as sensitive
/// regardless of what the plan document itself marks (§4.D supplement).
const DEFAULT_SENSITIVE_PROPERTIES: &[(&str, &str)] = &[
    ("aws_db_instance", "password"),
    ("aws_db_instance", "master_password"),
    ("azurerm_key_vault", "access_policy"),
    ("aws_iam_role", "assume_role_policy"),
];

/// The subset of configuration that may be supplied by a JSON file or
/// environment variables; CLI flags override these in the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StrataConfig {
    #[serde(default)]
    pub sensitive_resource_types: Option<Vec<String>>,
    #[serde(default)]
    pub max_plan_bytes: Option<u64>,
    #[serde(default)]
    pub show_no_ops: Option<bool>,
    #[serde(default)]
    pub expand_all: Option<bool>,
    #[serde(default)]
    pub group_by_provider: Option<bool>,
    #[serde(default)]
    pub provider_grouping_threshold: Option<usize>,
    #[serde(default)]
    pub format: Option<String>,
}

impl StrataConfig {
    /// Resolve the config file path: an explicit `--config PATH`, else
    /// `$STRATA_CONFIG`, else `~/.strata/config.json` if it exists.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(p.to_path_buf());
        }
        if let Ok(p) = env::var("STRATA_CONFIG") {
            return Some(PathBuf::from(p));
        }
        dirs::home_dir()
            .map(|home| home.join(".strata").join("config.json"))
            .filter(|p| p.exists())
    }

    /// Load the file at `path`, if any, then apply `STRATA_*` environment
    /// overrides on top of it.
    pub fn load(explicit_path: Option<&Path>) -> Result<StrataConfig, LoadError> {
        let mut config = match Self::resolve_path(explicit_path) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => StrataConfig::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<StrataConfig, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::Unreadable {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| LoadError::NotJson {
            path: path.display().to_string(),
            cause: e.to_string(),
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("STRATA_MAX_PLAN_BYTES") {
            if let Ok(n) = val.parse::<u64>() {
                self.max_plan_bytes = Some(n);
            }
        }
        if let Ok(val) = env::var("STRATA_SHOW_NO_OPS") {
            self.show_no_ops = Some(parse_bool(&val));
        }
        if let Ok(val) = env::var("STRATA_EXPAND_ALL") {
            self.expand_all = Some(parse_bool(&val));
        }
        if let Ok(val) = env::var("STRATA_GROUP_BY_PROVIDER") {
            self.group_by_provider = Some(parse_bool(&val));
        }
        if let Ok(val) = env::var("STRATA_FORMAT") {
            self.format = Some(val);
        }
        if let Ok(val) = env::var("STRATA_SENSITIVE_RESOURCE_TYPES") {
            self.sensitive_resource_types =
                Some(val.split(',').map(|s| s.trim().to_string()).collect());
        }
    }

    /// Build the default risk rules, overridden by any configured sensitive
    /// resource types (§4.D supplement).
    pub fn risk_rules(&self) -> RiskRules {
        let mut types: HashSet<String> = DEFAULT_SENSITIVE_RESOURCE_TYPES
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(configured) = &self.sensitive_resource_types {
            types = configured.iter().cloned().collect();
        }
        let properties = DEFAULT_SENSITIVE_PROPERTIES
            .iter()
            .map(|(t, p)| (t.to_string(), p.to_string()))
            .collect();
        RiskRules {
            sensitive_resource_types: types,
            sensitive_properties: properties,
        }
    }

    /// Apply this config's values on top of `base`, without touching fields
    /// this config left unset. CLI flags are applied by the caller after
    /// this, as the highest-priority layer.
    pub fn apply_to_view(&self, base: ViewOptions) -> ViewOptions {
        let mut view = base;
        if let Some(v) = self.show_no_ops {
            view.show_no_ops = v;
        }
        if let Some(v) = self.expand_all {
            view.expand_all = v;
        }
        if let Some(v) = self.group_by_provider {
            view.group_by_provider = v;
        }
        if let Some(v) = self.provider_grouping_threshold {
            view.provider_grouping_threshold = v;
        }
        if let Some(fmt) = &self.format {
            if let Some(parsed) = crate::render::OutputFormat::parse(fmt) {
                view.format = parsed;
            }
        }
        view
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
