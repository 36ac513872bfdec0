//! Plan Loader (§4.A): read a JSON plan document from a filesystem path,
//! decode it, and validate minimal required structure.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::LoadError;
use crate::plan::raw::RawPlanDocument;

/// Default ceiling on plan file size, per §4.A.
pub const DEFAULT_MAX_PLAN_BYTES: u64 = 256 * 1024 * 1024;

/// Load and validate a plan document from `path`.
///
/// `max_bytes` overrides the default 256 MiB ceiling; pass
/// `DEFAULT_MAX_PLAN_BYTES` for the standard limit.
pub fn load(path: &Path, max_bytes: u64) -> Result<RawPlanDocument, LoadError> {
    let metadata = fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            LoadError::Unreadable {
                path: path.display().to_string(),
                cause: e.to_string(),
            }
        }
    })?;

    if metadata.len() > max_bytes {
        return Err(LoadError::TooLarge {
            path: path.display().to_string(),
            limit_bytes: max_bytes,
            actual_bytes: metadata.len(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| LoadError::Unreadable {
        path: path.display().to_string(),
        cause: e.to_string(),
    })?;

    debug!(path = %path.display(), bytes = metadata.len(), "loaded plan file");

    parse(&content, path)
}

/// Parse already-read plan content, separated from `load` so callers with
/// in-memory plan JSON (tests, pipes) can skip the filesystem round trip.
pub fn parse(content: &str, source_hint: &Path) -> Result<RawPlanDocument, LoadError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| LoadError::NotJson {
            path: source_hint.display().to_string(),
            cause: e.to_string(),
        })?;

    validate_shape(&value)?;

    let doc: RawPlanDocument =
        serde_json::from_value(value).map_err(|e| LoadError::MalformedPlan {
            field: first_offending_field(&e),
            detail: e.to_string(),
        })?;

    if let Some(fv) = &doc.format_version {
        if fv.trim().is_empty() {
            warn!("plan document has an empty format_version");
        }
    } else {
        warn!("plan document has no format_version");
    }

    Ok(doc)
}

fn validate_shape(value: &serde_json::Value) -> Result<(), LoadError> {
    let obj = value.as_object().ok_or_else(|| LoadError::MalformedPlan {
        field: "$".to_string(),
        detail: "top-level plan document must be a JSON object".to_string(),
    })?;

    if let Some(rc) = obj.get("resource_changes") {
        if !rc.is_array() {
            return Err(LoadError::MalformedPlan {
                field: "resource_changes".to_string(),
                detail: "must be an array".to_string(),
            });
        }
    }

    if let Some(oc) = obj.get("output_changes") {
        if !oc.is_array() {
            return Err(LoadError::MalformedPlan {
                field: "output_changes".to_string(),
                detail: "must be an array".to_string(),
            });
        }
    }

    if let Some(fv) = obj.get("format_version") {
        if !fv.is_string() && !fv.is_null() {
            return Err(LoadError::MalformedPlan {
                field: "format_version".to_string(),
                detail: "must be a string".to_string(),
            });
        }
    }

    Ok(())
}

/// Best-effort extraction of the field name a serde error complained about,
/// for the `MalformedPlan` error context (§7).
fn first_offending_field(err: &serde_json::Error) -> String {
    let msg = err.to_string();
    msg.split(&['`', '\''][..])
        .nth(1)
        .unwrap_or("<unknown>")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn not_found_is_surfaced() {
        let err = load(Path::new("/nonexistent/plan.json"), DEFAULT_MAX_PLAN_BYTES).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn not_json_is_surfaced() {
        let f = write_temp("not json at all {{{");
        let err = load(f.path(), DEFAULT_MAX_PLAN_BYTES).unwrap_err();
        assert!(matches!(err, LoadError::NotJson { .. }));
    }

    #[test]
    fn too_large_is_surfaced() {
        let f = write_temp("{\"resource_changes\": []}");
        let err = load(f.path(), 1).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { .. }));
    }

    #[test]
    fn empty_resource_changes_is_valid() {
        let f = write_temp(r#"{"format_version":"1.0","resource_changes":[]}"#);
        let doc = load(f.path(), DEFAULT_MAX_PLAN_BYTES).unwrap();
        assert!(doc.resource_changes.is_empty());
        assert_eq!(doc.format_version.as_deref(), Some("1.0"));
    }

    #[test]
    fn non_array_resource_changes_is_malformed() {
        let f = write_temp(r#"{"resource_changes": "oops"}"#);
        let err = load(f.path(), DEFAULT_MAX_PLAN_BYTES).unwrap_err();
        assert!(matches!(err, LoadError::MalformedPlan { .. }));
    }

    #[test]
    fn non_object_top_level_is_malformed() {
        let f = write_temp("[]");
        let err = load(f.path(), DEFAULT_MAX_PLAN_BYTES).unwrap_err();
        assert!(matches!(err, LoadError::MalformedPlan { .. }));
    }
}
