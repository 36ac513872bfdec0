//! Collapsible-value protocol (§4.H): a cell value that carries both a
//! one-line summary and an optional expanded form, rendered differently per
//! output format. Anti-nesting is enforced at construction.

use std::collections::HashMap;

use serde::Serialize;

/// A progressive-disclosure cell value: always has a `summary`; `details`
/// carries the expanded text, shown or hidden depending on `expanded` and
/// the view options at render time. `format_hints` carries per-format,
/// per-key rendering hints (e.g. a sensitivity glyph, a CSV column prefix)
/// so format-specific concerns stay on the value itself rather than in
/// out-of-band configuration (§3, §9 design note).
#[derive(Debug, Clone, Serialize, Default)]
pub struct CollapsibleValue {
    pub summary: String,
    pub details: String,
    pub default_expanded: bool,
    pub format_hints: HashMap<String, HashMap<String, String>>,
}

/// Raised when a caller tries to nest a collapsible value as the `details`
/// of another one (§4.H, §8 property 9).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a CollapsibleValue's details must not themselves be a CollapsibleValue")]
pub struct NestedCollapsibleError;

/// Marker substring used to detect an attempt to nest a collapsible's
/// rendered form inside another collapsible's `details`.
const COLLAPSIBLE_MARKER: &str = "\u{0}collapsible\u{0}";

impl CollapsibleValue {
    /// Build a new collapsible value. Rejects `details` that was itself
    /// produced by rendering a `CollapsibleValue` (anti-nesting, §4.H).
    pub fn new(
        summary: impl Into<String>,
        details: impl Into<String>,
        default_expanded: bool,
    ) -> Result<CollapsibleValue, NestedCollapsibleError> {
        let details = details.into();
        if details.contains(COLLAPSIBLE_MARKER) {
            return Err(NestedCollapsibleError);
        }
        Ok(CollapsibleValue {
            summary: summary.into(),
            details,
            default_expanded,
            format_hints: HashMap::new(),
        })
    }

    /// Attach a per-format rendering hint, e.g. `with_hint("csv",
    /// "detail_column_prefix", "property_changes_detail")`. Chainable.
    pub fn with_hint(
        mut self,
        format: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.format_hints
            .entry(format.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Look up a hint for `format`/`key`, if one was attached.
    pub fn hint(&self, format: &str, key: &str) -> Option<&str> {
        self.format_hints.get(format)?.get(key).map(String::as_str)
    }

    /// The sensitivity warning-glyph prefix for `format`, if the value
    /// carries a `sensitive_glyph` hint for it (§4.G item 4: "if any
    /// property is sensitive, prefix with a warning glyph in non-JSON
    /// formats"). Empty string when no such hint is set.
    pub fn sensitive_prefix(&self, format: &str) -> String {
        match self.hint(format, "sensitive_glyph") {
            Some(glyph) => format!("{} ", glyph),
            None => String::new(),
        }
    }

    /// Whether this value should be shown expanded, honoring a view-level
    /// `expand_all` override.
    pub fn is_expanded(&self, expand_all: bool) -> bool {
        expand_all || self.default_expanded
    }

    /// `details`, truncated to `max_chars` with `indicator` appended when it
    /// was cut (§4.G view option `max_details_chars`).
    pub fn truncated_details(&self, max_chars: usize, indicator: &str) -> String {
        if self.details.chars().count() <= max_chars {
            self.details.clone()
        } else {
            let mut s: String = self.details.chars().take(max_chars).collect();
            s.push_str(indicator);
            s
        }
    }
}
