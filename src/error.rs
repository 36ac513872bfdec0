//! Error taxonomy for the Strata core pipeline.
//!
//! Internal stages return one of these precise `thiserror` types; the CLI
//! binary flattens everything to `anyhow::Error` at the reporting boundary.

use thiserror::Error;

/// Errors raised while loading and decoding a plan document (§4.A).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("plan file not found: {path}")]
    NotFound { path: String },

    #[error("plan file is not readable: {path} ({cause})")]
    Unreadable { path: String, cause: String },

    #[error("plan file exceeds the {limit_bytes}-byte size limit: {path} is {actual_bytes} bytes")]
    TooLarge {
        path: String,
        limit_bytes: u64,
        actual_bytes: u64,
    },

    #[error("plan file is not valid JSON: {path} ({cause})")]
    NotJson { path: String, cause: String },

    #[error("plan document is malformed: field '{field}' {detail}")]
    MalformedPlan { field: String, detail: String },
}

/// Errors raised while rendering a `PlanSummary` to a sink (§4.G).
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("sink failed to accept the rendered document: {0}")]
    SinkFailure(String),
}

/// Unifying error type for the whole pipeline, including cancellation,
/// which can originate from any stage (§5).
#[derive(Error, Debug)]
pub enum StrataError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("plan analysis was cancelled")]
    Cancelled,

    #[error("internal invariant violation: {0}")]
    Internal(String),
}

impl StrataError {
    /// Exit code this error should map to (§6).
    pub fn exit_code(&self) -> i32 {
        match self {
            StrataError::Load(_) => 2,
            StrataError::Render(_) => 3,
            StrataError::Cancelled => 2,
            StrataError::Internal(_) => 4,
        }
    }
}

/// One remediation suggestion keyed by error kind, used by `format_user_message`.
struct Remediation {
    kind: &'static str,
    suggestions: &'static [&'static str],
}

const REMEDIATIONS: &[Remediation] = &[
    Remediation {
        kind: "NotFound",
        suggestions: &[
            "Check that the plan file path is correct.",
            "Re-run the plan command that produces the JSON file.",
        ],
    },
    Remediation {
        kind: "Unreadable",
        suggestions: &["Check file permissions on the plan file."],
    },
    Remediation {
        kind: "TooLarge",
        suggestions: &[
            "Split the plan into smaller targeted plans.",
            "Increase the configured size limit if this is expected.",
        ],
    },
    Remediation {
        kind: "NotJson",
        suggestions: &["Confirm the file was produced with a JSON-output plan command."],
    },
    Remediation {
        kind: "MalformedPlan",
        suggestions: &["Confirm the plan was produced by a compatible tool version."],
    },
    Remediation {
        kind: "Cancelled",
        suggestions: &["Re-run the analysis; no partial result was produced."],
    },
    Remediation {
        kind: "UnsupportedFormat",
        suggestions: &["Use one of: table, json, html, markdown, csv."],
    },
    Remediation {
        kind: "SinkFailure",
        suggestions: &["Check the destination (stdout, file, or pipe) for write errors."],
    },
];

fn kind_of(err: &StrataError) -> &'static str {
    match err {
        StrataError::Load(LoadError::NotFound { .. }) => "NotFound",
        StrataError::Load(LoadError::Unreadable { .. }) => "Unreadable",
        StrataError::Load(LoadError::TooLarge { .. }) => "TooLarge",
        StrataError::Load(LoadError::NotJson { .. }) => "NotJson",
        StrataError::Load(LoadError::MalformedPlan { .. }) => "MalformedPlan",
        StrataError::Render(RenderError::UnsupportedFormat(_)) => "UnsupportedFormat",
        StrataError::Render(RenderError::SinkFailure(_)) => "SinkFailure",
        StrataError::Cancelled => "Cancelled",
        StrataError::Internal(_) => "Internal",
    }
}

/// Produce a terminal-friendly rendering of `err`: the message plus up to
/// three remediation suggestions drawn from a static table keyed by kind (§7).
pub fn format_user_message(err: &StrataError) -> String {
    let kind = kind_of(err);
    let mut out = format!("error: {}", err);

    if let Some(remediation) = REMEDIATIONS.iter().find(|r| r.kind == kind) {
        for (i, suggestion) in remediation.suggestions.iter().take(3).enumerate() {
            out.push_str(&format!("\n  {}. {}", i + 1, suggestion));
        }
    }

    out
}
