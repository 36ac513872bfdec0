//! Strata: analyzes infrastructure-change plan documents, classifies risk,
//! and renders a collapsible, multi-format review of what a plan will do.

pub mod config;
pub mod error;
pub mod plan;
pub mod render;

pub mod shared {
    pub mod logging;
}

pub use error::{format_user_message, LoadError, RenderError, StrataError};
pub use plan::{analyze, Cancellation, NeverCancelled, PlanSummary, RiskRules};
pub use render::{render as render_summary, OutputFormat, Sink, ViewOptions};
