//! The plan analysis core (§2): Loader → Extractor → (Differ, Classifier) →
//! Aggregator → Assembler. Everything here is pure and total except the
//! loader, which touches the filesystem.

pub mod aggregator;
pub mod classifier;
pub mod differ;
pub mod extractor;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod raw;

pub use classifier::RiskRules;
pub use differ::DiffLimits;
pub use model::{
    ChangeStatistics, ChangeType, OutputChange, PathSegment, PlanSummary, PropertyAction,
    PropertyChange, PropertyChangeAnalysis, ResourceChange,
};
pub use pipeline::{analyze, Cancellation, NeverCancelled};
pub use raw::RawPlanDocument;
