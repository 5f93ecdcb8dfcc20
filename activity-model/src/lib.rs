//! FILENAME: activity-model/src/lib.rs
//! PURPOSE: Shared data model for the activity reporting crates.
//! CONTEXT: Re-exports public types so other crates can `use activity_model::Activity`.

pub mod activity;
pub mod catalog;
pub mod filter_spec;
pub mod report;
pub mod store;

pub use activity::{Activity, ActivityError, AttachmentRef, CodeSet, ImportIssue, MAX_RATING, MIN_RATING};
pub use catalog::{
    Catalog, Center, CenterObjective, Department, Network, Objective, Priority,
    ProfessionalFamily, Quarter, SustainabilityGoal,
};
pub use filter_spec::{ActivityStatus, FilterSpec, FilterSpecBuilder, FilterSpecError, RawFilterSpec};
pub use report::{OutputFormat, ReportConfig, ReportType};
pub use store::{InMemoryStore, RecordStore};
