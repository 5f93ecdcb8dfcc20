//! FILENAME: report-engine/src/lib.rs
//! Reporting stages for activity data.
//!
//! Every stage is a pure function over borrowed activities; none of them
//! hold state between calls, so a filter change simply reruns them all.
//!
//! Layers:
//! - `filter`: FilterSpec evaluation (WHICH records)
//! - `resolve`: code → name lookups shared by every output
//! - `aggregation`: network ⊃ quarter ⊃ center statistics tree
//! - `series`: chart series per dimension
//! - `rows` / `summary`: display rows and filter descriptions for exports
//! - `format`: dates, decimals and ratio helpers

pub mod aggregation;
pub mod filter;
pub mod format;
pub mod resolve;
pub mod rows;
pub mod series;
pub mod summary;

pub use aggregation::{aggregate, summarize, AggregationNode, BreakdownEntry, Breakdowns, Scope, Totals};
pub use filter::{filter, matches};
pub use format::{format_date, format_decimal, format_percentage, ALL_TOKEN, DEFAULT_DELIMITER};
pub use resolve::Resolver;
pub use rows::{build_rows, ActivityRow};
pub use series::{rating_label, to_series, ChartDimension, ChartKind, SeriesPoint};
pub use summary::{describe_filters, report_period, FilterSummaryLine};
