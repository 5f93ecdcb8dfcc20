//! FILENAME: activity-model/src/filter_spec.rs
//! PURPOSE: The immutable set of predicates that narrows one report run.
//! CONTEXT: A FilterSpec is only ever produced by `FilterSpecBuilder::build`
//! (deserialization goes through the same path), so every spec the engine sees
//! is well formed. Changing a filter means building a new spec.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

// ============================================================================
// STATUS
// ============================================================================

/// Import status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// Imported without errors and not flagged incomplete.
    Imported,
    /// Carries at least one import error.
    Error,
    /// Flagged incomplete.
    Incomplete,
}

impl ActivityStatus {
    pub fn label(self) -> &'static str {
        match self {
            ActivityStatus::Imported => "Importadas",
            ActivityStatus::Error => "Con errores",
            ActivityStatus::Incomplete => "Incompletas",
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterSpecError {
    #[error("date range is inverted: {from} is after {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },

    #[error("filter field '{0}' was set to a blank value")]
    BlankValue(&'static str),

    #[error("filter field '{0}' was set to an empty id set")]
    EmptySet(&'static str),
}

// ============================================================================
// FILTER SPEC
// ============================================================================

/// Unvalidated wire shape of a filter spec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilterSpec {
    #[serde(default)]
    date_from: Option<NaiveDate>,
    #[serde(default)]
    date_to: Option<NaiveDate>,
    #[serde(default)]
    network: Option<String>,
    #[serde(default)]
    center: Option<String>,
    #[serde(default)]
    quarter: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    objectives: Option<BTreeSet<String>>,
    #[serde(default)]
    goals: Option<BTreeSet<String>>,
    #[serde(default)]
    status: Option<ActivityStatus>,
}

/// Conjunctive, optional predicates over activities. An unset predicate
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilterSpec", into = "RawFilterSpec")]
pub struct FilterSpec {
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    network: Option<String>,
    center: Option<String>,
    quarter: Option<String>,
    department: Option<String>,
    family: Option<String>,
    search: Option<String>,
    objectives: Option<BTreeSet<String>>,
    goals: Option<BTreeSet<String>>,
    status: Option<ActivityStatus>,
}

impl FilterSpec {
    /// The match-all spec.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn builder() -> FilterSpecBuilder {
        FilterSpecBuilder::default()
    }

    /// Starts a builder pre-filled with this spec's predicates.
    pub fn to_builder(&self) -> FilterSpecBuilder {
        FilterSpecBuilder {
            raw: RawFilterSpec::from(self.clone()),
        }
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }

    pub fn center(&self) -> Option<&str> {
        self.center.as_deref()
    }

    pub fn quarter(&self) -> Option<&str> {
        self.quarter.as_deref()
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn objectives(&self) -> Option<&BTreeSet<String>> {
        self.objectives.as_ref()
    }

    pub fn goals(&self) -> Option<&BTreeSet<String>> {
        self.goals.as_ref()
    }

    pub fn status(&self) -> Option<ActivityStatus> {
        self.status
    }

    /// True when no predicate is set.
    pub fn is_unset(&self) -> bool {
        *self == FilterSpec::default()
    }
}

impl TryFrom<RawFilterSpec> for FilterSpec {
    type Error = FilterSpecError;

    fn try_from(raw: RawFilterSpec) -> Result<Self, Self::Error> {
        if let (Some(from), Some(to)) = (raw.date_from, raw.date_to) {
            if from > to {
                return Err(FilterSpecError::InvertedDateRange { from, to });
            }
        }

        Ok(FilterSpec {
            date_from: raw.date_from,
            date_to: raw.date_to,
            network: non_blank("network", raw.network)?,
            center: non_blank("center", raw.center)?,
            quarter: non_blank("quarter", raw.quarter)?,
            department: non_blank("department", raw.department)?,
            family: non_blank("family", raw.family)?,
            search: non_blank("search", raw.search)?,
            objectives: non_empty("objectives", raw.objectives)?,
            goals: non_empty("goals", raw.goals)?,
            status: raw.status,
        })
    }
}

impl From<FilterSpec> for RawFilterSpec {
    fn from(spec: FilterSpec) -> Self {
        RawFilterSpec {
            date_from: spec.date_from,
            date_to: spec.date_to,
            network: spec.network,
            center: spec.center,
            quarter: spec.quarter,
            department: spec.department,
            family: spec.family,
            search: spec.search,
            objectives: spec.objectives,
            goals: spec.goals,
            status: spec.status,
        }
    }
}

fn non_blank(field: &'static str, value: Option<String>) -> Result<Option<String>, FilterSpecError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(FilterSpecError::BlankValue(field)),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

fn non_empty(
    field: &'static str,
    value: Option<BTreeSet<String>>,
) -> Result<Option<BTreeSet<String>>, FilterSpecError> {
    match value {
        Some(set) if set.is_empty() => Err(FilterSpecError::EmptySet(field)),
        other => Ok(other),
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Accumulates predicates; `build` validates and freezes them.
#[derive(Debug, Clone, Default)]
pub struct FilterSpecBuilder {
    raw: RawFilterSpec,
}

impl FilterSpecBuilder {
    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.raw.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.raw.date_to = Some(date);
        self
    }

    pub fn date_range(self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from(from).date_to(to)
    }

    pub fn network(mut self, code: impl Into<String>) -> Self {
        self.raw.network = Some(code.into());
        self
    }

    pub fn center(mut self, name: impl Into<String>) -> Self {
        self.raw.center = Some(name.into());
        self
    }

    pub fn quarter(mut self, id: impl Into<String>) -> Self {
        self.raw.quarter = Some(id.into());
        self
    }

    pub fn department(mut self, code: impl Into<String>) -> Self {
        self.raw.department = Some(code.into());
        self
    }

    pub fn family(mut self, code: impl Into<String>) -> Self {
        self.raw.family = Some(code.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.raw.search = Some(text.into());
        self
    }

    pub fn objectives<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.raw.objectives = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn goals<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.raw.goals = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn status(mut self, status: ActivityStatus) -> Self {
        self.raw.status = Some(status);
        self
    }

    /// Removes the network predicate (used when a role may not filter by network).
    pub fn clear_network(mut self) -> Self {
        self.raw.network = None;
        self
    }

    pub fn clear_center(mut self) -> Self {
        self.raw.center = None;
        self
    }

    pub fn build(self) -> Result<FilterSpec, FilterSpecError> {
        FilterSpec::try_from(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_spec_is_unset() {
        assert!(FilterSpec::all().is_unset());
        assert!(FilterSpec::builder().build().unwrap().is_unset());
    }

    #[test]
    fn builder_rejects_inverted_range() {
        let err = FilterSpec::builder()
            .date_range(date(2024, 6, 1), date(2024, 1, 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, FilterSpecError::InvertedDateRange { .. }));
    }

    #[test]
    fn builder_rejects_blank_codes_and_empty_sets() {
        assert_eq!(
            FilterSpec::builder().network("   ").build().unwrap_err(),
            FilterSpecError::BlankValue("network")
        );
        assert_eq!(
            FilterSpec::builder().goals(Vec::<String>::new()).build().unwrap_err(),
            FilterSpecError::EmptySet("goals")
        );
    }

    #[test]
    fn to_builder_creates_an_independent_spec() {
        let base = FilterSpec::builder().network("RED-A").build().unwrap();
        let narrowed = base.to_builder().quarter("2T").build().unwrap();

        assert_eq!(base.quarter(), None);
        assert_eq!(narrowed.network(), Some("RED-A"));
        assert_eq!(narrowed.quarter(), Some("2T"));
    }

    #[test]
    fn deserialization_validates() {
        let ok: FilterSpec = serde_json::from_str(r#"{"network":"RED-A","status":"error"}"#).unwrap();
        assert_eq!(ok.network(), Some("RED-A"));
        assert_eq!(ok.status(), Some(ActivityStatus::Error));

        let bad = serde_json::from_str::<FilterSpec>(r#"{"dateFrom":"2024-05-01","dateTo":"2024-01-01"}"#);
        assert!(bad.is_err());
    }
}
