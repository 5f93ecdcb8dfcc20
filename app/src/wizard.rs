//! FILENAME: app/src/wizard.rs
// PURPOSE: The report wizard as an immutable step machine.
// CONTEXT: Each transition returns a new wizard; nothing is edited in place.
// The preview uses the same rows the spreadsheet writes.

use activity_model::{Activity, FilterSpec, OutputFormat, ReportConfig, ReportType};
use report_engine::{build_rows, ActivityRow, Resolver};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::Role;
use crate::export::matching;
use crate::log_debug;
use crate::logging::CAT_WIZARD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    SelectType,
    ConfigureFilters,
    Preview,
    SelectFormat,
    Generate,
}

impl WizardStep {
    pub const ORDER: [WizardStep; 5] = [
        WizardStep::SelectType,
        WizardStep::ConfigureFilters,
        WizardStep::Preview,
        WizardStep::SelectFormat,
        WizardStep::Generate,
    ];

    fn index(self) -> usize {
        match self {
            WizardStep::SelectType => 0,
            WizardStep::ConfigureFilters => 1,
            WizardStep::Preview => 2,
            WizardStep::SelectFormat => 3,
            WizardStep::Generate => 4,
        }
    }

    pub fn next(self) -> Option<WizardStep> {
        WizardStep::ORDER.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| WizardStep::ORDER[i])
    }
}

/// Filter fields a user can set in the ConfigureFilters step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Dates,
    Network,
    Center,
    Quarter,
    Department,
    Family,
    Search,
    Objectives,
    Goals,
    Status,
}

const ALL_FIELDS: [FilterField; 10] = [
    FilterField::Dates,
    FilterField::Network,
    FilterField::Center,
    FilterField::Quarter,
    FilterField::Department,
    FilterField::Family,
    FilterField::Search,
    FilterField::Objectives,
    FilterField::Goals,
    FilterField::Status,
];

const MANAGER_FIELDS: [FilterField; 9] = [
    FilterField::Dates,
    FilterField::Center,
    FilterField::Quarter,
    FilterField::Department,
    FilterField::Family,
    FilterField::Search,
    FilterField::Objectives,
    FilterField::Goals,
    FilterField::Status,
];

const TEACHER_FIELDS: [FilterField; 6] = [
    FilterField::Dates,
    FilterField::Quarter,
    FilterField::Department,
    FilterField::Family,
    FilterField::Search,
    FilterField::Status,
];

/// Filter fields shown to `role`, in display order.
pub fn visible_filters(role: Role) -> &'static [FilterField] {
    match role {
        Role::Admin => &ALL_FIELDS,
        Role::Manager => &MANAGER_FIELDS,
        Role::Teacher => &TEACHER_FIELDS,
    }
}

/// Fields that are set on `spec`.
pub fn set_fields(spec: &FilterSpec) -> Vec<FilterField> {
    let mut fields = Vec::new();
    if spec.date_from().is_some() || spec.date_to().is_some() {
        fields.push(FilterField::Dates);
    }
    let flags = [
        (spec.network().is_some(), FilterField::Network),
        (spec.center().is_some(), FilterField::Center),
        (spec.quarter().is_some(), FilterField::Quarter),
        (spec.department().is_some(), FilterField::Department),
        (spec.family().is_some(), FilterField::Family),
        (spec.search().is_some(), FilterField::Search),
        (spec.objectives().is_some(), FilterField::Objectives),
        (spec.goals().is_some(), FilterField::Goals),
        (spec.status().is_some(), FilterField::Status),
    ];
    fields.extend(flags.iter().filter(|(set, _)| *set).map(|(_, field)| *field));
    fields
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Choose a report type first")]
    MissingType,

    #[error("Choose an output format first")]
    MissingFormat,

    #[error("Filter {0:?} is not available for this role")]
    HiddenFilter(FilterField),

    #[error("Wizard is at {0:?}, not at the final step")]
    NotFinished(WizardStep),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWizard {
    role: Role,
    step: WizardStep,
    report_type: Option<ReportType>,
    filter_spec: FilterSpec,
    output_format: Option<OutputFormat>,
}

impl ReportWizard {
    pub fn new(role: Role) -> Self {
        ReportWizard {
            role,
            step: WizardStep::SelectType,
            report_type: None,
            filter_spec: FilterSpec::all(),
            output_format: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn report_type(&self) -> Option<ReportType> {
        self.report_type
    }

    pub fn filter_spec(&self) -> &FilterSpec {
        &self.filter_spec
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output_format
    }

    pub fn visible_filters(&self) -> &'static [FilterField] {
        visible_filters(self.role)
    }

    pub fn with_type(&self, report_type: ReportType) -> Self {
        ReportWizard { report_type: Some(report_type), ..self.clone() }
    }

    /// Replaces the filter. Rejected when it sets a field the role can't see.
    pub fn with_filter(&self, spec: FilterSpec) -> Result<Self, WizardError> {
        let visible = self.visible_filters();
        if let Some(hidden) = set_fields(&spec).into_iter().find(|f| !visible.contains(f)) {
            return Err(WizardError::HiddenFilter(hidden));
        }
        Ok(ReportWizard { filter_spec: spec, ..self.clone() })
    }

    pub fn with_format(&self, format: OutputFormat) -> Self {
        ReportWizard { output_format: Some(format), ..self.clone() }
    }

    /// Moves one step forward. Stays put at the last step.
    pub fn next(&self) -> Result<Self, WizardError> {
        match self.step {
            WizardStep::SelectType if self.report_type.is_none() => return Err(WizardError::MissingType),
            WizardStep::SelectFormat if self.output_format.is_none() => return Err(WizardError::MissingFormat),
            _ => {}
        }
        let step = self.step.next().unwrap_or(self.step);
        log_debug!(CAT_WIZARD, "{:?} -> {:?}", self.step, step);
        Ok(ReportWizard { step, ..self.clone() })
    }

    /// Moves one step back. Stays put at the first step.
    pub fn back(&self) -> Self {
        let step = self.step.previous().unwrap_or(self.step);
        log_debug!(CAT_WIZARD, "{:?} <- {:?}", step, self.step);
        ReportWizard { step, ..self.clone() }
    }

    /// Resolved rows for the current filter, skipping the same invalid
    /// records the exports skip.
    pub fn preview(&self, activities: &[Activity], resolver: &Resolver) -> Vec<ActivityRow> {
        let matched = matching(activities, &self.filter_spec);
        build_rows(&matched, resolver)
    }

    /// The finished configuration, available at the Generate step.
    pub fn finish(&self) -> Result<ReportConfig, WizardError> {
        if self.step != WizardStep::Generate {
            return Err(WizardError::NotFinished(self.step));
        }
        let report_type = self.report_type.ok_or(WizardError::MissingType)?;
        let output_format = self.output_format.ok_or(WizardError::MissingFormat)?;
        Ok(ReportConfig::new(report_type, self.filter_spec.clone(), output_format))
    }
}
