//! FILENAME: report-engine/src/rows.rs
//! PURPOSE: Display rows - an activity with every code resolved to a name.
//! CONTEXT: The wizard preview, the spreadsheet and the document table all
//! render from these rows, so a name can never differ between them.

use activity_model::Activity;
use serde::{Deserialize, Serialize};

use crate::format::format_date;
use crate::resolve::Resolver;

/// An activity ready for display. Multi-valued fields stay as lists; joining
/// them is up to each output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    pub id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub network: String,
    pub center: String,
    pub quarter: String,
    pub departments: Vec<String>,
    pub families: Vec<String>,
    /// Strategic objectives followed by center objectives.
    pub objectives: Vec<String>,
    pub students: u32,
    pub teachers: u32,
    pub total_participants: u64,
    pub rating: u8,
    pub comments: String,
}

impl ActivityRow {
    pub fn from_activity(activity: &Activity, resolver: &Resolver) -> Self {
        let mut objectives = resolver.objectives(&activity.objective_ids);
        objectives.extend(
            activity
                .center_objective_ids
                .iter()
                .map(|id| resolver.center_objective(id).to_string()),
        );

        ActivityRow {
            id: activity.id.clone(),
            name: activity.name.clone(),
            location: activity.location.clone(),
            description: activity.description.clone(),
            start_date: format_date(activity.start_date),
            end_date: format_date(activity.end_date),
            network: resolver.network(&activity.network_code).to_string(),
            center: activity.center_name.clone(),
            quarter: resolver.quarter(&activity.quarter_id).to_string(),
            departments: resolver.departments(&activity.department_codes),
            families: resolver.families(&activity.family_codes),
            objectives,
            students: activity.student_count,
            teachers: activity.teacher_count,
            total_participants: activity.total_participants(),
            rating: activity.rating,
            comments: activity.comments.clone(),
        }
    }
}

/// Resolves every record, keeping input order.
pub fn build_rows(records: &[&Activity], resolver: &Resolver) -> Vec<ActivityRow> {
    records
        .iter()
        .map(|activity| ActivityRow::from_activity(activity, resolver))
        .collect()
}
