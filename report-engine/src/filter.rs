//! FILENAME: report-engine/src/filter.rs
//! PURPOSE: Applies a FilterSpec to a collection of activities.
//! CONTEXT: Pure and order-preserving. The output borrows from the input, so
//! filtering twice or filtering a filtered view costs no clones.

use activity_model::{Activity, ActivityStatus, FilterSpec};

/// Returns the activities that satisfy every predicate in `spec`, in input order.
pub fn filter<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a Activity>
where
    I: IntoIterator<Item = &'a Activity>,
{
    if spec.is_unset() {
        return records.into_iter().collect();
    }

    // Lowercase the needle once instead of per record
    let needle = spec.search().map(str::to_lowercase);

    records
        .into_iter()
        .filter(|activity| matches_with_needle(activity, spec, needle.as_deref()))
        .collect()
}

/// Checks a single activity against the spec.
pub fn matches(activity: &Activity, spec: &FilterSpec) -> bool {
    let needle = spec.search().map(str::to_lowercase);
    matches_with_needle(activity, spec, needle.as_deref())
}

fn matches_with_needle(activity: &Activity, spec: &FilterSpec, needle: Option<&str>) -> bool {
    if let Some(from) = spec.date_from() {
        if activity.start_date < from {
            return false;
        }
    }
    if let Some(to) = spec.date_to() {
        if activity.end_date > to {
            return false;
        }
    }

    if let Some(network) = spec.network() {
        if activity.network_code != network {
            return false;
        }
    }
    if let Some(center) = spec.center() {
        if activity.center_name != center {
            return false;
        }
    }
    if let Some(quarter) = spec.quarter() {
        if activity.quarter_id != quarter {
            return false;
        }
    }

    if let Some(department) = spec.department() {
        if !activity.department_codes.contains(department) {
            return false;
        }
    }
    if let Some(family) = spec.family() {
        if !activity.family_codes.contains(family) {
            return false;
        }
    }

    if let Some(needle) = needle {
        if !contains_ignore_case(&activity.name, needle)
            && !contains_ignore_case(&activity.description, needle)
        {
            return false;
        }
    }

    if let Some(objectives) = spec.objectives() {
        if !activity.objective_ids.intersects(objectives) {
            return false;
        }
    }
    if let Some(goals) = spec.goals() {
        if !activity.goal_ids.intersects(goals) {
            return false;
        }
    }

    if let Some(status) = spec.status() {
        let passes = match status {
            ActivityStatus::Imported => activity.is_clean_import(),
            ActivityStatus::Error => activity.has_import_errors(),
            ActivityStatus::Incomplete => activity.incomplete,
        };
        if !passes {
            return false;
        }
    }

    true
}

/// `needle` must already be lowercase.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_model::ImportIssue;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Activity> {
        vec![
            Activity::new("1", "Taller de robótica", date(2024, 1, 10), date(2024, 1, 12))
                .with_classification("RED-A", "IES Norte", "1T")
                .with_departments(["INF"])
                .with_objectives(["o1"]),
            Activity::new("2", "Charla de empleo", date(2024, 2, 5), date(2024, 2, 5))
                .with_classification("RED-B", "IES Sur", "2T")
                .with_departments(["ADM", "INF"])
                .with_text("Aula 3", "Orientación ROBÓTICA aplicada", ""),
            Activity::new("3", "Visita a empresa", date(2024, 4, 1), date(2024, 4, 2))
                .with_classification("RED-A", "IES Sur", "3T")
                .with_families(["SAN"])
                .with_goals(["ods4"])
                .with_incomplete(true),
        ]
    }

    fn ids(records: &[&Activity]) -> Vec<String> {
        records.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn unset_spec_is_identity() {
        let records = sample();
        let out = filter(&records, &FilterSpec::all());
        assert_eq!(ids(&out), vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let spec = FilterSpec::builder().network("RED-A").build().unwrap();
        assert!(filter(&Vec::<Activity>::new(), &spec).is_empty());
    }

    #[test]
    fn predicates_are_conjunctive() {
        let records = sample();
        let spec = FilterSpec::builder().network("RED-A").center("IES Sur").build().unwrap();
        assert_eq!(ids(&filter(&records, &spec)), vec!["3"]);
    }

    #[test]
    fn date_range_checks_start_and_end() {
        let records = sample();
        let spec = FilterSpec::builder()
            .date_range(date(2024, 1, 11), date(2024, 3, 31))
            .build()
            .unwrap();
        // Activity 1 starts before the range
        assert_eq!(ids(&filter(&records, &spec)), vec!["2"]);
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let records = sample();
        let spec = FilterSpec::builder().search("Robótica").build().unwrap();
        assert_eq!(ids(&filter(&records, &spec)), vec!["1", "2"]);
    }

    #[test]
    fn department_matches_multi_valued_sets() {
        let records = sample();
        let spec = FilterSpec::builder().department("INF").build().unwrap();
        assert_eq!(ids(&filter(&records, &spec)), vec!["1", "2"]);
    }

    #[test]
    fn objective_and_goal_sets_match_any() {
        let records = sample();
        let spec = FilterSpec::builder().objectives(["o1", "o9"]).build().unwrap();
        assert_eq!(ids(&filter(&records, &spec)), vec!["1"]);

        let spec = FilterSpec::builder().goals(["ods4"]).build().unwrap();
        assert_eq!(ids(&filter(&records, &spec)), vec!["3"]);
    }

    #[test]
    fn status_predicates() {
        let mut records = sample();
        records[0] = records[0].clone().with_import_errors(Vec::new());
        records[1] = records[1].clone().with_import_errors(vec![ImportIssue {
            field: "fecha".to_string(),
            message: "formato".to_string(),
        }]);

        let by = |status| {
            let spec = FilterSpec::builder().status(status).build().unwrap();
            ids(&filter(&records, &spec))
        };
        assert_eq!(by(ActivityStatus::Imported), vec!["1"]);
        assert_eq!(by(ActivityStatus::Error), vec!["2"]);
        assert_eq!(by(ActivityStatus::Incomplete), vec!["3"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = sample();
        let spec = FilterSpec::builder().department("INF").search("a").build().unwrap();
        let once = filter(&records, &spec);
        let twice = filter(once.iter().copied(), &spec);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn matches_agrees_with_filter() {
        let records = sample();
        let spec = FilterSpec::builder().quarter("2T").build().unwrap();
        let via_filter = ids(&filter(&records, &spec));
        let via_matches: Vec<String> = records
            .iter()
            .filter(|a| matches(a, &spec))
            .map(|a| a.id.clone())
            .collect();
        assert_eq!(via_filter, via_matches);
    }
}
