//! FILENAME: report-engine/src/series.rs
//! PURPOSE: Chart data transformer - turns a filtered set into named series.
//! CONTEXT: One pure function per dimension. Zero-count buckets are dropped,
//! matching the aggregation engine's pruning, and percentages are taken over
//! the emitted values only.

use activity_model::{Activity, CodeSet, MAX_RATING, MIN_RATING};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::format::percentage;
use crate::resolve::Resolver;

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: u64,
    /// Share of the sum of all emitted values, 0-100.
    pub percentage: f64,
}

/// Dimensions a series can be built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartDimension {
    /// Students vs teachers.
    Participation,
    /// 1-5 rating histogram.
    Rating,
    Network,
    Center,
    Department,
    Objective,
}

/// Builds the series for `dimension`.
pub fn to_series(records: &[&Activity], dimension: ChartDimension, resolver: &Resolver) -> Vec<SeriesPoint> {
    match dimension {
        ChartDimension::Participation => participation_series(records),
        ChartDimension::Rating => rating_series(records),
        ChartDimension::Network => {
            single_valued_series(records, |a| &a.network_code, |code| resolver.network(code).to_string())
        }
        ChartDimension::Center => single_valued_series(records, |a| &a.center_name, |name| name.to_string()),
        ChartDimension::Department => multi_valued_series(
            records,
            |a| &a.department_codes,
            |_| true,
            |code| resolver.department(code).to_string(),
        ),
        ChartDimension::Objective => multi_valued_series(
            records,
            |a| &a.objective_ids,
            |id| resolver.is_active_objective(id),
            |id| resolver.objective(id).to_string(),
        ),
    }
}

// ============================================================================
// DIMENSIONS
// ============================================================================

pub fn participation_series(records: &[&Activity]) -> Vec<SeriesPoint> {
    let students: u64 = records.iter().map(|a| a.student_count as u64).sum();
    let teachers: u64 = records.iter().map(|a| a.teacher_count as u64).sum();
    finish(vec![("Estudiantes".to_string(), students), ("Profesores".to_string(), teachers)])
}

/// Histogram from 5 stars down to 1.
pub fn rating_series(records: &[&Activity]) -> Vec<SeriesPoint> {
    let mut counts = [0u64; MAX_RATING as usize + 1];
    for activity in records {
        if (MIN_RATING..=MAX_RATING).contains(&activity.rating) {
            counts[activity.rating as usize] += 1;
        }
    }

    let pairs = (MIN_RATING..=MAX_RATING)
        .rev()
        .map(|stars| (rating_label(stars), counts[stars as usize]))
        .collect();
    finish(pairs)
}

pub fn rating_label(stars: u8) -> String {
    if stars == 1 {
        "1 estrella".to_string()
    } else {
        format!("{} estrellas", stars)
    }
}

fn single_valued_series(
    records: &[&Activity],
    key_of: fn(&Activity) -> &String,
    name_of: impl Fn(&str) -> String,
) -> Vec<SeriesPoint> {
    let mut counts: FxHashMap<&str, u64> = FxHashMap::default();
    for &activity in records {
        *counts.entry(key_of(activity).as_str()).or_default() += 1;
    }
    finish(sorted_pairs(counts, name_of))
}

fn multi_valued_series(
    records: &[&Activity],
    select: fn(&Activity) -> &CodeSet,
    eligible: impl Fn(&str) -> bool,
    name_of: impl Fn(&str) -> String,
) -> Vec<SeriesPoint> {
    let mut counts: FxHashMap<&str, u64> = FxHashMap::default();
    for &activity in records {
        for code in select(activity).iter().filter(|c| eligible(*c)) {
            *counts.entry(code).or_default() += 1;
        }
    }
    finish(sorted_pairs(counts, name_of))
}

/// Resolves names and orders by value descending, then name.
fn sorted_pairs(counts: FxHashMap<&str, u64>, name_of: impl Fn(&str) -> String) -> Vec<(String, u64)> {
    let mut pairs: Vec<(String, u64)> = counts.into_iter().map(|(code, n)| (name_of(code), n)).collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

/// Drops zero buckets and attaches percentages over the remaining total.
fn finish(pairs: Vec<(String, u64)>) -> Vec<SeriesPoint> {
    let kept: Vec<(String, u64)> = pairs.into_iter().filter(|(_, v)| *v > 0).collect();
    let total: u64 = kept.iter().map(|(_, v)| v).sum();

    kept.into_iter()
        .filter_map(|(name, value)| {
            Some(SeriesPoint {
                percentage: percentage(value, total)?,
                name,
                value,
            })
        })
        .collect()
}

// ============================================================================
// DOCUMENT CHARTS
// ============================================================================

/// The charts laid out on the document's 2x2 grid, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Participation,
    Rating,
    Network,
    Department,
}

impl ChartKind {
    pub const GRID: [ChartKind; 4] = [
        ChartKind::Participation,
        ChartKind::Rating,
        ChartKind::Network,
        ChartKind::Department,
    ];

    pub fn surface_id(self) -> &'static str {
        match self {
            ChartKind::Participation => "chart-participation",
            ChartKind::Rating => "chart-rating",
            ChartKind::Network => "chart-network",
            ChartKind::Department => "chart-department",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Participation => "Participación",
            ChartKind::Rating => "Valoración de las actividades",
            ChartKind::Network => "Actividades por red",
            ChartKind::Department => "Actividades por departamento",
        }
    }

    pub fn dimension(self) -> ChartDimension {
        match self {
            ChartKind::Participation => ChartDimension::Participation,
            ChartKind::Rating => ChartDimension::Rating,
            ChartKind::Network => ChartDimension::Network,
            ChartKind::Department => ChartDimension::Department,
        }
    }
}
