//! FILENAME: report-engine/src/aggregation.rs
//! Aggregation Engine - hierarchical statistics over a filtered activity set.
//!
//! The tree is network ⊃ quarter ⊃ center. Every node is computed from the
//! records that fall inside it; nothing is summed up from children, so each
//! node's breakdowns stand on their own.
//!
//! Algorithm:
//! 1. Group records by network code (ordered by code)
//! 2. Within each network group by quarter, then by center
//! 3. For each group compute totals, the rating mean and the breakdowns
//! 4. Groups only exist for keys that occur, so empty nodes never appear

use std::collections::BTreeMap;

use activity_model::{Activity, CodeSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::format::{mean, percentage};
use crate::resolve::Resolver;

// ============================================================================
// OUTPUT TYPES
// ============================================================================

/// Level of a node in the aggregation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Network,
    Quarter,
    Center,
}

impl Scope {
    fn child(self) -> Option<Scope> {
        match self {
            Scope::Network => Some(Scope::Quarter),
            Scope::Quarter => Some(Scope::Center),
            Scope::Center => None,
        }
    }

    fn key_of(self, activity: &Activity) -> &str {
        match self {
            Scope::Network => &activity.network_code,
            Scope::Quarter => &activity.quarter_id,
            Scope::Center => &activity.center_name,
        }
    }
}

/// One bucket of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    /// Resolved display name (raw code when unknown).
    pub name: String,
    pub count: usize,
    /// Share of the node's records that have any value in this dimension.
    pub percentage_of_parent: f64,
    pub students: u64,
    pub teachers: u64,
}

/// Per-dimension distributions for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdowns {
    pub by_department: Vec<BreakdownEntry>,
    pub by_family: Vec<BreakdownEntry>,
    pub by_objective: Vec<BreakdownEntry>,
    pub by_goal: Vec<BreakdownEntry>,
}

/// Computed statistics for one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationNode {
    pub scope: Scope,
    /// Raw grouping key (network code, quarter id or center name).
    pub key: String,
    /// Display label for the key.
    pub label: String,
    pub total_actions: usize,
    pub total_students: u64,
    pub total_teachers: u64,
    /// None when the node has no actions.
    pub average_rating: Option<f64>,
    pub breakdowns: Breakdowns,
    pub children: Vec<AggregationNode>,
}

/// Grand totals over a whole filtered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub actions: usize,
    pub students: u64,
    pub teachers: u64,
    pub average_rating: Option<f64>,
}

impl Totals {
    pub fn participants(&self) -> u64 {
        self.students + self.teachers
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Builds the network ⊃ quarter ⊃ center tree for `records`.
pub fn aggregate(records: &[&Activity], resolver: &Resolver) -> Vec<AggregationNode> {
    build_level(records, Scope::Network, resolver)
}

/// Totals over every record, ignoring the hierarchy.
pub fn summarize(records: &[&Activity]) -> Totals {
    let (students, teachers, rating_sum) = sums(records);
    Totals {
        actions: records.len(),
        students,
        teachers,
        average_rating: mean(rating_sum, records.len() as u64),
    }
}

// ============================================================================
// TREE CONSTRUCTION
// ============================================================================

fn build_level(records: &[&Activity], scope: Scope, resolver: &Resolver) -> Vec<AggregationNode> {
    let mut groups: BTreeMap<&str, Vec<&Activity>> = BTreeMap::new();
    for &activity in records {
        groups.entry(scope.key_of(activity)).or_default().push(activity);
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let children = match scope.child() {
                Some(child) => build_level(&members, child, resolver),
                None => Vec::new(),
            };
            build_node(scope, key, &members, resolver, children)
        })
        .collect()
}

fn build_node(
    scope: Scope,
    key: &str,
    members: &[&Activity],
    resolver: &Resolver,
    children: Vec<AggregationNode>,
) -> AggregationNode {
    let label = match scope {
        Scope::Network => resolver.network(key).to_string(),
        Scope::Quarter => resolver.quarter(key).to_string(),
        Scope::Center => key.to_string(),
    };

    let totals = summarize(members);

    let breakdowns = Breakdowns {
        by_department: breakdown(members, |a| &a.department_codes, |_| true, |c| resolver.department(c).to_string()),
        by_family: breakdown(members, |a| &a.family_codes, |_| true, |c| resolver.family(c).to_string()),
        by_objective: breakdown(
            members,
            |a| &a.objective_ids,
            |id| resolver.is_active_objective(id),
            |id| resolver.objective(id).to_string(),
        ),
        by_goal: breakdown(
            members,
            |a| &a.goal_ids,
            |id| resolver.is_active_goal(id),
            |id| resolver.goal(id).to_string(),
        ),
    };

    AggregationNode {
        scope,
        key: key.to_string(),
        label,
        total_actions: totals.actions,
        total_students: totals.students,
        total_teachers: totals.teachers,
        average_rating: totals.average_rating,
        breakdowns,
        children,
    }
}

fn sums(records: &[&Activity]) -> (u64, u64, u64) {
    records.iter().fold((0, 0, 0), |(s, t, r), a| {
        (s + a.student_count as u64, t + a.teacher_count as u64, r + a.rating as u64)
    })
}

// ============================================================================
// BREAKDOWNS
// ============================================================================

#[derive(Default)]
struct Bucket {
    count: usize,
    students: u64,
    teachers: u64,
}

/// Counts records per value of one multi-valued dimension.
///
/// The percentage denominator is the number of records with at least one
/// eligible value in the dimension, not the node total.
fn breakdown<'r>(
    records: &[&'r Activity],
    select: fn(&Activity) -> &CodeSet,
    eligible: impl Fn(&str) -> bool,
    name_of: impl Fn(&str) -> String,
) -> Vec<BreakdownEntry> {
    let mut buckets: FxHashMap<&'r str, Bucket> = FxHashMap::default();
    let mut matching = 0u64;

    for &activity in records {
        let mut any = false;
        for code in select(activity).iter().filter(|c| eligible(*c)) {
            any = true;
            let bucket = buckets.entry(code).or_default();
            bucket.count += 1;
            bucket.students += activity.student_count as u64;
            bucket.teachers += activity.teacher_count as u64;
        }
        if any {
            matching += 1;
        }
    }

    let mut entries: Vec<BreakdownEntry> = buckets
        .into_iter()
        .filter_map(|(code, bucket)| {
            let share = percentage(bucket.count as u64, matching)?;
            Some(BreakdownEntry {
                name: name_of(code),
                count: bucket.count,
                percentage_of_parent: share,
                students: bucket.students,
                teachers: bucket.teachers,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    entries
}
