//! FILENAME: report-engine/src/resolve.rs
//! PURPOSE: Code → display-name resolution over the classification catalog.
//! CONTEXT: Every stage that shows a name (preview rows, aggregation labels,
//! chart series, both export formats) goes through one Resolver, so the same
//! code always renders the same way. Lookups are indexed once per run.

use activity_model::{Catalog, CodeSet};
use rustc_hash::FxHashMap;

/// An objective entry in the index: display name plus active flag.
#[derive(Debug, Clone, Copy)]
struct ObjectiveEntry<'a> {
    name: &'a str,
    is_active: bool,
}

/// Id-keyed view over a catalog.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    networks: FxHashMap<&'a str, &'a str>,
    departments: FxHashMap<&'a str, &'a str>,
    families: FxHashMap<&'a str, &'a str>,
    quarters: FxHashMap<&'a str, &'a str>,
    objectives: FxHashMap<&'a str, ObjectiveEntry<'a>>,
    center_objectives: FxHashMap<&'a str, ObjectiveEntry<'a>>,
    goals: FxHashMap<&'a str, ObjectiveEntry<'a>>,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut networks = FxHashMap::default();
        for n in &catalog.networks {
            networks.insert(n.code.as_str(), n.name.as_str());
        }

        let mut departments = FxHashMap::default();
        for d in &catalog.departments {
            departments.insert(d.code.as_str(), d.name.as_str());
        }

        let mut families = FxHashMap::default();
        for f in &catalog.families {
            families.insert(f.code.as_str(), f.name.as_str());
        }

        let mut quarters = FxHashMap::default();
        for q in &catalog.quarters {
            quarters.insert(q.id.as_str(), q.name.as_str());
        }

        let mut objectives = FxHashMap::default();
        for o in &catalog.objectives {
            objectives.insert(o.id.as_str(), ObjectiveEntry { name: &o.name, is_active: o.is_active });
        }

        let mut center_objectives = FxHashMap::default();
        for o in &catalog.center_objectives {
            center_objectives.insert(o.id.as_str(), ObjectiveEntry { name: &o.name, is_active: o.is_active });
        }

        let mut goals = FxHashMap::default();
        for g in &catalog.goals {
            goals.insert(g.id.as_str(), ObjectiveEntry { name: &g.name, is_active: g.is_active });
        }

        Resolver {
            networks,
            departments,
            families,
            quarters,
            objectives,
            center_objectives,
            goals,
        }
    }

    pub fn network<'s>(&self, code: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.networks.get(code).copied().unwrap_or(code)
    }

    pub fn department<'s>(&self, code: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.departments.get(code).copied().unwrap_or(code)
    }

    pub fn family<'s>(&self, code: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.families.get(code).copied().unwrap_or(code)
    }

    pub fn quarter<'s>(&self, id: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.quarters.get(id).copied().unwrap_or(id)
    }

    pub fn objective<'s>(&self, id: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.objectives.get(id).map(|o| o.name).unwrap_or(id)
    }

    pub fn center_objective<'s>(&self, id: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.center_objectives.get(id).map(|o| o.name).unwrap_or(id)
    }

    pub fn goal<'s>(&self, id: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.goals.get(id).map(|g| g.name).unwrap_or(id)
    }

    /// Unknown objective ids are treated as inactive.
    pub fn is_active_objective(&self, id: &str) -> bool {
        self.objectives.get(id).map(|o| o.is_active).unwrap_or(false)
    }

    pub fn is_active_goal(&self, id: &str) -> bool {
        self.goals.get(id).map(|g| g.is_active).unwrap_or(false)
    }

    pub fn departments(&self, codes: &CodeSet) -> Vec<String> {
        codes.iter().map(|c| self.department(c).to_string()).collect()
    }

    pub fn families(&self, codes: &CodeSet) -> Vec<String> {
        codes.iter().map(|c| self.family(c).to_string()).collect()
    }

    pub fn objectives(&self, ids: &CodeSet) -> Vec<String> {
        ids.iter().map(|id| self.objective(id).to_string()).collect()
    }
}
