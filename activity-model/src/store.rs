//! FILENAME: activity-model/src/store.rs
//! PURPOSE: The record store seam.
//! CONTEXT: Storage lives outside the reporting core. Implementations return
//! owned snapshots; no retry or network policy belongs here.

use crate::activity::Activity;
use crate::catalog::{
    Catalog, Center, CenterObjective, Department, Network, Objective, ProfessionalFamily,
    Quarter, SustainabilityGoal,
};

/// Read access to activities and classification lookups.
pub trait RecordStore {
    fn list_activities(&self) -> Vec<Activity>;
    fn list_networks(&self) -> Vec<Network>;
    fn list_centers(&self) -> Vec<Center>;
    fn list_departments(&self) -> Vec<Department>;
    fn list_families(&self) -> Vec<ProfessionalFamily>;
    fn list_objectives(&self) -> Vec<Objective>;
    fn list_center_objectives(&self) -> Vec<CenterObjective>;
    fn list_goals(&self) -> Vec<SustainabilityGoal>;

    fn list_quarters(&self) -> Vec<Quarter> {
        Vec::new()
    }

    /// Loads every lookup into a single catalog.
    fn load_catalog(&self) -> Catalog {
        Catalog {
            networks: self.list_networks(),
            centers: self.list_centers(),
            departments: self.list_departments(),
            families: self.list_families(),
            objectives: self.list_objectives(),
            center_objectives: self.list_center_objectives(),
            goals: self.list_goals(),
            quarters: self.list_quarters(),
        }
    }
}

/// A store backed by in-memory collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub activities: Vec<Activity>,
    pub catalog: Catalog,
}

impl InMemoryStore {
    pub fn new(activities: Vec<Activity>, catalog: Catalog) -> Self {
        InMemoryStore { activities, catalog }
    }
}

impl RecordStore for InMemoryStore {
    fn list_activities(&self) -> Vec<Activity> {
        self.activities.clone()
    }

    fn list_networks(&self) -> Vec<Network> {
        self.catalog.networks.clone()
    }

    fn list_centers(&self) -> Vec<Center> {
        self.catalog.centers.clone()
    }

    fn list_departments(&self) -> Vec<Department> {
        self.catalog.departments.clone()
    }

    fn list_families(&self) -> Vec<ProfessionalFamily> {
        self.catalog.families.clone()
    }

    fn list_objectives(&self) -> Vec<Objective> {
        self.catalog.objectives.clone()
    }

    fn list_center_objectives(&self) -> Vec<CenterObjective> {
        self.catalog.center_objectives.clone()
    }

    fn list_goals(&self) -> Vec<SustainabilityGoal> {
        self.catalog.goals.clone()
    }

    fn list_quarters(&self) -> Vec<Quarter> {
        self.catalog.quarters.clone()
    }

    fn load_catalog(&self) -> Catalog {
        self.catalog.clone()
    }
}
