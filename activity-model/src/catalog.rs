//! FILENAME: activity-model/src/catalog.rs
//! PURPOSE: Read-only classification lookups (networks, centers, departments...).
//! CONTEXT: The catalog is loaded once from the record store and handed to the
//! resolver in report-engine, which indexes it by code.

use serde::{Deserialize, Serialize};

// ============================================================================
// SIMPLE LOOKUPS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub code: String,
    pub name: String,
}

/// A school or training center. Centers are keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Center {
    pub name: String,
    /// Code of the network the center belongs to.
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalFamily {
    pub code: String,
    pub name: String,
}

/// An academic quarter ("1T", "2T"...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quarter {
    pub id: String,
    pub name: String,
}

// ============================================================================
// OBJECTIVES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A network-wide strategic objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub priority: Priority,
    pub is_active: bool,
}

/// An objective defined by a single center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterObjective {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub priority: Priority,
    pub is_active: bool,
    pub center: String,
}

/// A sustainable development goal (ODS).
pub type SustainabilityGoal = Objective;

// ============================================================================
// CATALOG
// ============================================================================

/// All classification lookups needed by one report run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub networks: Vec<Network>,
    #[serde(default)]
    pub centers: Vec<Center>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub families: Vec<ProfessionalFamily>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub center_objectives: Vec<CenterObjective>,
    #[serde(default)]
    pub goals: Vec<SustainabilityGoal>,
    #[serde(default)]
    pub quarters: Vec<Quarter>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }
}
