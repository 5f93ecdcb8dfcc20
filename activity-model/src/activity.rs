//! FILENAME: activity-model/src/activity.rs
//! PURPOSE: The activity record and its multi-valued code sets.
//! CONTEXT: Activities are owned by the external CRUD layer. The reporting
//! core only reads them, so nothing here mutates a record after construction
//! apart from the builder-style `with_*` helpers used by importers and tests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Lowest and highest accepted rating.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

// ============================================================================
// CODE SET
// ============================================================================

/// An insertion-ordered set of codes or ids.
///
/// Most activities carry one to three departments/families/objectives, so the
/// values live inline until the fifth entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CodeSet(SmallVec<[String; 4]>);

impl CodeSet {
    pub fn new() -> Self {
        CodeSet(SmallVec::new())
    }

    /// Adds a code, keeping first-seen order. Returns false if it was already present.
    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if self.contains(&code) {
            return false;
        }
        self.0.push(code);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }

    /// True if any code is shared with `other`.
    pub fn intersects<'a, I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        other.into_iter().any(|code| self.contains(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for CodeSet {
    fn from(codes: Vec<String>) -> Self {
        codes.into_iter().collect()
    }
}

impl From<CodeSet> for Vec<String> {
    fn from(set: CodeSet) -> Self {
        set.0.into_vec()
    }
}

impl<S: Into<String>> FromIterator<S> for CodeSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = CodeSet::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CodeSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// ACTIVITY
// ============================================================================

/// A problem recorded while importing an activity from a bulk file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportIssue {
    pub field: String,
    pub message: String,
}

/// Reference to a file attached to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub name: String,
    pub url: String,
}

/// A logged outreach or training action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub network_code: String,
    pub center_name: String,
    pub quarter_id: String,
    #[serde(default)]
    pub department_codes: CodeSet,
    #[serde(default)]
    pub family_codes: CodeSet,
    #[serde(default)]
    pub student_group_ids: CodeSet,
    pub student_count: u32,
    pub teacher_count: u32,
    pub rating: u8,
    #[serde(default)]
    pub comments: String,
    pub creator_id: String,
    #[serde(default)]
    pub objective_ids: CodeSet,
    #[serde(default)]
    pub center_objective_ids: CodeSet,
    #[serde(default)]
    pub goal_ids: CodeSet,
    #[serde(default)]
    pub attachments: Option<Vec<AttachmentRef>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present only for records that went through a bulk import.
    #[serde(default)]
    pub import_errors: Option<Vec<ImportIssue>>,
    #[serde(default)]
    pub incomplete: bool,
}

impl Activity {
    /// Creates a minimal activity. Classification and participation are set
    /// with the `with_*` helpers.
    pub fn new(id: impl Into<String>, name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let now = Utc::now();
        Activity {
            id: id.into(),
            name: name.into(),
            location: String::new(),
            description: String::new(),
            start_date,
            end_date,
            network_code: String::new(),
            center_name: String::new(),
            quarter_id: String::new(),
            department_codes: CodeSet::new(),
            family_codes: CodeSet::new(),
            student_group_ids: CodeSet::new(),
            student_count: 0,
            teacher_count: 0,
            rating: MIN_RATING,
            comments: String::new(),
            creator_id: String::new(),
            objective_ids: CodeSet::new(),
            center_objective_ids: CodeSet::new(),
            goal_ids: CodeSet::new(),
            attachments: None,
            created_at: now,
            updated_at: now,
            import_errors: None,
            incomplete: false,
        }
    }

    pub fn with_classification(
        mut self,
        network_code: impl Into<String>,
        center_name: impl Into<String>,
        quarter_id: impl Into<String>,
    ) -> Self {
        self.network_code = network_code.into();
        self.center_name = center_name.into();
        self.quarter_id = quarter_id.into();
        self
    }

    pub fn with_participants(mut self, students: u32, teachers: u32) -> Self {
        self.student_count = students;
        self.teacher_count = teachers;
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_departments<S: Into<String>>(mut self, codes: impl IntoIterator<Item = S>) -> Self {
        self.department_codes = codes.into_iter().collect();
        self
    }

    pub fn with_families<S: Into<String>>(mut self, codes: impl IntoIterator<Item = S>) -> Self {
        self.family_codes = codes.into_iter().collect();
        self
    }

    pub fn with_objectives<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.objective_ids = ids.into_iter().collect();
        self
    }

    pub fn with_goals<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.goal_ids = ids.into_iter().collect();
        self
    }

    pub fn with_text(
        mut self,
        location: impl Into<String>,
        description: impl Into<String>,
        comments: impl Into<String>,
    ) -> Self {
        self.location = location.into();
        self.description = description.into();
        self.comments = comments.into();
        self
    }

    pub fn with_import_errors(mut self, errors: Vec<ImportIssue>) -> Self {
        self.import_errors = Some(errors);
        self
    }

    pub fn with_incomplete(mut self, incomplete: bool) -> Self {
        self.incomplete = incomplete;
        self
    }

    pub fn total_participants(&self) -> u64 {
        self.student_count as u64 + self.teacher_count as u64
    }

    /// True if the record came from an import that reported at least one problem.
    pub fn has_import_errors(&self) -> bool {
        self.import_errors.as_ref().map(|e| !e.is_empty()).unwrap_or(false)
    }

    /// True for a clean import: the error list exists, is empty, and the
    /// record is not flagged incomplete.
    pub fn is_clean_import(&self) -> bool {
        matches!(&self.import_errors, Some(errors) if errors.is_empty()) && !self.incomplete
    }

    /// Checks the record's shape invariants.
    pub fn validate(&self) -> Result<(), ActivityError> {
        if self.end_date < self.start_date {
            return Err(ActivityError::EndBeforeStart {
                id: self.id.clone(),
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ActivityError::RatingOutOfRange {
                id: self.id.clone(),
                rating: self.rating,
            });
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivityError {
    #[error("activity {id}: end date {end} is before start date {start}")]
    EndBeforeStart { id: String, start: NaiveDate, end: NaiveDate },

    #[error("activity {id}: rating {rating} is outside 1-5")]
    RatingOutOfRange { id: String, rating: u8 },
}
