//! FILENAME: app/src/context.rs
// PURPOSE: Who is generating a report, and for which course.
// CONTEXT: Passed by value into the pipeline and wizard; there is no global
// session state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Teacher,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContext {
    pub user: UserIdentity,
    pub active_course: Option<String>,
}

impl ReportContext {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        ReportContext {
            user: UserIdentity { name: name.into(), email: email.into(), role },
            active_course: None,
        }
    }

    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.active_course = Some(course.into());
        self
    }

    /// "Name (email)" as printed in the document header.
    pub fn generated_by(&self) -> String {
        if self.user.email.is_empty() {
            self.user.name.clone()
        } else {
            format!("{} ({})", self.user.name, self.user.email)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_by_includes_email() {
        let ctx = ReportContext::new("Ana Ruiz", "ana@centro.es", Role::Teacher).with_course("2024-2025");
        assert_eq!(ctx.generated_by(), "Ana Ruiz (ana@centro.es)");
        assert_eq!(ctx.active_course.as_deref(), Some("2024-2025"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
    }
}
