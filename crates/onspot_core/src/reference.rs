//! Static reference lists offered by the desk pickers.
//!
//! # Responsibility
//! - Hold the college, department and degree option lists.
//! - Filter options for type-to-search pickers.
//! - Report, advisory only, which form values fall outside the lists.
//!
//! # Invariants
//! - Registration validation never consults these lists.
//! - Filtering preserves configured option order.

use crate::model::registration::{FormField, RegistrationForm};
use serde::{Deserialize, Serialize};

/// Which picker an option list feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    College,
    Department,
    Degree,
}

impl OptionKind {
    /// The form field populated from this list.
    pub fn field(self) -> FormField {
        match self {
            Self::College => FormField::College,
            Self::Department => FormField::Dept,
            Self::Degree => FormField::Year,
        }
    }
}

/// Configured option lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceOptions {
    pub colleges: Vec<String>,
    pub departments: Vec<String>,
    pub degrees: Vec<String>,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        Self {
            colleges: to_owned_list(DEFAULT_COLLEGES),
            departments: to_owned_list(DEFAULT_DEPARTMENTS),
            degrees: to_owned_list(DEFAULT_DEGREES),
        }
    }
}

impl ReferenceOptions {
    /// Returns the full list for one picker.
    pub fn list(&self, kind: OptionKind) -> &[String] {
        match kind {
            OptionKind::College => &self.colleges,
            OptionKind::Department => &self.departments,
            OptionKind::Degree => &self.degrees,
        }
    }

    /// Returns options containing `query`, ignoring case and surrounding blanks.
    ///
    /// A blank query returns the whole list.
    pub fn matching(&self, kind: OptionKind, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        self.list(kind)
            .iter()
            .map(String::as_str)
            .filter(|option| needle.is_empty() || option.to_lowercase().contains(&needle))
            .collect()
    }

    /// Returns form fields whose non-blank value is not an exact list entry.
    pub fn unlisted_fields(&self, form: &RegistrationForm) -> Vec<FormField> {
        [OptionKind::College, OptionKind::Department, OptionKind::Degree]
            .into_iter()
            .filter_map(|kind| {
                let value = form.get(kind.field()).map(str::trim).unwrap_or("");
                let listed = self.list(kind).iter().any(|option| option == value);
                (!value.is_empty() && !listed).then_some(kind.field())
            })
            .collect()
    }
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

const DEFAULT_DEGREES: &[&str] = &[
    "B.Tech", "B.E", "B.Sc", "B.Com", "B.Arch", "M.Tech", "M.E", "MBA", "MCA", "Other",
];

const DEFAULT_DEPARTMENTS: &[&str] = &[
    "Artificial Intelligence and Data Science",
    "Biomedical Engineering",
    "Chemical Engineering",
    "Civil Engineering",
    "Computer Science and Business Systems",
    "Computer Science and Design",
    "Computer Science and Engineering",
    "CSE (Artificial Intelligence and Machine Learning)",
    "CSE (Cyber Security)",
    "Electrical and Electronics Engineering",
    "Electronics and Communication Engineering",
    "Mechanical Engineering",
    "Mechatronics Engineering",
    "Information Technology",
    "Other",
];

// Event deployments load their full regional list from config.
const DEFAULT_COLLEGES: &[&str] = &[
    "University Departments of Anna University Chennai - CEG Campus",
    "Thiagarajar College of Engineering",
    "Mepco Schlenk Engineering College (Autonomous)",
    "National Engineering College (Autonomous) Kovilpatti",
    "Government College of Engineering Tirunelveli",
    "Other",
];

#[cfg(test)]
mod tests {
    use super::{OptionKind, ReferenceOptions};
    use crate::model::registration::{FormField, RegistrationForm};

    #[test]
    fn matching_filters_case_insensitively_and_keeps_order() {
        let options = ReferenceOptions::default();
        let hits = options.matching(OptionKind::Department, "  cse ");
        assert_eq!(
            hits,
            vec![
                "CSE (Artificial Intelligence and Machine Learning)",
                "CSE (Cyber Security)",
            ]
        );
    }

    #[test]
    fn blank_query_returns_full_list() {
        let options = ReferenceOptions::default();
        assert_eq!(
            options.matching(OptionKind::Degree, "").len(),
            options.degrees.len()
        );
        assert!(options.matching(OptionKind::Degree, "phd").is_empty());
    }

    #[test]
    fn unlisted_fields_is_advisory_for_picker_fields_only() {
        let options = ReferenceOptions::default();
        let form = RegistrationForm::default()
            .with(FormField::Name, "Unlisted Name")
            .with(FormField::College, "Some Other Campus")
            .with(FormField::Dept, "Civil Engineering")
            .with(FormField::Year, "PhD");

        assert_eq!(
            options.unlisted_fields(&form),
            vec![FormField::College, FormField::Year]
        );
        assert!(options
            .unlisted_fields(&RegistrationForm::default())
            .is_empty());
    }
}
