//! Requirement records and the structured extraction result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::utils::ParseWithDefault;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    Functional,
    NonFunctional,
    Constraint,
}

impl RequirementCategory {
    pub const ALL: [RequirementCategory; 3] =
        [Self::Functional, Self::NonFunctional, Self::Constraint];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Functional => "functional",
            Self::NonFunctional => "non_functional",
            Self::Constraint => "constraint",
        }
    }

    /// Heading used when requirements are rendered for a prompt
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Functional => "FUNCTIONAL REQUIREMENTS",
            Self::NonFunctional => "NON-FUNCTIONAL REQUIREMENTS",
            Self::Constraint => "CONSTRAINTS",
        }
    }
}

impl std::fmt::Display for RequirementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParseWithDefault for RequirementCategory {
    fn type_name() -> &'static str {
        "RequirementCategory"
    }

    fn default_value() -> Self {
        Self::Functional
    }

    fn try_parse(s: &str) -> Option<Self> {
        match s {
            "functional" => Some(Self::Functional),
            "non_functional" => Some(Self::NonFunctional),
            "constraint" => Some(Self::Constraint),
            _ => None,
        }
    }
}

/// A stored requirement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    pub id: i64,
    pub project_id: i64,
    pub category: RequirementCategory,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Decoded extraction output. All three lists are always present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequirementSet {
    #[serde(default)]
    pub functional: Vec<String>,
    #[serde(default)]
    pub non_functional: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl RequirementSet {
    pub fn is_empty(&self) -> bool {
        self.functional.is_empty() && self.non_functional.is_empty() && self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.functional.len() + self.non_functional.len() + self.constraints.len()
    }

    /// Flatten into (category, description) pairs in category order
    pub fn entries(&self) -> impl Iterator<Item = (RequirementCategory, &str)> {
        let functional = self
            .functional
            .iter()
            .map(|d| (RequirementCategory::Functional, d.as_str()));
        let non_functional = self
            .non_functional
            .iter()
            .map(|d| (RequirementCategory::NonFunctional, d.as_str()));
        let constraints = self
            .constraints
            .iter()
            .map(|d| (RequirementCategory::Constraint, d.as_str()));
        functional.chain(non_functional).chain(constraints)
    }
}

/// Render requirements grouped by category, numbered within each group.
///
/// Groups without entries are omitted.
pub fn format_requirements(requirements: &[Requirement]) -> String {
    let mut sections = Vec::new();

    for category in RequirementCategory::ALL {
        let items: Vec<String> = requirements
            .iter()
            .filter(|r| r.category == category)
            .enumerate()
            .map(|(i, r)| format!("{}. {}", i + 1, r.description))
            .collect();

        if !items.is_empty() {
            sections.push(format!("{}:\n{}", category.heading(), items.join("\n")));
        }
    }

    sections.join("\n\n")
}
