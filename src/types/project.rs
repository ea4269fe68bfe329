//! Project records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Artifact, Requirement, RequirementCategory};

/// Topic of an elicitation session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub description: String,
}

impl Topic {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Project {
    pub fn topic(&self) -> Topic {
        Topic::new(&self.name, &self.description)
    }

    pub fn requirements_in(&self, category: RequirementCategory) -> Vec<&Requirement> {
        self.requirements
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }
}

/// Row for project listings
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub requirement_count: usize,
    pub artifact_count: usize,
}
