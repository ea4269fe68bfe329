//! Generated design artifacts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::utils::ParseWithDefault;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Architecture,
    DataModel,
    ApiSpecification,
    TechnologyStack,
    ImplementationPlan,
    Diagrams,
    ArchitectureRecommendations,
    CompleteDesign,
    UserStories,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 9] = [
        Self::Architecture,
        Self::DataModel,
        Self::ApiSpecification,
        Self::TechnologyStack,
        Self::ImplementationPlan,
        Self::Diagrams,
        Self::ArchitectureRecommendations,
        Self::CompleteDesign,
        Self::UserStories,
    ];

    /// Kinds produced by a full run. `CompleteDesign` is a separate
    /// single-call alternative and is not part of it.
    pub const INDIVIDUAL: [ArtifactKind; 8] = [
        Self::Architecture,
        Self::DataModel,
        Self::ApiSpecification,
        Self::TechnologyStack,
        Self::ImplementationPlan,
        Self::Diagrams,
        Self::ArchitectureRecommendations,
        Self::UserStories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::DataModel => "data_model",
            Self::ApiSpecification => "api_specification",
            Self::TechnologyStack => "technology_stack",
            Self::ImplementationPlan => "implementation_plan",
            Self::Diagrams => "diagrams",
            Self::ArchitectureRecommendations => "architecture_recommendations",
            Self::CompleteDesign => "complete_design",
            Self::UserStories => "user_stories",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Architecture => "System Architecture",
            Self::DataModel => "Data Model",
            Self::ApiSpecification => "API Specification",
            Self::TechnologyStack => "Technology Stack",
            Self::ImplementationPlan => "Implementation Plan",
            Self::Diagrams => "Architecture Diagrams",
            Self::ArchitectureRecommendations => "Architecture Recommendations",
            Self::CompleteDesign => "Complete System Design",
            Self::UserStories => "User Stories",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| {
            let valid: Vec<_> = Self::ALL.iter().map(|k| k.as_str()).collect();
            format!(
                "unknown artifact kind '{}' (expected one of: {})",
                s,
                valid.join(", ")
            )
        })
    }
}

impl ParseWithDefault for ArtifactKind {
    fn type_name() -> &'static str {
        "ArtifactKind"
    }

    fn default_value() -> Self {
        Self::CompleteDesign
    }

    fn try_parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// A stored artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    pub id: i64,
    pub project_id: i64,
    pub kind: ArtifactKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "api_specification".parse::<ArtifactKind>().unwrap(),
            ArtifactKind::ApiSpecification
        );
        let err = "blueprint".parse::<ArtifactKind>().unwrap_err();
        assert!(err.contains("data_model"));
    }

    #[test]
    fn test_individual_excludes_complete_design() {
        assert!(!ArtifactKind::INDIVIDUAL.contains(&ArtifactKind::CompleteDesign));
        assert_eq!(ArtifactKind::INDIVIDUAL.len() + 1, ArtifactKind::ALL.len());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for kind in ArtifactKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.as_str());
        }
    }
}
