//! Prompt text for elicitation, extraction and artifact generation
//!
//! All text is static apart from the interpolated topic, turn numbers and
//! requirements view, so identical inputs always yield identical prompts.

use crate::types::{ArtifactKind, Topic};

/// Prompts driving the question/answer session
pub struct ElicitationPrompts;

impl ElicitationPrompts {
    /// System instruction fixed for the whole session
    pub fn system(topic: &Topic, turn_bound: usize) -> String {
        format!(
            r#"You are an expert software requirements analyst. Your task is to gather comprehensive requirements for a software project through an interactive conversation.

Project: {name}
Description: {description}

Your goal is to ask exactly {bound} focused, insightful questions to understand:
- Key functional requirements (what the system should do)
- Non-functional requirements (performance, security, usability, etc.)
- Technical constraints (platforms, technologies, limitations)
- User needs and use cases

Ask one question at a time. Make each question clear, specific, and relevant to the project context. Build upon previous answers to ask progressively deeper questions.

After all {bound} questions are answered, you will extract and categorize the requirements."#,
            name = topic.name,
            description = topic.description,
            bound = turn_bound,
        )
    }

    /// Control turn requesting the first question
    pub fn first_question(topic: &Topic, turn_bound: usize) -> String {
        format!(
            r#"This is a requirements gathering session for: {}

Description: {}

Ask your first question (1 of {}) to gather important requirements. Be specific and relevant to this project."#,
            topic.name, topic.description, turn_bound
        )
    }

    /// Control turn requesting question `index`
    pub fn next_question(index: usize, turn_bound: usize) -> String {
        format!(
            "Based on the previous answer, ask your next question ({} of {}). Build upon what you've learned so far.",
            index, turn_bound
        )
    }

    /// Control turn requesting the categorized requirements object
    pub fn extraction() -> &'static str {
        r#"Based on the entire conversation above, extract all requirements and categorize them.

Return your response as a JSON object with this exact structure:
{
    "functional": [
        "requirement description 1",
        "requirement description 2"
    ],
    "non_functional": [
        "requirement description 1",
        "requirement description 2"
    ],
    "constraints": [
        "constraint description 1",
        "constraint description 2"
    ]
}

Ensure each requirement is:
- Clear and specific
- Actionable
- Derived from the conversation
- Properly categorized

Return ONLY the JSON object, no additional text."#
    }
}

/// Prompts for single-shot artifact generation
pub struct DesignPrompts;

impl DesignPrompts {
    pub fn system(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::CompleteDesign => {
                r#"You are an expert software architect and system designer. Your task is to create a comprehensive, professional system design based on the provided requirements.

Your design should be:
- Practical and implementable
- Well-structured and organized
- Technically sound
- Aligned with modern engineering practice
- Detailed enough for developers to implement

Format your response as a complete system design document in markdown."#
            }
            ArtifactKind::Architecture => {
                "You are an expert software architect. Create a detailed system architecture design based on the requirements provided."
            }
            ArtifactKind::DataModel => {
                "You are an expert database architect. Design a comprehensive data model based on the requirements."
            }
            ArtifactKind::ApiSpecification => {
                "You are an expert API designer. Create a comprehensive API specification based on the requirements."
            }
            ArtifactKind::TechnologyStack => {
                "You are an expert technology consultant. Recommend an appropriate technology stack based on the requirements."
            }
            ArtifactKind::ImplementationPlan => {
                "You are an expert project manager and technical lead. Create a practical implementation roadmap."
            }
            ArtifactKind::Diagrams => {
                r#"You are an expert system architect. Create comprehensive Mermaid diagrams to visualize the system design.

Mermaid is a markdown-based diagramming language. Use proper Mermaid syntax for all diagrams."#
            }
            ArtifactKind::ArchitectureRecommendations => {
                "You are a senior software architect with expertise in system design patterns, cloud architecture, and operational practice. Provide detailed, actionable architecture recommendations."
            }
            ArtifactKind::UserStories => Self::user_stories_system(),
        }
    }

    /// Opening line naming the deliverable
    pub fn lead(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::CompleteDesign => {
                "Create a comprehensive system design for the following project:"
            }
            ArtifactKind::Architecture => "Design a system architecture for:",
            ArtifactKind::DataModel => "Design a data model for:",
            ArtifactKind::ApiSpecification => "Design an API specification for:",
            ArtifactKind::TechnologyStack => "Recommend a technology stack for:",
            ArtifactKind::ImplementationPlan => "Create an implementation plan for:",
            ArtifactKind::Diagrams => "Create Mermaid diagrams for:",
            ArtifactKind::ArchitectureRecommendations => {
                "Provide comprehensive architecture recommendations for:"
            }
            ArtifactKind::UserStories => "Generate comprehensive user stories for:",
        }
    }

    /// Numbered items listed under "Provide:"
    pub fn deliverables(kind: ArtifactKind) -> &'static [&'static str] {
        match kind {
            ArtifactKind::Architecture => &[
                "High-level architecture overview",
                "System components and their responsibilities",
                "Component interactions and communication patterns",
                "Data flow between components",
                "Architecture diagram description (text/ASCII format)",
                "Design patterns to be used",
                "Scalability and performance considerations",
            ],
            ArtifactKind::DataModel => &[
                "Entity-Relationship diagram (text/ASCII format)",
                "Detailed table/collection schemas",
                "Relationships and foreign keys",
                "Indexes for performance",
                "Data types and constraints",
                "Sample data structures",
                "Data validation rules",
            ],
            ArtifactKind::ApiSpecification => &[
                "API endpoint listing with HTTP methods",
                "Request/response formats (JSON examples)",
                "Authentication and authorization mechanism",
                "Error handling and status codes",
                "Rate limiting and pagination strategies",
                "API versioning approach",
                "Example request/response for key endpoints",
            ],
            ArtifactKind::TechnologyStack => &[
                "Frontend technologies and frameworks",
                "Backend technologies and frameworks",
                "Database recommendations",
                "DevOps and deployment tools",
                "Third-party services and APIs",
                "Development tools and libraries",
                "Justification for each choice",
                "Alternative options considered",
            ],
            ArtifactKind::ImplementationPlan => &[
                "Implementation phases (MVP, Phase 2, Phase 3, etc.)",
                "Features/components for each phase",
                "Dependencies between components",
                "Key milestones",
                "Recommended team structure",
                "Estimated complexity for each phase (High/Medium/Low)",
                "Risks and mitigation strategies",
            ],
            ArtifactKind::Diagrams => &[
                "System Architecture Diagram (C4 or component diagram) showing main components, data flow and external systems",
                "Entity Relationship Diagram with entities, relationships, cardinality and key attributes",
                "Sequence Diagram for the main user flow",
                "Deployment Diagram showing infrastructure components",
            ],
            ArtifactKind::ArchitectureRecommendations => &[
                "ARCHITECTURE PATTERNS: architectural style, design patterns, justification",
                "LAYERING STRATEGY: presentation, business logic, data access, cross-cutting concerns",
                "SCALABILITY APPROACH: scaling strategy, caching, load balancing, database scaling",
                "RESILIENCE & RELIABILITY: fault tolerance, circuit breakers, retry policies, disaster recovery",
                "PERFORMANCE OPTIMIZATION: bottleneck mitigation, query optimization, caching layers, CDN usage",
                "SECURITY ARCHITECTURE: authentication, encryption at rest and in transit, API security",
                "INTEGRATION PATTERNS: external systems, API gateway, message queues, data synchronization",
                "MONITORING & OBSERVABILITY: logging, metrics, distributed tracing, alerting",
                "CLOUD ARCHITECTURE: provider and service recommendations, cost optimization",
                "TRADE-OFFS & DECISIONS: key decisions and the alternatives they were chosen over",
            ],
            ArtifactKind::CompleteDesign => &[
                "SYSTEM ARCHITECTURE: overview, components, interactions and data flow, text diagram",
                "TECHNOLOGY STACK: technologies per layer, justification, alternatives",
                "DATA MODEL: schema, entity relationships, key data structures, storage strategy",
                "API DESIGN: endpoints, request/response formats, auth approach, versioning",
                "COMPONENT SPECIFICATIONS: component breakdown, key modules, important algorithms",
                "SECURITY CONSIDERATIONS: security measures, data protection, authentication details",
                "DEPLOYMENT ARCHITECTURE: deployment model, infrastructure, scalability, monitoring",
                "IMPLEMENTATION ROADMAP: phases, milestones, dependencies between components",
            ],
            ArtifactKind::UserStories => &[
                "Clear user story format (As a... I want... So that...)",
                "Detailed acceptance criteria in Given/When/Then format",
                "Appropriate priority (High/Medium/Low)",
                "Story point estimates",
                "Epic grouping",
                "Technical notes where relevant",
            ],
        }
    }

    /// Trailing instruction on output format
    pub fn closing(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::CompleteDesign => {
                "Provide a well-structured, detailed design document that a development team can use to implement the system."
            }
            ArtifactKind::Architecture => "Format as a detailed architecture document.",
            ArtifactKind::DataModel => "Format as a detailed data model specification.",
            ArtifactKind::ApiSpecification => "Format as a detailed API specification document.",
            ArtifactKind::TechnologyStack => "Format as a detailed technology stack recommendation.",
            ArtifactKind::ImplementationPlan => "Format as a detailed implementation roadmap.",
            ArtifactKind::Diagrams => {
                "For each diagram provide a clear title and description and use proper Mermaid syntax. Label and separate each diagram clearly."
            }
            ArtifactKind::ArchitectureRecommendations => {
                "Provide specific, actionable recommendations with clear reasoning."
            }
            ArtifactKind::UserStories => {
                "Return ONLY a valid JSON array of user stories, no additional text."
            }
        }
    }

    fn user_stories_system() -> &'static str {
        r#"You are an expert Agile product owner and business analyst. Generate comprehensive user stories with detailed acceptance criteria.

Return your response as a JSON array of user stories. Each story must follow this exact structure:
{
    "id": "US-001",
    "title": "Short descriptive title",
    "user_story": "As a [role], I want [feature] so that [benefit]",
    "description": "Detailed description of what needs to be built",
    "priority": "High|Medium|Low",
    "story_points": "1|2|3|5|8|13",
    "epic": "Epic name this story belongs to",
    "acceptance_criteria": [
        "Given [context], when [action], then [outcome]",
        "Given [context], when [action], then [outcome]"
    ],
    "notes": "Additional technical notes or dependencies"
}

Ensure all user stories are:
- Written in proper user story format
- Have clear, testable acceptance criteria
- Prioritized appropriately
- Estimated with story points
- Grouped into logical epics"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_carries_bound() {
        let topic = Topic::new("Ward Tracker", "Bed management");
        let prompt = ElicitationPrompts::system(&topic, 5);
        assert!(prompt.contains("ask exactly 5 focused"));
        assert!(prompt.contains("Project: Ward Tracker"));
    }

    #[test]
    fn test_question_controls() {
        let topic = Topic::new("Ward Tracker", "Bed management");
        assert!(ElicitationPrompts::first_question(&topic, 8).contains("(1 of 8)"));
        assert!(ElicitationPrompts::next_question(3, 8).contains("(3 of 8)"));
    }

    #[test]
    fn test_every_kind_has_prompts() {
        for kind in ArtifactKind::ALL {
            assert!(!DesignPrompts::system(kind).is_empty());
            assert!(!DesignPrompts::lead(kind).is_empty());
            assert!(!DesignPrompts::deliverables(kind).is_empty());
            assert!(!DesignPrompts::closing(kind).is_empty());
        }
    }
}
