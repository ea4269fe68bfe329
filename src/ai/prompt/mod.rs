//! Prompt Builder System
//!
//! Standardized prompt construction for LLM interactions.
//! Sections render in insertion order, so identical inputs always produce
//! identical prompt text.

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Labeled single-line values, e.g. `PROJECT: name`
    Context(Vec<(String, String)>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Numbered list introduced by a lead line
    Numbered { lead: String, items: Vec<String> },
    /// Custom section
    Custom(String),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a context item; consecutive items share one block
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        if let Some(PromptSection::Context(items)) = self.sections.last_mut() {
            items.push((key.to_string(), value.to_string()));
        } else {
            self.sections.push(PromptSection::Context(vec![(
                key.to_string(),
                value.to_string(),
            )]));
        }
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add a numbered list
    pub fn numbered(mut self, lead: &str, items: &[&str]) -> Self {
        self.sections.push(PromptSection::Numbered {
            lead: lead.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Add custom section
    pub fn custom(mut self, content: &str) -> Self {
        self.sections
            .push(PromptSection::Custom(content.to_string()));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Context(items) => {
                    for (key, value) in items {
                        prompt.push_str(&format!("{}: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("{}:\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Numbered { lead, items } => {
                    prompt.push_str(&lead);
                    prompt.push('\n');
                    for (i, item) in items.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Custom(content) => {
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_items_share_block() {
        let prompt = PromptBuilder::new()
            .context_item("PROJECT", "Ward Tracker")
            .context_item("DESCRIPTION", "Bed management")
            .text("body")
            .build();

        assert_eq!(
            prompt,
            "PROJECT: Ward Tracker\nDESCRIPTION: Bed management\n\nbody"
        );
    }

    #[test]
    fn test_numbered_section() {
        let prompt = PromptBuilder::new()
            .numbered("Provide:", &["Overview", "Components"])
            .build();

        assert_eq!(prompt, "Provide:\n1. Overview\n2. Components");
    }

    #[test]
    fn test_section_header() {
        let prompt = PromptBuilder::new().section("NOTES", "none").build();
        assert_eq!(prompt, "NOTES:\nnone");
    }

    #[test]
    fn test_build_is_deterministic() {
        let build = || {
            PromptBuilder::new()
                .context_item("A", "1")
                .context_item("B", "2")
                .custom("end")
                .build()
        };
        assert_eq!(build(), build());
    }
}
