//! Prompt registry (C12): named, argument-substituted prompt templates.

use crate::engine::codec::{PromptArgument, PromptDescriptor, PromptGetResult, PromptMessage, ToolResponseContent};
use crate::error::EngineError;
use std::collections::HashMap;

struct PromptEntry {
    descriptor: PromptDescriptor,
    template: &'static str,
}

/// Immutable registry of prompt templates, built once at startup.
pub struct PromptRegistry {
    prompts: HashMap<String, PromptEntry>,
}

impl PromptRegistry {
    pub fn with_reference_prompts() -> Self {
        let mut prompts = HashMap::new();

        prompts.insert(
            "summarize".to_string(),
            PromptEntry {
                descriptor: PromptDescriptor {
                    name: "summarize".to_string(),
                    description: "Summarize the given text in one paragraph.".to_string(),
                    arguments: vec![PromptArgument {
                        name: "text".to_string(),
                        description: "The text to summarize".to_string(),
                        required: true,
                    }],
                },
                template: "Summarize the following text in one paragraph:\n\n{text}",
            },
        );

        Self { prompts }
    }

    pub fn list(&self) -> Vec<PromptDescriptor> {
        let mut descriptors: Vec<_> = self.prompts.values().map(|p| p.descriptor.clone()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Render a prompt by name, substituting `{argument}` placeholders.
    /// Returns `None` when the name is unknown.
    pub fn get(
        &self,
        name: &str,
        arguments: &HashMap<String, String>,
    ) -> Option<Result<PromptGetResult, EngineError>> {
        let entry = self.prompts.get(name)?;

        for required in entry.descriptor.arguments.iter().filter(|a| a.required) {
            if !arguments.contains_key(&required.name) {
                return Some(Err(EngineError::InvalidParams(format!(
                    "missing required argument \"{}\"",
                    required.name
                ))));
            }
        }

        let mut rendered = entry.template.to_string();
        for (key, value) in arguments {
            rendered = rendered.replace(&format!("{{{key}}}"), value);
        }

        Some(Ok(PromptGetResult {
            description: entry.descriptor.description.clone(),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: ToolResponseContent::Text { text: rendered },
            }],
        }))
    }
}
