//! Template engine for prompt generation

use crate::{Result, TeamgateError};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Name under which [`TEAM_PROMPT_TEMPLATE`] is registered
pub const TEAM_PROMPT: &str = "team_prompt";

/// Template engine wrapper
///
/// Output is plain text for a model, so HTML escaping is off.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        Self { handlebars }
    }

    /// Engine with the built-in team prompt registered
    pub fn with_builtin_templates() -> Result<Self> {
        let mut engine = Self::new();
        engine.register_template(TEAM_PROMPT, TEAM_PROMPT_TEMPLATE)?;
        Ok(engine)
    }

    /// Render a template with data
    pub fn render(
        &self,
        template: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| TeamgateError::template(e.to_string()))
    }

    /// Register a template
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| TeamgateError::template(e.to_string()))?;
        Ok(())
    }

    /// Render a registered template
    pub fn render_named(
        &self,
        name: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| TeamgateError::template(e.to_string()))
    }

    /// Whether a template is registered under `name`
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Prompt sent on behalf of a team's primary agent
pub const TEAM_PROMPT_TEMPLATE: &str = r#"You are {{agent_name}}, a {{agent_role}} representing the {{team_name}}.

Your goal: {{agent_goal}}
Your background: {{agent_backstory}}

TEAM WORKFLOW INSTRUCTIONS:
{{instructions}}

You are working with a team of experts including other specialists, but you should provide a comprehensive response that represents the collective expertise of the entire team following your team's specific workflow.

Conversation history:
{{history}}

Current question: {{question}}

IMPORTANT: Structure your response with your reasoning process wrapped in <thinking> tags, followed by your final answer:

<thinking>
[Your analysis process here - follow your team's workflow instructions, break down the question, consider different perspectives from your team expertise, evaluate options, research findings if applicable]
</thinking>

[Your final comprehensive response here]

Please provide a detailed, professional response to the current question, taking into account the conversation history. Show your reasoning process in the thinking section, then provide a clear final answer following your team's specific workflow approach.{{#if search_block}}

Available research data:
{{search_block}}

Use this research to inform your response.{{/if}}"#;
