//! Team configuration types

use serde::{Deserialize, Serialize};

/// Identifier of a team; also exposed as the model id on the chat API
pub type TeamId = String;

/// Tool name that marks an agent as search-enabled
pub const INTERNET_SEARCH_TOOL: &str = "internet_search";

/// One persona inside a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Short name, e.g. `Researcher`
    pub name: String,
    /// Job title used in the prompt header
    pub role: String,
    /// What the agent is trying to achieve
    pub goal: String,
    /// Background paragraph
    pub backstory: String,
    /// Capability flags such as `internet_search`
    #[serde(default)]
    pub tools: Vec<String>,
}

/// A statically configured team: persona prompts plus routing keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Stable id (`Research`, `SalesOps`, ...)
    pub id: TeamId,
    /// Human-facing name
    pub display_name: String,
    /// One-line description
    pub description: String,
    /// Lower-case substrings that route a request to this team
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Team members; the first one speaks for the team
    pub agents: Vec<AgentProfile>,
    /// Workflow instructions inserted into the prompt
    pub instructions: String,
    /// Fallback team when no keyword matches
    #[serde(default)]
    pub is_default: bool,
}

impl TeamConfig {
    /// The agent that answers on behalf of the team
    pub fn primary_agent(&self) -> Option<&AgentProfile> {
        self.agents.first()
    }

    /// Whether prompts for this team carry a web search block
    pub fn search_enabled(&self) -> bool {
        self.primary_agent()
            .map(|a| a.tools.iter().any(|t| t == INTERNET_SEARCH_TOOL))
            .unwrap_or(false)
    }

    /// Whether any keyword occurs in an already lower-cased request
    pub fn matches(&self, lowered_request: &str) -> bool {
        self.keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| lowered_request.contains(k.to_lowercase().as_str()))
    }
}
