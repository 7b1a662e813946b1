//! Team catalog
//!
//! The fixed set of teams the gateway exposes, validated once at startup.

use crate::router;
use crate::types::{AgentProfile, TeamConfig, INTERNET_SEARCH_TOOL};
use crate::{Result, TeamgateError};
use std::collections::HashSet;

/// Workflow text for teams without their own instructions
pub const STANDARD_INSTRUCTIONS: &str = "Follow standard workflow procedures for your team.";

const RESEARCH_INSTRUCTIONS: &str = "\
You are a Research Team Agent whose job is to efficiently gather, analyse and summarise high-impact insights for business decisions.
Begin by breaking down the user's query into separate research sub-tasks, then execute those tasks in parallel (e.g., data gathering, competitor benchmarking, trend identification).
For each sub-task produce a short reasoning trace that shows your thought process.
Then aggregate the results into a concise, actionable summary, emphasising what a generic zero-shot model would miss (for example: source gaps, contradictory evidence, recommendation risks).";

const CREATIVE_INSTRUCTIONS: &str = "\
You are a Creative Studio Agent operating in a structured chain of work.
Step 1: Ideation - generate at least 5 distinct creative directions based on the user query.
Step 2: Drafting - select the most promising direction and build a detailed draft.
Step 3: Review and polish - refine the draft for clarity, style, and brand consistency.";

const SALES_INSTRUCTIONS: &str = "\
You are a Sales Operations Agent tasked with routing the user's scenario to the appropriate sub-team and then producing the output.
First: analyse the user's query to decide whether it fits \"New Business / Upsell\" or \"Renewal / Retention\".
Then hand off to the chosen sub-team workflow and generate the final deliverable (proposal, strategy, etc.).";

/// Validated, ordered set of teams
#[derive(Debug, Clone)]
pub struct TeamCatalog {
    teams: Vec<TeamConfig>,
}

impl TeamCatalog {
    /// Validate and wrap a list of teams.
    ///
    /// Rejects an empty list, duplicate ids, teams without agents, and any
    /// count of default teams other than one.
    pub fn new(teams: Vec<TeamConfig>) -> Result<Self> {
        if teams.is_empty() {
            return Err(TeamgateError::config("team catalog is empty"));
        }

        let mut seen = HashSet::new();
        for team in &teams {
            if team.id.trim().is_empty() {
                return Err(TeamgateError::config("team id must not be empty"));
            }
            if !seen.insert(team.id.as_str()) {
                return Err(TeamgateError::config(format!(
                    "duplicate team id '{}'",
                    team.id
                )));
            }
            if team.agents.is_empty() {
                return Err(TeamgateError::config(format!(
                    "team '{}' has no agents",
                    team.id
                )));
            }
        }

        match teams.iter().filter(|t| t.is_default).count() {
            1 => Ok(Self { teams }),
            0 => Err(TeamgateError::config("team catalog has no default team")),
            n => Err(TeamgateError::config(format!(
                "team catalog has {} default teams, expected exactly one",
                n
            ))),
        }
    }

    /// The five built-in teams; Research is the default
    pub fn builtin() -> Self {
        Self {
            teams: builtin_teams(),
        }
    }

    /// Look up a team by id
    pub fn get(&self, id: &str) -> Option<&TeamConfig> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// All teams in routing order
    pub fn teams(&self) -> &[TeamConfig] {
        &self.teams
    }

    /// Team ids in routing order
    pub fn ids(&self) -> Vec<&str> {
        self.teams.iter().map(|t| t.id.as_str()).collect()
    }

    /// The fallback team
    pub fn default_team(&self) -> &TeamConfig {
        // construction guarantees exactly one default
        self.teams
            .iter()
            .find(|t| t.is_default)
            .unwrap_or(&self.teams[0])
    }

    /// Route free text to a team in this catalog
    pub fn route(&self, request: &str) -> &TeamConfig {
        router::route(request, &self.teams)
            .ok()
            .and_then(|id| self.get(id))
            .unwrap_or_else(|| self.default_team())
    }
}

fn agent(name: &str, role: &str, goal: &str, backstory: &str, search: bool) -> AgentProfile {
    AgentProfile {
        name: name.to_string(),
        role: role.to_string(),
        goal: goal.to_string(),
        backstory: backstory.to_string(),
        tools: if search {
            vec![INTERNET_SEARCH_TOOL.to_string()]
        } else {
            Vec::new()
        },
    }
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn builtin_teams() -> Vec<TeamConfig> {
    vec![
        TeamConfig {
            id: "Research".to_string(),
            display_name: "Research Team".to_string(),
            description: "Multi-agent research team with internet search capabilities".to_string(),
            keywords: keywords(&["research", "analyze", "study", "investigate", "data", "report"]),
            agents: vec![
                agent(
                    "Researcher",
                    "Senior Research Analyst",
                    "Conduct thorough research on given topics",
                    "Expert researcher with access to web search and analysis tools",
                    true,
                ),
                agent(
                    "Analyst",
                    "Data Analyst",
                    "Analyze and synthesize research findings",
                    "Skilled at turning raw data into actionable insights",
                    false,
                ),
                agent(
                    "Writer",
                    "Content Writer",
                    "Create comprehensive reports from research",
                    "Expert at creating clear, engaging content from complex data",
                    false,
                ),
            ],
            instructions: RESEARCH_INSTRUCTIONS.to_string(),
            is_default: true,
        },
        TeamConfig {
            id: "coding-team".to_string(),
            display_name: "Software Development Team".to_string(),
            description: "Team of coding specialists for development tasks".to_string(),
            keywords: Vec::new(),
            agents: vec![
                agent(
                    "Architect",
                    "Solution Architect",
                    "Design system architecture and technical solutions",
                    "Senior architect with expertise in system design",
                    false,
                ),
                agent(
                    "Developer",
                    "Senior Developer",
                    "Implement code solutions and best practices",
                    "Full-stack developer with years of experience",
                    false,
                ),
                agent(
                    "Tester",
                    "QA Engineer",
                    "Test and validate code quality",
                    "Quality assurance expert focused on robust testing",
                    false,
                ),
            ],
            instructions: STANDARD_INSTRUCTIONS.to_string(),
            is_default: false,
        },
        TeamConfig {
            id: "business-team".to_string(),
            display_name: "Business Analysis Team".to_string(),
            description: "Business-focused team for strategy and analysis".to_string(),
            keywords: Vec::new(),
            agents: vec![
                agent(
                    "BusinessAnalyst",
                    "Senior Business Analyst",
                    "Analyze business requirements and opportunities",
                    "Expert in business process analysis and strategy",
                    true,
                ),
                agent(
                    "FinancialAnalyst",
                    "Financial Analyst",
                    "Provide financial analysis and projections",
                    "Financial expert with market analysis skills",
                    false,
                ),
                agent(
                    "Strategist",
                    "Business Strategist",
                    "Develop strategic recommendations",
                    "Strategic planning expert with industry knowledge",
                    false,
                ),
            ],
            instructions: STANDARD_INSTRUCTIONS.to_string(),
            is_default: false,
        },
        TeamConfig {
            id: "CreativeStudio".to_string(),
            display_name: "Creative Studio".to_string(),
            description: "Creative team for content generation and marketing".to_string(),
            keywords: keywords(&["create", "design", "campaign", "content", "marketing", "brand"]),
            agents: vec![
                agent(
                    "CreativeDirector",
                    "Creative Director",
                    "Lead creative vision and strategy",
                    "Experienced creative leader with brand expertise",
                    false,
                ),
                agent(
                    "Copywriter",
                    "Senior Copywriter",
                    "Create compelling marketing copy",
                    "Expert copywriter with marketing background",
                    false,
                ),
                agent(
                    "ContentStrategist",
                    "Content Strategist",
                    "Plan and optimize content strategy",
                    "Content marketing expert with analytics focus",
                    true,
                ),
            ],
            instructions: CREATIVE_INSTRUCTIONS.to_string(),
            is_default: false,
        },
        TeamConfig {
            id: "SalesOps".to_string(),
            display_name: "Sales Operations".to_string(),
            description:
                "Sales operations team for proposals, renewals, and strategic sales support"
                    .to_string(),
            keywords: keywords(&["sales", "proposal", "client", "revenue", "deal", "renewal"]),
            agents: vec![
                agent(
                    "SalesRouter",
                    "Sales Operations Router",
                    "Route sales scenarios to appropriate specialists",
                    "Expert at analyzing sales scenarios and directing to the right team member",
                    false,
                ),
                agent(
                    "NewBusinessSpecialist",
                    "New Business Specialist",
                    "Handle new business development and upsell opportunities",
                    "Experienced in crafting compelling proposals and identifying growth opportunities",
                    true,
                ),
                agent(
                    "RenewalSpecialist",
                    "Renewal and Retention Specialist",
                    "Manage renewals and customer retention strategies",
                    "Expert at customer relationship management and renewal optimization",
                    false,
                ),
            ],
            instructions: SALES_INSTRUCTIONS.to_string(),
            is_default: false,
        },
    ]
}
