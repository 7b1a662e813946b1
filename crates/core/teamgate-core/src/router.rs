//! Keyword team router
//!
//! First team (in catalog order) with a keyword occurring in the lower-cased
//! request wins; otherwise the catalog default.

use crate::types::TeamConfig;
use crate::{Result, TeamgateError};

/// Pick a team id for a free-text request
pub fn route<'a>(request: &str, teams: &'a [TeamConfig]) -> Result<&'a str> {
    if teams.is_empty() {
        return Err(TeamgateError::config("team catalog is empty"));
    }

    let default = teams
        .iter()
        .find(|t| t.is_default)
        .ok_or_else(|| TeamgateError::config("team catalog has no default team"))?;

    let lowered = request.to_lowercase();
    match teams.iter().find(|t| t.matches(&lowered)) {
        Some(team) => {
            tracing::debug!(team = %team.id, "keyword match");
            Ok(team.id.as_str())
        }
        None => Ok(default.id.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, keywords: &[&str], is_default: bool) -> TeamConfig {
        TeamConfig {
            id: id.to_string(),
            display_name: id.to_string(),
            description: String::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            agents: vec![],
            instructions: String::new(),
            is_default,
        }
    }

    fn catalog() -> Vec<TeamConfig> {
        vec![
            team("Research", &["research", "analyze", "data"], true),
            team("CreativeStudio", &["create", "design", "campaign"], false),
            team("SalesOps", &["sales", "client", "deal"], false),
        ]
    }

    #[test]
    fn test_keyword_match() {
        let teams = catalog();
        assert_eq!(
            route("please research the competitor landscape", &teams).unwrap(),
            "Research"
        );
        assert_eq!(route("Design a new LOGO", &teams).unwrap(), "CreativeStudio");
        assert_eq!(route("close the deal", &teams).unwrap(), "SalesOps");
    }

    #[test]
    fn test_no_match_falls_back_to_default() {
        let teams = catalog();
        assert_eq!(route("unrelated gibberish xyz", &teams).unwrap(), "Research");
        assert_eq!(route("", &teams).unwrap(), "Research");
    }

    #[test]
    fn test_first_match_wins_in_catalog_order() {
        let teams = catalog();
        // "create" and "sales" both match; CreativeStudio is earlier
        assert_eq!(
            route("create a sales deck", &teams).unwrap(),
            "CreativeStudio"
        );
    }

    #[test]
    fn test_substring_matching_is_not_word_bounded() {
        let teams = catalog();
        // "data" inside "database"
        assert_eq!(route("migrate the database", &teams).unwrap(), "Research");
        // "deal" inside "ideally"
        let teams = vec![
            team("Fallback", &[], true),
            team("SalesOps", &["deal"], false),
        ];
        assert_eq!(route("ideally tomorrow", &teams).unwrap(), "SalesOps");
    }

    #[test]
    fn test_missing_default_is_config_error() {
        let teams = vec![team("A", &["alpha"], false)];
        assert!(matches!(
            route("alpha", &teams),
            Err(TeamgateError::Config(_))
        ));
        assert!(matches!(
            route("beta", &teams),
            Err(TeamgateError::Config(_))
        ));
    }

    #[test]
    fn test_empty_catalog_is_config_error() {
        assert!(matches!(route("anything", &[]), Err(TeamgateError::Config(_))));
    }
}
