//! Server-side search configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How fuzzy text is matched against names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyMatcherKind {
    /// Text compiled as a regular expression; plain text is a substring match.
    #[default]
    Pattern,
    /// Non-contiguous subsequence matching (skim). Opt-in only.
    Subsequence,
}

impl FromStr for FuzzyMatcherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pattern" => Ok(FuzzyMatcherKind::Pattern),
            "subsequence" | "skim" => Ok(FuzzyMatcherKind::Subsequence),
            other => Err(format!("unknown fuzzy matcher: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// When false the fuzzy search API is not served at all.
    pub fuzzy_enabled: bool,
    /// Records scanned per context by one fuzzy query.
    pub limit_query: usize,
    /// Names returned per context by one fuzzy query.
    pub limit_results: usize,
    /// Minimum text length (chars) before a fuzzy query returns anything.
    pub min_term_length: usize,
    pub fuzzy_matcher: FuzzyMatcherKind,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_enabled: true,
            limit_query: 20,
            limit_results: 100,
            min_term_length: 2,
            fuzzy_matcher: FuzzyMatcherKind::Pattern,
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

impl SearchConfig {
    /// Defaults overridden by `SCOUT_FUZZY_*` environment variables.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            fuzzy_enabled: env_bool("SCOUT_FUZZY_ENABLED").unwrap_or(d.fuzzy_enabled),
            limit_query: env_parse("SCOUT_FUZZY_LIMIT_QUERY").unwrap_or(d.limit_query),
            limit_results: env_parse("SCOUT_FUZZY_LIMIT_RESULTS").unwrap_or(d.limit_results),
            min_term_length: env_parse("SCOUT_FUZZY_MIN_TERM_LENGTH").unwrap_or(d.min_term_length),
            fuzzy_matcher: env_parse("SCOUT_FUZZY_MATCHER").unwrap_or(d.fuzzy_matcher),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let c: SearchConfig = serde_json::from_value(serde_json::json!({
            "fuzzy_enabled": false,
            "fuzzy_matcher": "subsequence"
        }))
        .unwrap();
        assert!(!c.fuzzy_enabled);
        assert_eq!(c.limit_query, 20);
        assert_eq!(c.limit_results, 100);
        assert_eq!(c.min_term_length, 2);
        assert_eq!(c.fuzzy_matcher, FuzzyMatcherKind::Subsequence);
    }

    #[test]
    fn matcher_kind_parses() {
        assert_eq!("skim".parse::<FuzzyMatcherKind>(), Ok(FuzzyMatcherKind::Subsequence));
        assert!("levenshtein".parse::<FuzzyMatcherKind>().is_err());
    }
}
