//! Classification rule data structures.
//!
//! A rule targets one (group, subgroup) pair and matches on:
//! - `match_text`: the counterparty pattern, compared per [`MatchMode`]
//! - `keywords`: optional semicolon-separated tokens matched against the
//!   description (any token hit counts)
//! - `kind_filter`: optional restriction to one entry kind

use uuid::Uuid;

use crate::domain::entry::EntryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Contains,
}

impl MatchMode {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "exact" => Some(MatchMode::Exact),
            "contains" => Some(MatchMode::Contains),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Contains => "contains",
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRule {
    pub id: Uuid,
    pub match_text: String,
    pub mode: MatchMode,
    pub keywords: Option<String>,
    pub kind_filter: Option<EntryKind>,
    pub group_id: Uuid,
    pub subgroup_id: Uuid,
    pub priority: i32,
    pub active: bool,
}

impl ClassificationRule {
    /// Keyword tokens: split on `;`, trimmed, lowercased, blanks dropped.
    pub fn keyword_tokens(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .map(|raw| {
                raw.split(';')
                    .map(|token| token.trim().to_lowercase())
                    .filter(|token| !token.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule(keywords: Option<&str>) -> ClassificationRule {
        ClassificationRule {
            id: Uuid::new_v4(),
            match_text: "ABC LTDA".into(),
            mode: MatchMode::Exact,
            keywords: keywords.map(str::to_string),
            kind_filter: None,
            group_id: Uuid::new_v4(),
            subgroup_id: Uuid::new_v4(),
            priority: 1,
            active: true,
        }
    }

    #[test]
    fn mode_parse_and_display() {
        assert_eq!(MatchMode::parse("exact"), Some(MatchMode::Exact));
        assert_eq!(MatchMode::parse(" Contains "), Some(MatchMode::Contains));
        assert_eq!(MatchMode::parse("regex"), None);
        assert_eq!(MatchMode::Contains.to_string(), "contains");
    }

    #[test]
    fn keyword_tokens_split_and_normalize() {
        let rule = sample_rule(Some("Aluguel; CONDOMINIO ;boleto"));
        assert_eq!(rule.keyword_tokens(), vec!["aluguel", "condominio", "boleto"]);
    }

    #[test]
    fn keyword_tokens_drop_blanks() {
        let rule = sample_rule(Some(";; energia ;"));
        assert_eq!(rule.keyword_tokens(), vec!["energia"]);
    }

    #[test]
    fn keyword_tokens_empty_without_keywords() {
        assert!(sample_rule(None).keyword_tokens().is_empty());
        assert!(sample_rule(Some("  ;  ")).keyword_tokens().is_empty());
    }
}
