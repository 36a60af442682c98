//! Classification engine: assigns entries to (group, subgroup) targets.
//!
//! # Matching semantics
//!
//! Counterparty and description are normalized (trim + lowercase) before any
//! comparison. Active rules are evaluated in ascending priority (stable on
//! ties) across a fixed pass order; the first hit wins:
//!
//! 1. [`MatchPass::ExactCounterparty`]: exact-mode rules whose match text
//!    equals the counterparty
//! 2. [`MatchPass::ContainsCounterparty`]: contains-mode rules whose match
//!    text occurs inside the counterparty
//! 3. [`MatchPass::KeywordOnly`]: rules with keyword tokens, matched against
//!    the description alone
//!
//! In the first two passes, keyword tokens act as an extra gate when the
//! rule carries any. A rule whose kind filter is set only matches entries of
//! that kind. No hit in any pass leaves the entry unclassified for manual
//! review.

use uuid::Uuid;

use crate::domain::entry::{Entry, EntryKind};
use crate::domain::rule::{ClassificationRule, MatchMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPass {
    ExactCounterparty,
    ContainsCounterparty,
    KeywordOnly,
}

pub const PASS_ORDER: [MatchPass; 3] = [
    MatchPass::ExactCounterparty,
    MatchPass::ContainsCounterparty,
    MatchPass::KeywordOnly,
];

/// Resolves the (group, subgroup) target for one entry's fields.
///
/// A supplied `override_rule` wins unconditionally and skips evaluation.
pub fn classify(
    override_rule: Option<&ClassificationRule>,
    counterparty: &str,
    description: Option<&str>,
    kind: EntryKind,
    rules: &[ClassificationRule],
) -> (Option<Uuid>, Option<Uuid>) {
    if let Some(rule) = override_rule {
        return (Some(rule.group_id), Some(rule.subgroup_id));
    }

    let counterparty = normalize(counterparty);
    let description = description.map(normalize).unwrap_or_default();

    let mut candidates: Vec<&ClassificationRule> = rules.iter().filter(|r| r.active).collect();
    candidates.sort_by_key(|r| r.priority);

    for pass in PASS_ORDER {
        if let Some(rule) = run_pass(pass, &candidates, &counterparty, &description, kind) {
            return (Some(rule.group_id), Some(rule.subgroup_id));
        }
    }

    (None, None)
}

/// [`classify`] over an entry's own fields, with no override rule.
pub fn classify_entry(entry: &Entry, rules: &[ClassificationRule]) -> (Option<Uuid>, Option<Uuid>) {
    classify(
        None,
        &entry.counterparty,
        entry.description.as_deref(),
        entry.kind,
        rules,
    )
}

fn run_pass<'a>(
    pass: MatchPass,
    candidates: &[&'a ClassificationRule],
    counterparty: &str,
    description: &str,
    kind: EntryKind,
) -> Option<&'a ClassificationRule> {
    candidates.iter().copied().find(|rule| {
        if !kind_matches(rule, kind) {
            return false;
        }
        match pass {
            MatchPass::ExactCounterparty => {
                rule.mode == MatchMode::Exact
                    && normalize(&rule.match_text) == counterparty
                    && keyword_gate(rule, description)
            }
            MatchPass::ContainsCounterparty => {
                rule.mode == MatchMode::Contains
                    && counterparty.contains(&normalize(&rule.match_text))
                    && keyword_gate(rule, description)
            }
            MatchPass::KeywordOnly => {
                let tokens = rule.keyword_tokens();
                !tokens.is_empty() && tokens.iter().any(|t| description.contains(t.as_str()))
            }
        }
    })
}

fn kind_matches(rule: &ClassificationRule, kind: EntryKind) -> bool {
    rule.kind_filter.is_none() || rule.kind_filter == Some(kind)
}

/// Keywords restrict a counterparty match only when the rule carries any.
fn keyword_gate(rule: &ClassificationRule, description: &str) -> bool {
    let tokens = rule.keyword_tokens();
    tokens.is_empty() || tokens.iter().any(|t| description.contains(t.as_str()))
}

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}
