//! Reference data validation.
//!
//! Collects every problem found instead of stopping at the first, so an
//! operator can fix a whole taxonomy or rule set in one pass. Issues are
//! advisory strings; nothing here blocks the engine.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::rule::ClassificationRule;
use crate::domain::taxonomy::{Group, Subgroup};

pub const MAX_NAME_LEN: usize = 150;
pub const MAX_MATCH_TEXT_LEN: usize = 200;
pub const MAX_KEYWORDS_LEN: usize = 300;

pub fn validate_taxonomy(groups: &[Group], subgroups: &[Subgroup]) -> Vec<String> {
    let mut issues = Vec::new();

    for group in groups {
        check_name(&mut issues, "group", group.id, &group.name);
        if group.display_order < 0 {
            issues.push(format!(
                "group \"{}\": display order is negative",
                group.name
            ));
        }
    }

    let known_groups: HashMap<Uuid, &Group> = groups.iter().map(|g| (g.id, g)).collect();
    for subgroup in subgroups {
        check_name(&mut issues, "subgroup", subgroup.id, &subgroup.name);
        if subgroup.display_order < 0 {
            issues.push(format!(
                "subgroup \"{}\": display order is negative",
                subgroup.name
            ));
        }
        if !known_groups.contains_key(&subgroup.group_id) {
            issues.push(format!(
                "subgroup \"{}\": unknown group {}",
                subgroup.name, subgroup.group_id
            ));
        }
    }

    issues
}

pub fn validate_rules(
    rules: &[ClassificationRule],
    groups: &[Group],
    subgroups: &[Subgroup],
) -> Vec<String> {
    let mut issues = Vec::new();
    let known_groups: HashMap<Uuid, &Group> = groups.iter().map(|g| (g.id, g)).collect();
    let known_subgroups: HashMap<Uuid, &Subgroup> =
        subgroups.iter().map(|s| (s.id, s)).collect();

    for rule in rules {
        let label = rule_label(rule);

        if rule.match_text.trim().is_empty() {
            issues.push(format!("{label}: match text is blank"));
        } else if rule.match_text.chars().count() > MAX_MATCH_TEXT_LEN {
            issues.push(format!(
                "{label}: match text exceeds {MAX_MATCH_TEXT_LEN} characters"
            ));
        }

        if rule.priority < 0 {
            issues.push(format!("{label}: priority is negative"));
        }

        if let Some(keywords) = &rule.keywords {
            if keywords.chars().count() > MAX_KEYWORDS_LEN {
                issues.push(format!(
                    "{label}: keywords exceed {MAX_KEYWORDS_LEN} characters"
                ));
            }
            if rule.keyword_tokens().is_empty() {
                issues.push(format!("{label}: keywords contain no usable token"));
            }
        }

        check_rule_target(&mut issues, &label, rule, &known_groups, &known_subgroups);
    }

    issues
}

fn check_rule_target(
    issues: &mut Vec<String>,
    label: &str,
    rule: &ClassificationRule,
    known_groups: &HashMap<Uuid, &Group>,
    known_subgroups: &HashMap<Uuid, &Subgroup>,
) {
    let group = match known_groups.get(&rule.group_id) {
        Some(group) => {
            if !group.active {
                issues.push(format!("{label}: group \"{}\" is inactive", group.name));
            }
            if let Some(filter) = rule.kind_filter {
                if filter != group.kind {
                    issues.push(format!(
                        "{label}: kind filter {} contradicts group \"{}\" ({})",
                        filter, group.name, group.kind
                    ));
                }
            }
            Some(*group)
        }
        None => {
            issues.push(format!("{label}: unknown group {}", rule.group_id));
            None
        }
    };

    match known_subgroups.get(&rule.subgroup_id) {
        Some(subgroup) => {
            if !subgroup.active {
                issues.push(format!(
                    "{label}: subgroup \"{}\" is inactive",
                    subgroup.name
                ));
            }
            if let Some(group) = group {
                if subgroup.group_id != group.id {
                    issues.push(format!(
                        "{label}: subgroup \"{}\" does not belong to group \"{}\"",
                        subgroup.name, group.name
                    ));
                }
            }
        }
        None => issues.push(format!("{label}: unknown subgroup {}", rule.subgroup_id)),
    }
}

fn check_name(issues: &mut Vec<String>, what: &str, id: Uuid, name: &str) {
    if name.trim().is_empty() {
        issues.push(format!("{what} {id}: name is blank"));
    } else if name.chars().count() > MAX_NAME_LEN {
        issues.push(format!(
            "{what} \"{name}\": name exceeds {MAX_NAME_LEN} characters"
        ));
    }
}

fn rule_label(rule: &ClassificationRule) -> String {
    if rule.match_text.trim().is_empty() {
        format!("rule {}", rule.id)
    } else {
        format!("rule \"{}\"", rule.match_text)
    }
}
