//! Group and subgroup taxonomy for report lines.

use uuid::Uuid;

use crate::domain::entry::EntryKind;

/// Top-level report line. Groups are kind-scoped: every entry bucketed under
/// a group is expected to share its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub kind: EntryKind,
    pub display_order: i32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subgroup {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub display_order: i32,
    pub active: bool,
}

/// Active groups sorted by display order. The sort is stable, so groups with
/// equal order keep their input order.
pub fn active_groups_ordered(groups: &[Group]) -> Vec<&Group> {
    let mut active: Vec<&Group> = groups.iter().filter(|g| g.active).collect();
    active.sort_by_key(|g| g.display_order);
    active
}

/// Active subgroups of one group sorted by display order, stable on ties.
pub fn active_subgroups_ordered(subgroups: &[Subgroup], group_id: Uuid) -> Vec<&Subgroup> {
    let mut active: Vec<&Subgroup> = subgroups
        .iter()
        .filter(|s| s.active && s.group_id == group_id)
        .collect();
    active.sort_by_key(|s| s.display_order);
    active
}
