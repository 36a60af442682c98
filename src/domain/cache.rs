//! Cache key contract for rendered reports.
//!
//! Keys are `fluxo:{period}:{mode}` with the canonical mode token. Any
//! store that caches reports must drop every mode variant for a period
//! when that period's entries or opening balance change.

use std::collections::BTreeSet;

use crate::domain::entry::Entry;
use crate::domain::period::Period;
use crate::domain::report::ReportMode;

const MODES: [ReportMode; 3] = [ReportMode::All, ReportMode::Projected, ReportMode::Settled];

pub fn report_cache_key(period: Period, mode: ReportMode) -> String {
    format!("fluxo:{period}:{mode}")
}

/// Distinct periods the given entries land in, by effective date.
pub fn periods_touched(entries: &[Entry]) -> BTreeSet<Period> {
    entries
        .iter()
        .map(|entry| Period::from_date(entry.effective_date))
        .collect()
}

/// Every cache key made stale by a write to the given periods, one per
/// report mode.
pub fn invalidation_keys(periods: &BTreeSet<Period>) -> Vec<String> {
    periods
        .iter()
        .flat_map(|period| MODES.iter().map(|mode| report_cache_key(*period, *mode)))
        .collect()
}
