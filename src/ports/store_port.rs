//! Entry, taxonomy, rule and balance store port trait.
//!
//! Every load returns a snapshot; the engine never mutates what it reads.
//! Write serialization is the caller's responsibility.

use crate::domain::balance::OpeningBalance;
use crate::domain::entry::Entry;
use crate::domain::error::FluxoError;
use crate::domain::period::Period;
use crate::domain::rule::ClassificationRule;
use crate::domain::taxonomy::{Group, Subgroup};

pub trait StorePort {
    fn load_entries(&self) -> Result<Vec<Entry>, FluxoError>;
    fn load_groups(&self) -> Result<Vec<Group>, FluxoError>;
    fn load_subgroups(&self) -> Result<Vec<Subgroup>, FluxoError>;
    fn load_rules(&self) -> Result<Vec<ClassificationRule>, FluxoError>;

    /// The opening balance on record for a period, if any. Callers treat a
    /// missing record as zero.
    fn opening_balance(&self, period: Period) -> Result<Option<OpeningBalance>, FluxoError>;

    fn append_entries(&self, entries: &[Entry]) -> Result<(), FluxoError>;

    /// Replaces the whole entry set, e.g. after a reclassification run.
    fn replace_entries(&self, entries: &[Entry]) -> Result<(), FluxoError>;
}
