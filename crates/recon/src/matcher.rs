use std::collections::BTreeMap;

use wardpop_core::JoinStrategy;

use crate::normalize::NormalizedKey;

/// Lookup key produced by one join strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JoinKey {
    Triple(String, String, String),
    RegionWard(String, String),
}

/// Key for `key` under `strategy`, or `None` when a component the strategy
/// needs is empty.
pub fn join_key(strategy: JoinStrategy, key: &NormalizedKey) -> Option<JoinKey> {
    let present = |s: &String| !s.is_empty();
    match strategy {
        JoinStrategy::ExactTriple => (present(&key.region)
            && present(&key.district)
            && present(&key.ward))
        .then(|| JoinKey::Triple(key.region.clone(), key.district.clone(), key.ward.clone())),
        JoinStrategy::RegionWard => (present(&key.region) && present(&key.ward))
            .then(|| JoinKey::RegionWard(key.region.clone(), key.ward.clone())),
    }
}

/// Record index for one strategy. The first record to claim a key keeps it.
#[derive(Debug)]
pub struct KeyIndex {
    pub strategy: JoinStrategy,
    entries: BTreeMap<JoinKey, usize>,
}

impl KeyIndex {
    pub fn build(strategy: JoinStrategy, records: &[NormalizedKey]) -> Self {
        let mut entries = BTreeMap::new();
        for (i, key) in records.iter().enumerate() {
            if let Some(k) = join_key(strategy, key) {
                entries.entry(k).or_insert(i);
            }
        }
        Self { strategy, entries }
    }

    pub fn lookup(&self, key: &NormalizedKey) -> Option<usize> {
        join_key(self.strategy, key).and_then(|k| self.entries.get(&k).copied())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A unit's match: the record it takes and the strategy that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub record: usize,
    pub strategy: JoinStrategy,
}

#[derive(Debug)]
pub struct MatchOutput {
    /// One entry per unit, in unit order.
    pub assignments: Vec<Option<Assignment>>,
    /// Units still unmatched after each strategy, in strategy order.
    pub unmatched_after: Vec<usize>,
}

/// Attach records to units, trying `strategies` in order. A unit keeps the
/// first strategy that hits; records may be shared between units.
pub fn match_units(
    units: &[NormalizedKey],
    records: &[NormalizedKey],
    strategies: &[JoinStrategy],
) -> MatchOutput {
    let mut assignments: Vec<Option<Assignment>> = vec![None; units.len()];
    let mut unmatched_after = Vec::with_capacity(strategies.len());

    for &strategy in strategies {
        let index = KeyIndex::build(strategy, records);
        for (slot, key) in assignments.iter_mut().zip(units) {
            if slot.is_none() {
                *slot = index.lookup(key).map(|record| Assignment { record, strategy });
            }
        }
        unmatched_after.push(assignments.iter().filter(|a| a.is_none()).count());
    }

    MatchOutput { assignments, unmatched_after }
}
