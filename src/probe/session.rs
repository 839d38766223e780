use serde::{Deserialize, Serialize};

use crate::probe::keygen::{KeySource, generate_key};
use crate::probe::slot::{Severity, Slot, fill_target};
use crate::probe::stats::{ProbeStats, TableStats};
use crate::probe::{Placement, ProbeError, ProbeTable};

/// One visualization instance over a probe table. `last` is presentation
/// state only: a single insert highlights its slot, a batch clears it.
#[derive(Debug, Clone)]
pub struct ProbeSession<T> {
    table: T,
    totals: ProbeStats,
    last: Option<Placement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    #[serde(flatten)]
    pub slot: Slot,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSnapshot {
    pub tiers: Vec<Vec<SlotView>>,
    pub stats: TableStats,
    pub last: Option<Placement>,
}

impl<T: ProbeTable> ProbeSession<T> {
    pub fn new(table: T) -> Self {
        Self {
            table: table.reset(),
            totals: ProbeStats::default(),
            last: None,
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn totals(&self) -> ProbeStats {
        self.totals
    }

    pub fn last(&self) -> Option<&Placement> {
        self.last.as_ref()
    }

    pub fn insert<S: KeySource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<&Placement, ProbeError> {
        if self.table.is_at_ceiling() {
            log::warn!("insert refused at {} of {} slots", self.table.occupied(), self.table.capacity());
            return Err(self.table.full_error());
        }
        let key = generate_key(source);
        let (table, placement) = self.table.insert(&key)?;
        self.table = table;
        self.totals.record(&placement);
        Ok(self.last.insert(placement))
    }

    /// Inserts up to `count` keys; returns how many were placed.
    pub fn insert_many<S: KeySource + ?Sized>(&mut self, count: usize, source: &mut S) -> usize {
        let outcome = self.table.insert_many(count, source);
        for placement in &outcome.placements {
            self.totals.record(placement);
        }
        if outcome.stopped_full {
            log::warn!(
                "batch of {} stopped after {} inserts at the fill ceiling",
                count,
                outcome.placements.len()
            );
        }
        self.table = outcome.table;
        self.last = None;
        outcome.placements.len()
    }

    /// Tops the table up to `ratio` of its capacity; a table already at or
    /// above the target is left alone.
    pub fn fill_to<S: KeySource + ?Sized>(&mut self, ratio: f64, source: &mut S) -> usize {
        let target = fill_target(self.table.capacity(), ratio);
        let missing = target.saturating_sub(self.table.occupied());
        if missing == 0 {
            return 0;
        }
        self.insert_many(missing, source)
    }

    pub fn reset(&mut self) {
        self.table = self.table.reset();
        self.totals = ProbeStats::default();
        self.last = None;
    }

    pub fn stats(&self) -> TableStats {
        TableStats::of(&self.table, &self.totals)
    }

    pub fn snapshot(&self) -> ProbeSnapshot {
        let tiers = self
            .table
            .tiers()
            .into_iter()
            .map(|tier| {
                tier.iter()
                    .map(|slot| SlotView {
                        slot: slot.clone(),
                        severity: self.table.severity(slot),
                    })
                    .collect()
            })
            .collect();
        ProbeSnapshot {
            tiers,
            stats: self.stats(),
            last: self.last.clone(),
        }
    }
}
