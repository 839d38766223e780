//! # Open-addressing probe tables
//!
//! Two variants share [`hash::polynomial_hash`] and the demo key generator:
//!
//! * [`LinearTable`]: one slot array, probing `h, h+1, …` with wrap-around;
//! * [`TieredTable`]: fixed tiers probed with interleaved offsets, offset 0
//!   in every tier before offset 1 in any tier.
//!
//! Insertion is pure: it returns a new table and leaves the receiver as it
//! was. Neither table supports deletion; [`ProbeTable::reset`] empties all
//! slots. Tables stop accepting keys one slot short of full.

pub mod compare;
pub mod hash;
pub mod keygen;
pub mod linear;
pub mod session;
pub mod slot;
pub mod stats;
pub mod tiered;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use compare::{Comparison, compare_at_fill};
pub use hash::{hash_per_tier, polynomial_hash};
pub use keygen::{KeySource, NAMES, ScriptedKeys, generate_key};
pub use linear::LinearTable;
pub use session::{ProbeSession, ProbeSnapshot};
pub use slot::{Severity, Slot, fill_target};
pub use stats::{ProbeStats, TableStats};
pub use tiered::TieredTable;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("table is full: {occupied} of {capacity} slots in use")]
    TableFull { occupied: usize, capacity: usize },
    #[error("capacity must be positive")]
    ZeroCapacity,
    #[error("a tiered table needs at least one tier")]
    NoTiers,
}

/// Where an inserted key ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub key: String,
    /// Tier index; always 0 for a linear table.
    pub tier: usize,
    /// Home position in the landing tier.
    pub home: usize,
    pub slot: usize,
    pub probes: u32,
    pub offset: u32,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome<T> {
    pub table: T,
    pub placements: Vec<Placement>,
    /// The batch ended early at the fill ceiling.
    pub stopped_full: bool,
}

impl<T> BatchOutcome<T> {
    pub fn total_probes(&self) -> u64 {
        self.placements.iter().map(|p| u64::from(p.probes)).sum()
    }
}

pub trait ProbeTable: Clone {
    /// Slot arrays in probe order; a linear table has exactly one.
    fn tiers(&self) -> Vec<&[Slot]>;

    fn insert(&self, key: &str) -> Result<(Self, Placement), ProbeError>;

    fn reset(&self) -> Self;

    fn severity(&self, slot: &Slot) -> Severity;

    fn capacity(&self) -> usize {
        self.tiers().iter().map(|tier| tier.len()).sum()
    }

    fn occupied(&self) -> usize {
        self.tiers()
            .iter()
            .flat_map(|tier| tier.iter())
            .filter(|slot| !slot.is_empty())
            .count()
    }

    /// Highest occupancy accepted. A full table would leave a wrap-around
    /// scan with nowhere to stop, so the last slot always stays free.
    fn ceiling(&self) -> usize {
        self.capacity().saturating_sub(1)
    }

    fn is_at_ceiling(&self) -> bool {
        self.occupied() >= self.ceiling()
    }

    fn full_error(&self) -> ProbeError {
        ProbeError::TableFull {
            occupied: self.occupied(),
            capacity: self.capacity(),
        }
    }

    /// Sequential single inserts of the given keys, stopping at the ceiling.
    fn insert_keys<I>(&self, keys: I) -> BatchOutcome<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut table = self.clone();
        let mut placements = Vec::new();
        let mut stopped_full = false;
        for key in keys {
            match table.insert(key.as_ref()) {
                Ok((next, placement)) => {
                    table = next;
                    placements.push(placement);
                }
                Err(err) => {
                    log::debug!("batch stopped after {} keys: {}", placements.len(), err);
                    stopped_full = true;
                    break;
                }
            }
        }
        BatchOutcome {
            table,
            placements,
            stopped_full,
        }
    }

    /// Inserts `count` generated keys, or fewer if the ceiling is reached.
    /// No key is drawn once the table is at its ceiling.
    fn insert_many<S>(&self, count: usize, source: &mut S) -> BatchOutcome<Self>
    where
        S: KeySource + ?Sized,
    {
        let mut outcome = BatchOutcome {
            table: self.clone(),
            placements: Vec::with_capacity(count),
            stopped_full: false,
        };
        for _ in 0..count {
            if outcome.table.is_at_ceiling() {
                outcome.stopped_full = true;
                break;
            }
            let key = generate_key(source);
            match outcome.table.insert(&key) {
                Ok((next, placement)) => {
                    outcome.table = next;
                    outcome.placements.push(placement);
                }
                Err(err) => {
                    log::warn!("insert of {} failed below the ceiling: {}", key, err);
                    outcome.stopped_full = true;
                    break;
                }
            }
        }
        outcome
    }
}
