//! Side-by-side fill of a linear and a tiered table with one key sequence.
use serde::{Deserialize, Serialize};

use crate::probe::keygen::{KeySource, generate_key};
use crate::probe::slot::fill_target;
use crate::probe::stats::{ProbeStats, TableStats};
use crate::probe::{LinearTable, ProbeError, ProbeTable, TieredTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub keys: Vec<String>,
    pub linear: TableStats,
    pub tiered: TableStats,
}

impl Comparison {
    /// Worst displacement from the home slot in the linear table.
    pub fn linear_worst_offset(&self) -> u32 {
        self.linear.max_offset
    }

    pub fn tiered_worst_offset(&self) -> u32 {
        self.tiered.max_offset
    }
}

/// Fills both tables to `ratio` of their own capacity with the same keys.
/// The shorter fill uses a prefix of the key list.
pub fn compare_at_fill<S: KeySource + ?Sized>(
    linear_capacity: usize,
    tiers: &[usize],
    ratio: f64,
    source: &mut S,
) -> Result<Comparison, ProbeError> {
    let linear = LinearTable::new(linear_capacity)?;
    let tiered = TieredTable::new(tiers)?;

    let linear_target = fill_target(linear.capacity(), ratio).min(linear.ceiling());
    let tiered_target = fill_target(tiered.capacity(), ratio).min(tiered.ceiling());
    let keys: Vec<String> = (0..linear_target.max(tiered_target))
        .map(|_| generate_key(source))
        .collect();

    let linear = fill(&linear, &keys[..linear_target]);
    let tiered = fill(&tiered, &keys[..tiered_target]);
    log::info!(
        "at {:.0}% fill: linear worst offset {}, tiered worst offset {}",
        ratio * 100.0,
        linear.max_offset,
        tiered.max_offset
    );
    Ok(Comparison {
        keys,
        linear,
        tiered,
    })
}

fn fill<T: ProbeTable>(table: &T, keys: &[String]) -> TableStats {
    let outcome = table.insert_keys(keys);
    let mut totals = ProbeStats::default();
    for placement in &outcome.placements {
        totals.record(placement);
    }
    TableStats::of(&outcome.table, &totals)
}
