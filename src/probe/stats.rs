use serde::{Deserialize, Serialize};

use crate::probe::{Placement, ProbeTable};

/// Running totals over every accepted insertion since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeStats {
    pub insertions: u64,
    pub total_probes: u64,
}

impl ProbeStats {
    pub fn record(&mut self, placement: &Placement) {
        self.insertions += 1;
        self.total_probes += u64::from(placement.probes);
    }

    pub fn average_probes(&self) -> f64 {
        if self.insertions == 0 {
            0.0
        } else {
            self.total_probes as f64 / self.insertions as f64
        }
    }
}

/// Figures derived from table contents plus the running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStats {
    pub capacity: usize,
    pub occupied: usize,
    pub load_factor: f64,
    pub average_probes: f64,
    pub worst_probes: u32,
    pub max_offset: u32,
}

impl TableStats {
    pub fn of<T: ProbeTable>(table: &T, totals: &ProbeStats) -> Self {
        let capacity = table.capacity();
        let occupied = table.occupied();
        let tiers = table.tiers();
        let filled = tiers
            .iter()
            .flat_map(|tier| tier.iter())
            .filter(|slot| !slot.is_empty());
        let (worst_probes, max_offset) = filled.fold((0, 0), |(probes, offset), slot| {
            (probes.max(slot.probes), offset.max(slot.offset))
        });
        Self {
            capacity,
            occupied,
            load_factor: if capacity == 0 {
                0.0
            } else {
                occupied as f64 / capacity as f64
            },
            average_probes: totals.average_probes(),
            worst_probes,
            max_offset,
        }
    }

    /// Load factor as a whole percentage, rounded.
    pub fn load_percent(&self) -> u32 {
        (self.load_factor * 100.0).round() as u32
    }
}
