//! 弹性哈希：多层固定容量子表，按偏移交错探测。
//!
//! For `offset = 0, 1, …` every tier large enough to have that offset is
//! probed once at `(home[tier] + offset) mod capacity[tier]` before the offset
//! grows. Small tiers therefore soak up collisions early, which keeps the
//! offsets in the large tier short.
use serde::{Deserialize, Serialize};

use crate::probe::hash::hash_per_tier;
use crate::probe::slot::{Severity, Slot};
use crate::probe::{Placement, ProbeError, ProbeTable};

pub const DEMO_TIERS: [usize; 6] = [25, 12, 6, 4, 2, 1];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredTable {
    tiers: Vec<Vec<Slot>>,
}

impl TieredTable {
    pub fn new(capacities: &[usize]) -> Result<Self, ProbeError> {
        if capacities.is_empty() {
            return Err(ProbeError::NoTiers);
        }
        if capacities.contains(&0) {
            return Err(ProbeError::ZeroCapacity);
        }
        Ok(Self {
            tiers: capacities
                .iter()
                .map(|&capacity| vec![Slot::default(); capacity])
                .collect(),
        })
    }

    pub fn capacities(&self) -> Vec<usize> {
        self.tiers.iter().map(Vec::len).collect()
    }

    /// Offsets range over `0..max_offset_bound()`.
    pub fn max_offset_bound(&self) -> usize {
        self.tiers.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn tier(&self, index: usize) -> Option<&[Slot]> {
        self.tiers.get(index).map(Vec::as_slice)
    }
}

impl ProbeTable for TieredTable {
    fn tiers(&self) -> Vec<&[Slot]> {
        self.tiers.iter().map(Vec::as_slice).collect()
    }

    fn insert(&self, key: &str) -> Result<(Self, Placement), ProbeError> {
        if self.is_at_ceiling() {
            return Err(self.full_error());
        }

        let homes = hash_per_tier(key, &self.capacities());
        let mut probes = 0u32;
        for offset in 0..self.max_offset_bound() {
            for (tier, slots) in self.tiers.iter().enumerate() {
                let capacity = slots.len();
                if offset >= capacity {
                    continue;
                }
                let index = (homes[tier] + offset) % capacity;
                probes += 1;
                if !slots[index].is_empty() {
                    continue;
                }

                let mut next = self.clone();
                next.tiers[tier][index] = Slot::occupied(key, probes, offset as u32);
                log::debug!(
                    "{} -> tier {} slot {} (offset {}, {} probes)",
                    key,
                    tier,
                    index,
                    offset,
                    probes
                );
                return Ok((
                    next,
                    Placement {
                        key: key.to_string(),
                        tier,
                        home: homes[tier],
                        slot: index,
                        probes,
                        offset: offset as u32,
                    },
                ));
            }
        }

        Err(self.full_error())
    }

    fn reset(&self) -> Self {
        Self {
            tiers: self
                .tiers
                .iter()
                .map(|tier| vec![Slot::default(); tier.len()])
                .collect(),
        }
    }

    fn severity(&self, slot: &Slot) -> Severity {
        Severity::from_offset(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_zero_is_tried_in_every_tier_first() {
        let mut table = TieredTable::new(&DEMO_TIERS).unwrap();
        let mut placements = Vec::new();
        for _ in 0..12 {
            let (next, placement) = table.insert("alice7").unwrap();
            table = next;
            placements.push(placement);
        }

        let landed: Vec<_> = placements
            .iter()
            .map(|p| (p.tier, p.slot, p.offset, p.probes))
            .collect();
        assert_eq!(
            landed,
            vec![
                (0, 20, 0, 1),
                (1, 7, 0, 2),
                (2, 1, 0, 3),
                (3, 3, 0, 4),
                (4, 1, 0, 5),
                (5, 0, 0, 6),
                (0, 21, 1, 7),
                (1, 8, 1, 8),
                (2, 2, 1, 9),
                (3, 0, 1, 10),
                (4, 0, 1, 11),
                // the single-slot tier has no offset 1
                (0, 22, 2, 12),
            ]
        );
    }

    #[test]
    fn probe_count_includes_every_tier_visited() {
        let table = TieredTable::new(&DEMO_TIERS).unwrap();
        let (table, _) = table.insert("alice7").unwrap();
        // bob75 shares every home with alice7
        let (_, placement) = table.insert("bob75").unwrap();
        assert_eq!((placement.tier, placement.slot), (1, 7));
        assert_eq!((placement.offset, placement.probes), (0, 2));
    }

    #[test]
    fn construction_is_validated() {
        assert_eq!(TieredTable::new(&[]), Err(ProbeError::NoTiers));
        assert_eq!(TieredTable::new(&[4, 0]), Err(ProbeError::ZeroCapacity));
        let table = TieredTable::new(&DEMO_TIERS).unwrap();
        assert_eq!(table.capacity(), 50);
        assert_eq!(table.ceiling(), 49);
        assert_eq!(table.max_offset_bound(), 25);
    }

    #[test]
    fn fills_to_ceiling_then_refuses() {
        let table = TieredTable::new(&[3, 2]).unwrap();
        let outcome = table.insert_keys(["k"; 6]);
        assert_eq!(outcome.placements.len(), 4);
        assert!(outcome.stopped_full);
        assert_eq!(outcome.table.occupied(), 4);
        assert!(outcome.table.insert("k").is_err());
        assert_eq!(outcome.table.reset(), table);
    }
}
