use serde::{Deserialize, Serialize};

use crate::probe::hash::polynomial_hash;
use crate::probe::slot::{Severity, Slot};
use crate::probe::{Placement, ProbeError, ProbeTable};

/// Single slot array with linear probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearTable {
    slots: Vec<Slot>,
}

impl LinearTable {
    pub fn new(capacity: usize) -> Result<Self, ProbeError> {
        if capacity == 0 {
            return Err(ProbeError::ZeroCapacity);
        }
        Ok(Self {
            slots: vec![Slot::default(); capacity],
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn home(&self, key: &str) -> usize {
        polynomial_hash(key, self.slots.len())
    }
}

impl ProbeTable for LinearTable {
    fn tiers(&self) -> Vec<&[Slot]> {
        vec![self.slots.as_slice()]
    }

    fn insert(&self, key: &str) -> Result<(Self, Placement), ProbeError> {
        if self.is_at_ceiling() {
            return Err(self.full_error());
        }

        let capacity = self.slots.len();
        let home = self.home(key);
        for step in 0..capacity {
            let index = (home + step) % capacity;
            if !self.slots[index].is_empty() {
                continue;
            }

            let probes = step as u32 + 1;
            let offset = step as u32;
            let mut next = self.clone();
            next.slots[index] = Slot::occupied(key, probes, offset);
            log::debug!("{} -> slot {} (home {}, {} probes)", key, index, home, probes);
            return Ok((
                next,
                Placement {
                    key: key.to_string(),
                    tier: 0,
                    home,
                    slot: index,
                    probes,
                    offset,
                },
            ));
        }

        Err(self.full_error())
    }

    fn reset(&self) -> Self {
        Self {
            slots: vec![Slot::default(); self.slots.len()],
        }
    }

    fn severity(&self, slot: &Slot) -> Severity {
        Severity::from_probes(slot)
    }
}
