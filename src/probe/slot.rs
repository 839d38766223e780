use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub key: Option<String>,
    /// Slots examined by the insertion that filled this slot; 0 when empty.
    pub probes: u32,
    /// Distance from the key's home position within its tier.
    pub offset: u32,
}

impl Slot {
    pub fn occupied(key: impl Into<String>, probes: u32, offset: u32) -> Self {
        debug_assert!(probes >= 1);
        Self {
            key: Some(key.into()),
            probes,
            offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none()
    }

    /// Probes beyond the first one.
    pub fn collisions(&self) -> u32 {
        self.probes.saturating_sub(1)
    }
}

/// Coarse "how far from ideal" bucket used to colour a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Empty,
    Direct,
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    /// Linear tables: one probe is ideal, two is a single collision.
    pub fn from_probes(slot: &Slot) -> Self {
        if slot.is_empty() {
            return Severity::Empty;
        }
        match slot.probes {
            0 | 1 => Severity::Direct,
            2 => Severity::Minor,
            3..=4 => Severity::Moderate,
            _ => Severity::Severe,
        }
    }

    /// Tiered tables: probe counts include one probe per tier, so rate the
    /// offset instead.
    pub fn from_offset(slot: &Slot) -> Self {
        if slot.is_empty() {
            return Severity::Empty;
        }
        match slot.offset {
            0 => Severity::Direct,
            1..=2 => Severity::Minor,
            3..=4 => Severity::Moderate,
            _ => Severity::Severe,
        }
    }
}

/// Number of slots to fill for a `ratio` target, e.g. 45 for 90% of 50.
pub fn fill_target(capacity: usize, ratio: f64) -> usize {
    ((capacity as f64 * ratio).floor() as usize).min(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collisions_and_emptiness() {
        assert!(Slot::default().is_empty());
        assert_eq!(Slot::default().collisions(), 0);
        let slot = Slot::occupied("eve3", 4, 3);
        assert!(!slot.is_empty());
        assert_eq!(slot.collisions(), 3);
    }

    #[test]
    fn severity_buckets() {
        let probes = |p| Severity::from_probes(&Slot::occupied("k", p, 0));
        assert_eq!(Severity::from_probes(&Slot::default()), Severity::Empty);
        assert_eq!(probes(1), Severity::Direct);
        assert_eq!(probes(2), Severity::Minor);
        assert_eq!(probes(4), Severity::Moderate);
        assert_eq!(probes(5), Severity::Severe);

        let offset = |o| Severity::from_offset(&Slot::occupied("k", 9, o));
        assert_eq!(Severity::from_offset(&Slot::default()), Severity::Empty);
        assert_eq!(offset(0), Severity::Direct);
        assert_eq!(offset(2), Severity::Minor);
        assert_eq!(offset(4), Severity::Moderate);
        assert_eq!(offset(5), Severity::Severe);
    }

    #[test]
    fn fill_target_floors() {
        assert_eq!(fill_target(50, 0.9), 45);
        assert_eq!(fill_target(7, 0.5), 3);
        assert_eq!(fill_target(10, 2.0), 10);
    }
}
