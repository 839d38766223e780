//! 网的静态结构元素：库所、迁移与标识。
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::net::ids::PlaceId;
use crate::net::index_vec::IndexVec;

/// Signed so that a place listed twice as an input can go below zero.
pub type Tokens = i64;

/// Ordered arc list of a transition. A place listed twice weighs two tokens.
pub type Arcs = SmallVec<[PlaceId; 4]>;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Place {
    pub name: String,
    /// Token count in the initial marking.
    pub tokens: Tokens,
}

impl Place {
    pub fn new(name: impl Into<String>, tokens: Tokens) -> Self {
        Self {
            name: name.into(),
            tokens,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Transition {
    pub name: String,
    pub inputs: Arcs,
    pub outputs: Arcs,
}

impl Transition {
    pub fn new(
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = PlaceId>,
        outputs: impl IntoIterator<Item = PlaceId>,
    ) -> Self {
        Self {
            name: name.into(),
            inputs: inputs.into_iter().collect(),
            outputs: outputs.into_iter().collect(),
        }
    }

    /// Net change in total token count when this transition fires.
    pub fn token_delta(&self) -> i64 {
        self.outputs.len() as i64 - self.inputs.len() as i64
    }

    /// Every place this transition touches, inputs first, with repeats.
    pub fn arcs(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.inputs.iter().chain(self.outputs.iter()).copied()
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("inputs", &self.inputs.as_slice())
            .field("outputs", &self.outputs.as_slice())
            .finish()
    }
}

/// Token counts for every place of a net. Firing never mutates a marking in
/// place; it derives a new one.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Marking(IndexVec<PlaceId, Tokens>);

impl Marking {
    pub fn new(counts: IndexVec<PlaceId, Tokens>) -> Self {
        Self(counts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceId, &Tokens)> {
        self.0.iter_enumerated()
    }

    /// Tokens held by `place`; a place outside the marking holds none.
    pub fn tokens(&self, place: PlaceId) -> Tokens {
        self.0.get(place).copied().unwrap_or(0)
    }

    pub(crate) fn tokens_mut(&mut self, place: PlaceId) -> Option<&mut Tokens> {
        self.0.get_mut(place)
    }

    pub fn total(&self) -> Tokens {
        self.0.iter().sum()
    }
}

impl FromIterator<Tokens> for Marking {
    fn from_iter<It: IntoIterator<Item = Tokens>>(iter: It) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (place, tokens) in self.iter() {
            map.entry(&place, tokens);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_delta_counts_repeated_arcs() {
        let p = PlaceId::new(0);
        let q = PlaceId::new(1);
        let t = Transition::new("merge", [p, p, q], [q]);
        assert_eq!(t.token_delta(), -2);
        assert_eq!(t.arcs().count(), 4);
    }

    #[test]
    fn marking_reports_zero_outside_its_domain() {
        let marking: Marking = [2, 0, 1].into_iter().collect();
        assert_eq!(marking.tokens(PlaceId::new(0)), 2);
        assert_eq!(marking.tokens(PlaceId::new(9)), 0);
        assert_eq!(marking.total(), 3);
        assert_eq!(format!("{:?}", marking), "{p0: 2, p1: 0, p2: 1}");

        let overdrawn: Marking = [-1, 2].into_iter().collect();
        assert_eq!(overdrawn.total(), 1);
    }
}
