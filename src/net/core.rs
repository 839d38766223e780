//! 运行时：可发生判定、发生语义与 Graphviz 导出。
//!
//! Enablement only checks that every input place holds *a* token; firing then
//! consumes one token per input occurrence. The two rules differ
//! for transitions that list an input place more than once, and such a
//! place can end up with a negative count.
use std::fmt::{self, Write as FmtWrite};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::{Marking, Place, Tokens, Transition};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FireError {
    #[error("transition {0:?} is out of bounds")]
    OutOfBounds(TransitionId),
    #[error("no transition named `{0}`")]
    UnknownTransition(String),
    #[error("transition `{name}` ({transition:?}) is not enabled under the supplied marking")]
    NotEnabled {
        transition: TransitionId,
        name: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetError {
    #[error("place `{0}` is declared twice")]
    DuplicatePlace(String),
    #[error("transition `{0}` is declared twice")]
    DuplicateTransition(String),
    #[error("transition `{transition}` references unknown place `{place}`")]
    UnknownPlace { transition: String, place: String },
    #[error("goal place `{0}` does not exist")]
    UnknownGoal(String),
    #[error("no scenario named `{0}`")]
    UnknownScenario(String),
}

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct Net {
    places: IndexVec<PlaceId, Place>,
    transitions: IndexVec<TransitionId, Transition>,
    place_names: IndexMap<String, PlaceId>,
    transition_names: IndexMap<String, TransitionId>,
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Net")
            .field("places", &self.places)
            .field("transitions", &self.transitions)
            .finish()
    }
}

impl Net {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_place(&mut self, place: Place) -> Result<PlaceId, NetError> {
        if self.place_names.contains_key(&place.name) {
            return Err(NetError::DuplicatePlace(place.name));
        }
        let name = place.name.clone();
        let id = self.places.push(place);
        self.place_names.insert(name, id);
        Ok(id)
    }

    /// Adds a transition whose arcs are already resolved to place ids.
    pub fn add_transition(&mut self, transition: Transition) -> Result<TransitionId, NetError> {
        if self.transition_names.contains_key(&transition.name) {
            return Err(NetError::DuplicateTransition(transition.name));
        }
        let missing = transition.arcs().find(|place| !self.places.contains(*place));
        if let Some(missing) = missing {
            return Err(NetError::UnknownPlace {
                transition: transition.name,
                place: missing.to_string(),
            });
        }
        let name = transition.name.clone();
        let id = self.transitions.push(transition);
        self.transition_names.insert(name, id);
        Ok(id)
    }

    /// Adds a transition, resolving its arcs by place name.
    pub fn connect(
        &mut self,
        name: &str,
        inputs: &[&str],
        outputs: &[&str],
    ) -> Result<TransitionId, NetError> {
        let resolve = |places: &[&str]| {
            places
                .iter()
                .map(|place| {
                    self.place_id(place).ok_or_else(|| NetError::UnknownPlace {
                        transition: name.to_string(),
                        place: place.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        };
        let inputs = resolve(inputs)?;
        let outputs = resolve(outputs)?;
        self.add_transition(Transition::new(name, inputs, outputs))
    }

    pub fn place_id(&self, name: &str) -> Option<PlaceId> {
        self.place_names.get(name).copied()
    }

    pub fn transition_id(&self, name: &str) -> Option<TransitionId> {
        self.transition_names.get(name).copied()
    }

    pub fn get_place(&self, place: PlaceId) -> Option<&Place> {
        self.places.get(place)
    }

    pub fn get_transition(&self, transition: TransitionId) -> Option<&Transition> {
        self.transitions.get(transition)
    }

    pub fn places(&self) -> impl Iterator<Item = (PlaceId, &Place)> {
        self.places.iter_enumerated()
    }

    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions.iter_enumerated()
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn initial_marking(&self) -> Marking {
        self.places.iter().map(|place| place.tokens).collect()
    }

    /// Resolves a marking to `place name -> tokens` in declaration order.
    pub fn named_marking(&self, marking: &Marking) -> IndexMap<String, Tokens> {
        self.places
            .iter_enumerated()
            .map(|(id, place)| (place.name.clone(), marking.tokens(id)))
            .collect()
    }

    pub fn is_enabled(&self, marking: &Marking, transition: TransitionId) -> bool {
        let Some(transition) = self.transitions.get(transition) else {
            return false;
        };
        transition
            .inputs
            .iter()
            .all(|&place| marking.tokens(place) > 0)
    }

    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        self.transitions
            .indices()
            .filter(|&transition| self.is_enabled(marking, transition))
            .collect()
    }

    pub fn fire_transition(
        &self,
        marking: &Marking,
        transition: TransitionId,
    ) -> Result<Marking, FireError> {
        let Some(rule) = self.transitions.get(transition) else {
            return Err(FireError::OutOfBounds(transition));
        };
        if !self.is_enabled(marking, transition) {
            return Err(FireError::NotEnabled {
                transition,
                name: rule.name.clone(),
            });
        }

        let mut next = marking.clone();
        for &place in &rule.inputs {
            if let Some(tokens) = next.tokens_mut(place) {
                *tokens -= 1;
                if *tokens < 0 {
                    log::warn!(
                        "{} drove {} to {} tokens",
                        rule.name,
                        self.places[place].name,
                        tokens
                    );
                }
            }
        }
        for &place in &rule.outputs {
            if let Some(tokens) = next.tokens_mut(place) {
                *tokens += 1;
            }
        }

        log::debug!("fired {} ({:?} -> {:?})", rule.name, marking, next);
        Ok(next)
    }

    pub fn fire_by_name(&self, marking: &Marking, name: &str) -> Result<Marking, FireError> {
        let transition = self
            .transition_id(name)
            .ok_or_else(|| FireError::UnknownTransition(name.to_string()))?;
        self.fire_transition(marking, transition)
    }

    /// Graphviz rendering of the net with `marking`'s token counts as labels.
    pub fn to_dot(&self, marking: &Marking) -> String {
        let mut dot = String::new();
        let _ = writeln!(&mut dot, "digraph PetriNet {{");
        let _ = writeln!(&mut dot, "    rankdir=LR;");
        let _ = writeln!(&mut dot, "    node [fontname=\"Helvetica\"];");

        for (place_id, place) in self.places.iter_enumerated() {
            let _ = writeln!(
                &mut dot,
                "    place_{} [label=\"{}\\n{}\", shape=circle, style=filled, fillcolor=\"#e3f2fd\"];",
                place_id.index(),
                escape_label(&place.name),
                marking.tokens(place_id)
            );
        }

        for (transition_id, transition) in self.transitions.iter_enumerated() {
            let fill = if self.is_enabled(marking, transition_id) {
                "#c8e6c9"
            } else {
                "#ffe0b2"
            };
            let _ = writeln!(
                &mut dot,
                "    trans_{} [label=\"{}\", shape=box, style=filled, fillcolor=\"{}\"];",
                transition_id.index(),
                escape_label(&transition.name),
                fill
            );
        }

        for (transition_id, transition) in self.transitions.iter_enumerated() {
            let trans_node = format!("trans_{}", transition_id.index());
            for (place, weight) in arc_weights(&transition.inputs) {
                write_arc(&mut dot, &format!("place_{}", place.index()), &trans_node, weight);
            }
            for (place, weight) in arc_weights(&transition.outputs) {
                write_arc(&mut dot, &trans_node, &format!("place_{}", place.index()), weight);
            }
        }

        let _ = writeln!(&mut dot, "}}");
        dot
    }
}

/// Collapses repeated arc entries into `(place, weight)` in first-seen order.
fn arc_weights(arcs: &[PlaceId]) -> IndexMap<PlaceId, usize> {
    let mut weights = IndexMap::new();
    for &place in arcs {
        *weights.entry(place).or_insert(0) += 1;
    }
    weights
}

fn write_arc(dot: &mut String, from: &str, to: &str, weight: usize) {
    if weight == 1 {
        let _ = writeln!(dot, "    {} -> {};", from, to);
    } else {
        let _ = writeln!(dot, "    {} -> {} [label=\"{}\"];", from, to, weight);
    }
}

fn escape_label(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Net {
        let mut net = Net::empty();
        net.add_place(Place::new("a", 1)).unwrap();
        net.add_place(Place::new("b", 0)).unwrap();
        net.connect("move", &["a"], &["b"]).unwrap();
        net
    }

    #[test]
    fn add_transition_rejects_unknown_places() {
        let mut net = pipeline();
        let err = net.connect("bad", &["a"], &["nowhere"]).unwrap_err();
        assert_eq!(
            err,
            NetError::UnknownPlace {
                transition: "bad".into(),
                place: "nowhere".into()
            }
        );
        let err = net
            .add_transition(Transition::new("raw", [PlaceId::new(5)], []))
            .unwrap_err();
        assert!(matches!(err, NetError::UnknownPlace { .. }));
        assert_eq!(net.transitions_len(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut net = pipeline();
        assert_eq!(
            net.add_place(Place::new("a", 0)),
            Err(NetError::DuplicatePlace("a".into()))
        );
        assert_eq!(
            net.connect("move", &["b"], &["a"]),
            Err(NetError::DuplicateTransition("move".into()))
        );
    }

    #[test]
    fn fire_moves_a_token_and_leaves_the_input_marking_alone() {
        let net = pipeline();
        let m0 = net.initial_marking();
        let t = net.transition_id("move").unwrap();
        let m1 = net.fire_transition(&m0, t).unwrap();

        assert_eq!(net.named_marking(&m0)["a"], 1);
        assert_eq!(net.named_marking(&m1)["a"], 0);
        assert_eq!(net.named_marking(&m1)["b"], 1);
        assert_eq!(
            net.fire_transition(&m1, t),
            Err(FireError::NotEnabled {
                transition: t,
                name: "move".into()
            })
        );
    }

    #[test]
    fn unknown_and_out_of_range_transitions_are_errors() {
        let net = pipeline();
        let m0 = net.initial_marking();
        assert_eq!(
            net.fire_by_name(&m0, "teleport"),
            Err(FireError::UnknownTransition("teleport".into()))
        );
        let bogus = TransitionId::new(42);
        assert_eq!(net.fire_transition(&m0, bogus), Err(FireError::OutOfBounds(bogus)));
        assert!(!net.is_enabled(&m0, bogus));
    }

    #[test]
    fn doubled_input_needs_only_one_token_but_consumes_two() {
        let mut net = Net::empty();
        net.add_place(Place::new("pair", 2)).unwrap();
        net.add_place(Place::new("single", 1)).unwrap();
        net.add_place(Place::new("out", 0)).unwrap();
        net.connect("takeTwo", &["pair", "pair"], &["out"]).unwrap();
        net.connect("takeSingleTwice", &["single", "single"], &["out"])
            .unwrap();

        let m0 = net.initial_marking();
        let m1 = net.fire_by_name(&m0, "takeTwo").unwrap();
        assert_eq!(net.named_marking(&m1)["pair"], 0);

        // enabled with one token, consumes two
        let single = net.transition_id("takeSingleTwice").unwrap();
        assert!(net.is_enabled(&m1, single));
        let m2 = net.fire_transition(&m1, single).unwrap();
        assert_eq!(net.named_marking(&m2)["single"], -1);
        assert_eq!(net.named_marking(&m2)["out"], 2);
        assert_eq!(m2.total() - m1.total(), net.get_transition(single).unwrap().token_delta());
        assert!(!net.is_enabled(&m2, single));
    }

    #[test]
    fn not_enabled_error_names_the_transition() {
        let net = pipeline();
        let t = net.transition_id("move").unwrap();
        let m1 = net.fire_transition(&net.initial_marking(), t).unwrap();
        let err = net.fire_by_name(&m1, "move").unwrap_err();
        assert_eq!(
            err.to_string(),
            "transition `move` (t0) is not enabled under the supplied marking"
        );
    }

    #[test]
    fn dot_export_marks_weights_and_enabled_transitions() {
        let mut net = pipeline();
        net.connect("double", &["b", "b"], &["a"]).unwrap();
        let dot = net.to_dot(&net.initial_marking());

        assert!(dot.starts_with("digraph PetriNet {"));
        assert!(dot.contains("place_0 [label=\"a\\n1\""));
        assert!(dot.contains("trans_0 [label=\"move\", shape=box, style=filled, fillcolor=\"#c8e6c9\"]"));
        assert!(dot.contains("place_1 -> trans_1 [label=\"2\"];"));
        assert!(dot.contains("trans_0 -> place_1;"));
    }
}
