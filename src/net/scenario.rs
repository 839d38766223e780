//! Scenarios: a net, its initial marking and an optional goal place, built
//! from static data so every demo runs through the same engine.
use serde::{Deserialize, Serialize};

use crate::net::core::{FireError, Net, NetError};
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::structure::{Marking, Place, Tokens};

#[derive(Debug, Clone, Copy)]
pub struct TransitionSpec {
    pub name: &'static str,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
}

/// Declarative description of a scenario.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub places: &'static [(&'static str, Tokens)],
    pub transitions: &'static [TransitionSpec],
    /// Reaching a token here counts as completing the scenario.
    pub goal: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    /// Nothing has fired yet.
    Idle,
    Running,
    Completed,
    /// No transition is enabled and the goal was not reached.
    Stuck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub title: String,
    pub net: Net,
    pub goal: Option<PlaceId>,
}

impl Scenario {
    pub fn from_spec(spec: &ScenarioSpec) -> Result<Self, NetError> {
        let mut net = Net::empty();
        for &(name, tokens) in spec.places {
            net.add_place(Place::new(name, tokens))?;
        }
        for transition in spec.transitions {
            net.connect(transition.name, transition.inputs, transition.outputs)?;
        }
        let goal = match spec.goal {
            Some(goal) => Some(
                net.place_id(goal)
                    .ok_or_else(|| NetError::UnknownGoal(goal.to_string()))?,
            ),
            None => None,
        };
        log::debug!(
            "built scenario {} ({} places, {} transitions)",
            spec.name,
            net.places_len(),
            net.transitions_len()
        );
        Ok(Self {
            name: spec.name.to_string(),
            title: spec.title.to_string(),
            net,
            goal,
        })
    }

    /// The configured starting marking; any history is the caller's to drop.
    pub fn reset(&self) -> Marking {
        self.net.initial_marking()
    }

    pub fn is_enabled(&self, marking: &Marking, transition: TransitionId) -> bool {
        self.net.is_enabled(marking, transition)
    }

    pub fn fire(&self, marking: &Marking, name: &str) -> Result<Marking, FireError> {
        self.net.fire_by_name(marking, name)
    }

    pub fn enabled_names(&self, marking: &Marking) -> Vec<String> {
        self.net
            .enabled_transitions(marking)
            .into_iter()
            .filter_map(|id| self.net.get_transition(id))
            .map(|transition| transition.name.clone())
            .collect()
    }

    pub fn goal_reached(&self, marking: &Marking) -> bool {
        self.goal.is_some_and(|goal| marking.tokens(goal) > 0)
    }

    pub fn status(&self, marking: &Marking, steps: usize) -> FlowStatus {
        if steps == 0 {
            FlowStatus::Idle
        } else if self.goal_reached(marking) {
            FlowStatus::Completed
        } else if self.net.enabled_transitions(marking).is_empty() {
            FlowStatus::Stuck
        } else {
            FlowStatus::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELAY: ScenarioSpec = ScenarioSpec {
        name: "relay",
        title: "Relay",
        places: &[("start", 1), ("middle", 0), ("finish", 0), ("trap", 0)],
        transitions: &[
            TransitionSpec {
                name: "advance",
                inputs: &["start"],
                outputs: &["middle"],
            },
            TransitionSpec {
                name: "arrive",
                inputs: &["middle"],
                outputs: &["finish"],
            },
            TransitionSpec {
                name: "fall",
                inputs: &["middle"],
                outputs: &["trap"],
            },
        ],
        goal: Some("finish"),
    };

    #[test]
    fn status_follows_progress() {
        let scenario = Scenario::from_spec(&RELAY).unwrap();
        let m0 = scenario.reset();
        assert_eq!(scenario.status(&m0, 0), FlowStatus::Idle);

        let m1 = scenario.fire(&m0, "advance").unwrap();
        assert_eq!(scenario.status(&m1, 1), FlowStatus::Running);
        assert_eq!(scenario.enabled_names(&m1), vec!["arrive", "fall"]);

        let done = scenario.fire(&m1, "arrive").unwrap();
        assert_eq!(scenario.status(&done, 2), FlowStatus::Completed);

        let trapped = scenario.fire(&m1, "fall").unwrap();
        assert_eq!(scenario.status(&trapped, 2), FlowStatus::Stuck);
    }

    #[test]
    fn unknown_goal_is_rejected() {
        let spec = ScenarioSpec {
            goal: Some("nowhere"),
            ..RELAY
        };
        assert_eq!(
            Scenario::from_spec(&spec).unwrap_err(),
            NetError::UnknownGoal("nowhere".into())
        );
    }
}
