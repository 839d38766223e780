use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::net::core::FireError;
use crate::net::scenario::{FlowStatus, Scenario};
use crate::net::structure::{Marking, Tokens};

/// One visualization instance: the engine marking plus the history the
/// renderer uses for highlighting. The history never feeds back into firing.
#[derive(Debug, Clone)]
pub struct FlowSession {
    scenario: Scenario,
    marking: Marking,
    fired: IndexSet<String>,
    steps: usize,
    last_action: Option<String>,
}

/// Plain-data view of a session handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub scenario: String,
    pub marking: IndexMap<String, Tokens>,
    pub enabled: Vec<String>,
    pub fired: Vec<String>,
    pub steps: usize,
    pub last_action: Option<String>,
    pub status: FlowStatus,
}

impl FlowSession {
    pub fn new(scenario: Scenario) -> Self {
        let marking = scenario.reset();
        Self {
            scenario,
            marking,
            fired: IndexSet::new(),
            steps: 0,
            last_action: None,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn marking(&self) -> &Marking {
        &self.marking
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn was_fired(&self, name: &str) -> bool {
        self.fired.contains(name)
    }

    /// Fires `name`; on error the session is left exactly as it was.
    pub fn fire(&mut self, name: &str) -> Result<&Marking, FireError> {
        let next = self.scenario.fire(&self.marking, name)?;
        self.marking = next;
        self.steps += 1;
        self.fired.insert(name.to_string());
        self.last_action = Some(format!("Fired {}", name));
        Ok(&self.marking)
    }

    pub fn reset(&mut self) {
        self.marking = self.scenario.reset();
        self.fired.clear();
        self.steps = 0;
        self.last_action = None;
    }

    pub fn status(&self) -> FlowStatus {
        self.scenario.status(&self.marking, self.steps)
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            scenario: self.scenario.name.clone(),
            marking: self.scenario.net.named_marking(&self.marking),
            enabled: self.scenario.enabled_names(&self.marking),
            fired: self.fired.iter().cloned().collect(),
            steps: self.steps,
            last_action: self.last_action.clone(),
            status: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::catalog;

    #[test]
    fn rejected_fire_leaves_session_untouched() {
        let mut session = FlowSession::new(catalog::load("human-gate").unwrap());
        let before = session.snapshot();

        let err = session.fire("executeCode").unwrap_err();
        assert!(matches!(err, FireError::NotEnabled { .. }));
        assert_eq!(session.snapshot(), before);
        assert_eq!(before.status, FlowStatus::Idle);
    }

    #[test]
    fn history_tracks_distinct_names_and_resets() {
        let mut session = FlowSession::new(catalog::load("checkout").unwrap());
        session.fire("beginCheckout").unwrap();
        session.fire("beginCheckout").unwrap();
        session.fire("failPayment").unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.fired, vec!["beginCheckout", "failPayment"]);
        assert_eq!(snap.steps, 3);
        assert_eq!(snap.last_action.as_deref(), Some("Fired failPayment"));
        assert_eq!(snap.marking["cartReady"], 1);
        assert_eq!(snap.marking["inventory"], 0);
        assert!(session.was_fired("beginCheckout"));

        session.reset();
        let snap = session.snapshot();
        assert!(snap.fired.is_empty());
        assert_eq!(snap.steps, 0);
        assert_eq!(session.marking(), &session.scenario().reset());
    }
}
