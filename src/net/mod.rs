//! # Token-flow engine (Place/Transition net)
//!
//! A marking `M` assigns a token count to every place. A transition `t` with
//! input list `I(t)` and output list `O(t)`:
//!
//! * is **enabled** under `M` iff `∀p ∈ I(t): M[p] > 0` (presence only, a
//!   place listed twice still needs just one token);
//! * **fires** into `M'` where every occurrence of `p` in `I(t)` removes one
//!   token and every occurrence in `O(t)` adds one.
//!
//! Firing is a pure function of `(M, t)`; the caller decides which enabled
//! transition fires next.
//!
//! ## Example
//!
//! ```rust
//! use flowprobe::net::*;
//!
//! let mut net = Net::empty();
//! net.add_place(Place::new("p0", 1)).unwrap();
//! net.add_place(Place::new("p1", 0)).unwrap();
//! let t0 = net.connect("t0", &["p0"], &["p1"]).unwrap();
//!
//! let marking = net.initial_marking();
//! assert_eq!(net.enabled_transitions(&marking), vec![t0]);
//! let next = net.fire_transition(&marking, t0).unwrap();
//! assert_eq!(next.tokens(net.place_id("p0").unwrap()), 0);
//! assert_eq!(next.tokens(net.place_id("p1").unwrap()), 1);
//! ```

pub mod catalog;
pub mod core;
pub mod ids;
pub mod index_vec;
pub mod scenario;
pub mod session;
pub mod structure;

pub use self::core::{FireError, Net, NetError};
pub use ids::{PlaceId, TransitionId};
pub use index_vec::{Idx, IndexVec};
pub use scenario::{FlowStatus, Scenario, ScenarioSpec, TransitionSpec};
pub use session::{FlowSession, FlowSnapshot};
pub use structure::{Arcs, Marking, Place, Tokens, Transition};
