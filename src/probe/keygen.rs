//! Pseudo-random demo keys such as `maya42`.
//!
//! The name and the numeric suffix are drawn through two separate calls on a
//! [`KeySource`], so a caller can pin either one independently.
use std::collections::VecDeque;

use rand::Rng;

pub const NAMES: [&str; 26] = [
    "alice", "bob", "carol", "dave", "eve", "frank", "grace", "henry", "iris", "jack", "kate",
    "leo", "maya", "nick", "olive", "paul", "quinn", "rose", "sam", "tara", "uma", "vic", "walt",
    "xena", "yuri", "zoe",
];

/// Suffixes are drawn from `0..SUFFIX_BOUND`.
pub const SUFFIX_BOUND: u32 = 100;

/// Both draws return 0 for an empty range.
pub trait KeySource {
    /// Index into a name list of length `choices`.
    fn pick_name(&mut self, choices: usize) -> usize;
    /// Integer in `0..bound`.
    fn pick_suffix(&mut self, bound: u32) -> u32;
}

impl<R: Rng + ?Sized> KeySource for R {
    fn pick_name(&mut self, choices: usize) -> usize {
        self.random_range(0..choices.max(1))
    }

    fn pick_suffix(&mut self, bound: u32) -> u32 {
        self.random_range(0..bound.max(1))
    }
}

/// Replays fixed draws, wrapping each into range. Once a queue runs dry it
/// keeps answering 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    names: VecDeque<usize>,
    suffixes: VecDeque<u32>,
}

impl ScriptedKeys {
    pub fn new(
        names: impl IntoIterator<Item = usize>,
        suffixes: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            names: names.into_iter().collect(),
            suffixes: suffixes.into_iter().collect(),
        }
    }
}

impl KeySource for ScriptedKeys {
    fn pick_name(&mut self, choices: usize) -> usize {
        self.names.pop_front().unwrap_or(0) % choices.max(1)
    }

    fn pick_suffix(&mut self, bound: u32) -> u32 {
        self.suffixes.pop_front().unwrap_or(0) % bound.max(1)
    }
}

pub fn generate_key<S: KeySource + ?Sized>(source: &mut S) -> String {
    let name = NAMES[source.pick_name(NAMES.len())];
    let suffix = source.pick_suffix(SUFFIX_BOUND);
    format!("{}{}", name, suffix)
}
