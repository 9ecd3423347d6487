//! Result extraction and the pure-randomization resolver.

use serde::{Deserialize, Serialize};

use super::engine::RunState;
use super::error::EngineError;
use super::registry::Registry;

/// One resolved category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortuneEntry {
    /// Canonical category key.
    pub key: String,
    /// Display name at the time the game was played.
    pub label: String,
    pub icon: String,
    pub value: String,
}

/// Category → winner mapping, in category order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fortune {
    pub entries: Vec<FortuneEntry>,
}

impl Fortune {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read the winners off a completed run. Does not touch the run.
pub fn extract(state: &RunState) -> Result<Fortune, EngineError> {
    if !state.complete {
        return Err(EngineError::Incomplete);
    }
    let entries = state
        .categories
        .iter()
        .map(|category| {
            let key = category.real_name.as_str();
            let mut survivors = state.survivors_of(key);
            match (survivors.next(), survivors.next()) {
                (Some(item), None) if item.is_final => Ok(FortuneEntry {
                    key: key.to_string(),
                    label: category.nickname.clone(),
                    icon: category.icon.clone(),
                    value: item.value.clone(),
                }),
                _ => Err(EngineError::Incomplete),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Fortune { entries })
}

// ── RNG ───────────────────────────────────────────────────────────────

pub fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// Advance `seed` and return a value in `0..bound`.
pub fn roll(seed: &mut u64, bound: usize) -> usize {
    *seed = next_rng(*seed);
    if bound == 0 {
        return 0;
    }
    ((*seed >> 33) % bound as u64) as usize
}

/// Pick one answer per category uniformly at random.
///
/// Produces a completed [`RunState`] with no elimination rounds, so the
/// same extractor serves every resolution mode.
pub fn resolve_random(registry: Registry, seed: &mut u64) -> RunState {
    let mut state = RunState::new(registry);
    let keys: Vec<String> = state
        .categories
        .iter()
        .map(|c| c.real_name.clone())
        .collect();

    for key in keys {
        let members: Vec<usize> = state
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.category == key)
            .map(|(i, _)| i)
            .collect();
        let pick = members[roll(seed, members.len())];
        for &i in &members {
            let item = &mut state.candidates[i];
            item.eliminated = i != pick;
            item.is_final = i == pick;
        }
    }

    state.complete = true;
    state.pointed = None;
    state
}
