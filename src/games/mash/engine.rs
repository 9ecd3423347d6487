//! Spiral elimination: the counting-out game, as pure functions.
//!
//! Each step counts `N` items around the *active set* (candidates of
//! categories that still have more than one survivor) starting after the
//! position the previous count landed on, and eliminates the item the count
//! lands on. Resolved categories drop out of the count entirely.

use log::debug;

use super::error::EngineError;
use super::registry::{CandidateItem, Registry};
use super::state::Category;

/// Mutable state threaded through one elimination run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunState {
    pub categories: Vec<Category>,
    pub candidates: Vec<CandidateItem>,
    /// Flat index of the item last landed on, for highlighting.
    pub pointed: Option<usize>,
    /// Active-set position the previous count landed on. The next count
    /// starts at the position after it; `None` starts at the first item.
    pub pointer: Option<usize>,
    /// Number of eliminations performed so far.
    pub round: u32,
    pub complete: bool,
}

/// What a single elimination did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EliminationEvent {
    pub round: u32,
    /// Flat index of the eliminated candidate.
    pub index: usize,
    pub category: String,
    pub value: String,
    /// Flat indices visited by the count, ending on `index`.
    pub path: Vec<usize>,
    /// Categories that resolved to a single survivor during this step.
    pub finalized: Vec<String>,
    pub complete: bool,
}

impl RunState {
    pub fn new(registry: Registry) -> Self {
        let Registry {
            categories,
            candidates,
        } = registry;
        let mut state = Self {
            categories,
            candidates,
            pointed: None,
            pointer: None,
            round: 0,
            complete: false,
        };
        // Single-answer categories are final before any counting starts.
        mark_finals(&state.categories, &mut state.candidates);
        state.complete = active_set(&state.candidates).is_empty();
        state
    }

    pub fn survivors_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a CandidateItem> {
        self.candidates
            .iter()
            .filter(move |c| c.category == key && !c.eliminated)
    }

    pub fn eliminated_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.eliminated).count()
    }
}

fn remaining(candidates: &[CandidateItem], key: &str) -> usize {
    candidates
        .iter()
        .filter(|c| c.category == key && !c.eliminated)
        .count()
}

/// Flat indices of the candidates still being counted, in list order.
pub fn active_set(candidates: &[CandidateItem]) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.eliminated && remaining(candidates, &c.category) > 1)
        .map(|(i, _)| i)
        .collect()
}

/// Flag the lone survivor of every category that has just resolved.
/// Returns the keys of the categories finalized by this call.
fn mark_finals(categories: &[Category], candidates: &mut [CandidateItem]) -> Vec<String> {
    let mut finalized = Vec::new();
    for category in categories {
        let key = category.real_name.as_str();
        if remaining(candidates, key) != 1 {
            continue;
        }
        if let Some(item) = candidates
            .iter_mut()
            .find(|c| c.category == key && !c.eliminated)
        {
            if !item.is_final {
                item.is_final = true;
                finalized.push(key.to_string());
            }
        }
    }
    finalized
}

/// Perform one elimination. Returns `Ok(None)` once every category is
/// resolved.
pub fn step(
    state: &mut RunState,
    step_count: u32,
) -> Result<Option<EliminationEvent>, EngineError> {
    if step_count == 0 {
        return Err(EngineError::ZeroStepCount);
    }
    if state.complete {
        return Ok(None);
    }

    let active = active_set(&state.candidates);
    if active.is_empty() {
        state.complete = true;
        return Ok(None);
    }

    let len = active.len();
    let n = step_count as usize;
    let last = state.pointer.map_or(len - 1, |p| p % len);
    let landing = (last + n) % len;
    let path: Vec<usize> = (1..=n).map(|i| active[(last + i) % len]).collect();
    let target = active[landing];

    state.candidates[target].eliminated = true;
    state.round += 1;
    let finalized = mark_finals(&state.categories, &mut state.candidates);

    let next_active = active_set(&state.candidates);
    state.pointer = Some(landing % next_active.len().max(1));
    state.pointed = Some(target);
    state.complete = next_active.is_empty();

    let item = &state.candidates[target];
    debug!(
        "round {}: eliminated {}#{} ({}), pointer {:?}",
        state.round, item.category, item.index, item.value, state.pointer
    );

    Ok(Some(EliminationEvent {
        round: state.round,
        index: target,
        category: item.category.clone(),
        value: item.value.clone(),
        path,
        finalized,
        complete: state.complete,
    }))
}

/// A finite, non-restartable sequence of elimination events.
#[derive(Clone, Debug)]
pub struct EliminationRun {
    state: RunState,
    step_count: u32,
}

impl EliminationRun {
    pub fn new(registry: Registry, step_count: u32) -> Result<Self, EngineError> {
        if step_count == 0 {
            return Err(EngineError::ZeroStepCount);
        }
        Ok(Self {
            state: RunState::new(registry),
            step_count,
        })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn into_state(self) -> RunState {
        self.state
    }

    /// Run every remaining step synchronously.
    pub fn finish(&mut self) -> Vec<EliminationEvent> {
        self.by_ref().collect()
    }
}

impl Iterator for EliminationRun {
    type Item = EliminationEvent;

    fn next(&mut self) -> Option<Self::Item> {
        // `new` rejects a zero step count, so `step` cannot fail here.
        step(&mut self.state, self.step_count).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(layout: &[(&str, &[&str])]) -> Registry {
        Registry::build(layout.iter().map(|(key, answers)| {
            (
                Category::custom(key, key),
                answers.iter().map(|s| s.to_string()).collect(),
            )
        }))
        .unwrap()
    }

    fn winner<'a>(state: &'a RunState, key: &'a str) -> &'a str {
        let survivors: Vec<_> = state.survivors_of(key).collect();
        assert_eq!(survivors.len(), 1, "category {key} not resolved");
        &survivors[0].value
    }

    #[test]
    fn carry_over_regression() {
        let mut run = EliminationRun::new(
            registry(&[("A", &["a1", "a2", "a3"]), ("B", &["b1", "b2"])]),
            3,
        )
        .unwrap();

        let events = run.finish();
        let order: Vec<&str> = events.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, vec!["a3", "a2", "b1"]);

        // Round 2 starts after position 2 (b1): counts b2, a1, a2.
        assert_eq!(events[0].path, vec![0, 1, 2]);
        assert_eq!(events[1].path, vec![4, 0, 1]);
        assert_eq!(events[1].finalized, vec!["A".to_string()]);
        assert_eq!(events[2].path, vec![3, 4, 3]);
        assert_eq!(events[2].finalized, vec!["B".to_string()]);
        assert!(events[2].complete);

        let state = run.state();
        assert_eq!(winner(state, "A"), "a1");
        assert_eq!(winner(state, "B"), "b2");
    }

    #[test]
    fn pair_with_single_step_eliminates_first() {
        let mut run = EliminationRun::new(registry(&[("A", &["x", "y"])]), 1).unwrap();
        let events = run.finish();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].value, "x");
        assert_eq!(winner(run.state(), "A"), "y");
    }

    #[test]
    fn single_answer_category_is_final_immediately() {
        let run = EliminationRun::new(
            registry(&[("A", &["only"]), ("B", &["b1", "b2"])]),
            2,
        )
        .unwrap();
        let only = &run.state().candidates[0];
        assert!(only.is_final);
        assert!(!run.state().complete);
        assert_eq!(active_set(&run.state().candidates), vec![1, 2]);
    }

    #[test]
    fn all_single_answers_complete_without_steps() {
        let mut run = EliminationRun::new(registry(&[("A", &["a"]), ("B", &["b"])]), 5).unwrap();
        assert!(run.state().complete);
        assert!(run.next().is_none());
    }

    #[test]
    fn zero_step_count_rejected() {
        let err = EliminationRun::new(registry(&[("A", &["x", "y"])]), 0).unwrap_err();
        assert_eq!(err, EngineError::ZeroStepCount);
    }

    #[test]
    fn step_with_zero_count_fails_without_touching_state() {
        let mut state = RunState::new(registry(&[("A", &["x", "y"])]));
        let before = state.clone();
        assert_eq!(step(&mut state, 0), Err(EngineError::ZeroStepCount));
        assert_eq!(state, before);
        assert!(!state.complete);
    }

    #[test]
    fn step_after_completion_returns_none() {
        let mut state = RunState::new(registry(&[("A", &["x", "y"])]));
        let event = step(&mut state, 1).unwrap().unwrap();
        assert!(event.complete);
        assert_eq!(step(&mut state, 1), Ok(None));
    }

    #[test]
    fn large_step_count_wraps() {
        // 3 items, 7 steps starting before the first: lands on (2 + 7) % 3 = 0.
        let mut run = EliminationRun::new(registry(&[("A", &["p", "q", "r"])]), 7).unwrap();
        let first = run.next().unwrap();
        assert_eq!(first.value, "p");
        assert_eq!(first.path.len(), 7);
        assert_eq!(*first.path.last().unwrap(), 0);
    }

    #[test]
    fn resolved_category_is_skipped_in_count() {
        // A resolves first; afterwards only B's items are counted.
        let mut run = EliminationRun::new(
            registry(&[("A", &["a1", "a2"]), ("B", &["b1", "b2", "b3"])]),
            1,
        )
        .unwrap();
        let first = run.next().unwrap();
        assert_eq!(first.value, "a1");
        assert_eq!(first.finalized, vec!["A".to_string()]);
        assert_eq!(active_set(&run.state().candidates), vec![2, 3, 4]);
        // The landing position 0 now holds b1, so a count of one reaches b2.
        assert_eq!(run.state().pointer, Some(0));
        assert_eq!(run.next().unwrap().value, "b2");
    }

    #[test]
    fn pointer_wraps_after_last_item() {
        let mut run = EliminationRun::new(registry(&[("A", &["a", "b", "c", "d"])]), 4).unwrap();
        assert_eq!(run.next().unwrap().value, "d");
        // Landing position 3 is reduced into the three-item active set.
        assert_eq!(run.state().pointer, Some(0));
        assert_eq!(run.next().unwrap().value, "b");
    }

    #[test]
    fn iterator_is_not_restartable() {
        let mut run = EliminationRun::new(registry(&[("A", &["x", "y", "z"])]), 2).unwrap();
        assert_eq!(run.finish().len(), 2);
        assert!(run.next().is_none());
        assert!(run.finish().is_empty());
    }

    #[test]
    fn rounds_count_up() {
        let mut run = EliminationRun::new(
            registry(&[("A", &["1", "2", "3"]), ("B", &["4", "5", "6"])]),
            2,
        )
        .unwrap();
        let rounds: Vec<u32> = run.finish().iter().map(|e| e.round).collect();
        assert_eq!(rounds, vec![1, 2, 3, 4]);
        assert_eq!(run.state().round, 4);
    }
}
