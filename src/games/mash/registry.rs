//! Candidate registry: flattens categories and their answers into the
//! counting path used by the elimination engine.

use std::collections::HashSet;

use super::error::EngineError;
use super::state::Category;

/// One player-supplied answer that can be counted out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateItem {
    /// Canonical key of the owning category.
    pub category: String,
    /// Position within the owning category's answer list.
    pub index: usize,
    pub value: String,
    pub eliminated: bool,
    pub is_final: bool,
}

/// Categories in play plus their candidates in document order.
#[derive(Clone, Debug, PartialEq)]
pub struct Registry {
    pub categories: Vec<Category>,
    pub candidates: Vec<CandidateItem>,
}

impl Registry {
    /// Build the registry, preserving category order and per-category answer order.
    pub fn build<I>(entries: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (Category, Vec<String>)>,
    {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        let mut candidates = Vec::new();

        for (category, answers) in entries {
            if category.real_name.trim().is_empty() {
                return Err(EngineError::EmptyCategoryKey);
            }
            if !seen.insert(category.real_name.clone()) {
                return Err(EngineError::DuplicateCategory(category.real_name));
            }
            if answers.is_empty() {
                return Err(EngineError::NoAnswers(category.real_name));
            }
            candidates.extend(answers.into_iter().enumerate().map(|(index, value)| {
                CandidateItem {
                    category: category.real_name.clone(),
                    index,
                    value,
                    eliminated: false,
                    is_final: false,
                }
            }));
            categories.push(category);
        }

        Ok(Self {
            categories,
            candidates,
        })
    }
}
