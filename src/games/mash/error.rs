//! Error types for the MASH game.

use thiserror::Error;

/// Contract violations detected by the registry and elimination engine.
///
/// The UI validates answers before a game starts, so reaching one of these
/// means a caller skipped validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("category key must not be empty")]
    EmptyCategoryKey,
    #[error("category `{0}` appears more than once")]
    DuplicateCategory(String),
    #[error("category `{0}` has no answers")]
    NoAnswers(String),
    #[error("step count must be at least 1")]
    ZeroStepCount,
    #[error("the run has not resolved every category yet")]
    Incomplete,
}

/// Rejections of player input on the setup screens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("入力が空です")]
    Empty,
    #[error("{max}文字以内で入力してください")]
    TooLong { max: usize },
    #[error("「{0}」は既にあります")]
    Duplicate(String),
    #[error("これ以上追加できません (最大{max}個)")]
    Full { max: usize },
    #[error("「{category}」の答えが足りません ({have}/{need})")]
    NotEnoughAnswers {
        category: String,
        have: usize,
        need: usize,
    },
    #[error("ステップ数は 1〜{max} で入力してください")]
    InvalidStepCount { max: u32 },
    #[error("既定のカテゴリは削除できません")]
    DefaultCategory,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Failures while writing the save document.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to serialize save data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage write failed: {0}")]
    Storage(String),
}
