//! Semantic action IDs for MASH click targets.

// ── Setup screen ─────────────────────────────────────────────
pub const EDIT_CATEGORY_BASE: u16 = 10; // +index 0..8
pub const CYCLE_MODE: u16 = 30;
pub const START_GAME: u16 = 31;
pub const ADD_CATEGORY: u16 = 32;
pub const GO_HISTORY: u16 = 33;
pub const GO_TEMPLATES: u16 = 34;
pub const SAVE_TEMPLATE: u16 = 35;
pub const RESET_ANSWERS: u16 = 36;

// ── Edit / new category screens ──────────────────────────────
pub const REMOVE_ANSWER_BASE: u16 = 40; // +index 0..5
pub const SUBMIT_ENTRY: u16 = 50;
pub const REMOVE_CATEGORY: u16 = 51;

// ── Spiral screen ────────────────────────────────────────────
pub const DRAW_SPIRAL: u16 = 60;
pub const BEGIN_COUNTING: u16 = 61;
pub const STEP_DIGIT_BASE: u16 = 70; // +digit 0..9
pub const STEP_CLEAR: u16 = 80;

// ── Counting / result screens ────────────────────────────────
pub const SKIP_COUNTING: u16 = 90;
pub const PLAY_AGAIN: u16 = 100;

// ── History / templates screens ──────────────────────────────
pub const CLEAR_HISTORY: u16 = 110;
pub const WIPE_SAVE: u16 = 111;
pub const LOAD_TEMPLATE_BASE: u16 = 120; // +index 0..8
pub const DELETE_TEMPLATE_BASE: u16 = 140; // +index 0..8

// ── Shared ───────────────────────────────────────────────────
pub const BACK: u16 = 200;
