//! MASH game flow as pure functions over [`MashState`], no rendering / IO.

use log::info;

use super::engine::EliminationRun;
use super::error::{EngineError, EntryError};
use super::registry::Registry;
use super::result::{extract, resolve_random, roll, Fortune};
use super::state::{
    default_drafts, Category, CategoryDraft, HistoryEntry, MashState, Mode, Playback, Screen,
    Template, HISTORY_LIMIT, MAX_ANSWERS, MAX_ANSWER_LEN, MAX_CATEGORIES, MAX_PATH_TICKS,
    MAX_STEP_COUNT, MIN_ANSWERS, PAUSE_TICKS, SPIRAL_RINGS, TEMPLATE_LIMIT,
};
use super::story::StoryTeller;

/// Wall-clock milliseconds, used to stamp history entries.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        0.0
    }
}

// ── Text entry ────────────────────────────────────────────────────────

pub fn type_char(state: &mut MashState, c: char) {
    if c.is_control() || state.input.chars().count() >= MAX_ANSWER_LEN {
        return;
    }
    state.input.push(c);
}

pub fn backspace(state: &mut MashState) {
    state.input.pop();
}

/// Trim and check a new entry against the ones already in its list.
pub fn validate_entry(existing: &[String], text: &str, max: usize) -> Result<String, EntryError> {
    if existing.len() >= max {
        return Err(EntryError::Full { max });
    }
    let value = text.trim();
    if value.is_empty() {
        return Err(EntryError::Empty);
    }
    if value.chars().count() > MAX_ANSWER_LEN {
        return Err(EntryError::TooLong {
            max: MAX_ANSWER_LEN,
        });
    }
    if existing.iter().any(|e| e.to_lowercase() == value.to_lowercase()) {
        return Err(EntryError::Duplicate(value.to_string()));
    }
    Ok(value.to_string())
}

/// Add the typed text as an answer to the category at `idx`.
pub fn submit_answer(state: &mut MashState, idx: usize) -> Result<(), EntryError> {
    let Some(draft) = state.drafts.get_mut(idx) else {
        return Ok(());
    };
    let value = validate_entry(&draft.answers, &state.input, MAX_ANSWERS)?;
    draft.answers.push(value);
    state.input.clear();
    state.dirty = true;
    Ok(())
}

pub fn remove_answer(state: &mut MashState, idx: usize, answer: usize) {
    if let Some(draft) = state.drafts.get_mut(idx) {
        if answer < draft.answers.len() {
            draft.answers.remove(answer);
            state.dirty = true;
        }
    }
}

/// Stable key derived from a display name.
pub fn category_key(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                '_'
            }
        })
        .collect()
}

/// Create a custom category from the typed name. Returns its index.
pub fn submit_category(state: &mut MashState) -> Result<usize, EntryError> {
    let names: Vec<String> = state
        .drafts
        .iter()
        .map(|d| d.category.nickname.clone())
        .collect();
    let name = validate_entry(&names, &state.input, MAX_CATEGORIES)?;
    let key = category_key(&name);
    if state.drafts.iter().any(|d| d.category.real_name == key) {
        return Err(EntryError::Duplicate(name));
    }
    state.drafts.push(CategoryDraft {
        category: Category::custom(&key, &name),
        answers: Vec::new(),
    });
    state.input.clear();
    state.dirty = true;
    Ok(state.drafts.len() - 1)
}

pub fn remove_category(state: &mut MashState, idx: usize) -> Result<(), EntryError> {
    match state.drafts.get(idx) {
        Some(d) if d.category.is_default => Err(EntryError::DefaultCategory),
        Some(_) => {
            state.drafts.remove(idx);
            state.dirty = true;
            Ok(())
        }
        None => Ok(()),
    }
}

pub fn reset_answers(state: &mut MashState) {
    state.drafts = default_drafts();
    state.dirty = true;
    state.add_log("答えをリセットしました");
}

/// Every category needs `MIN_ANSWERS..=MAX_ANSWERS` answers before playing.
pub fn check_ready(drafts: &[CategoryDraft]) -> Result<(), EntryError> {
    match drafts
        .iter()
        .find(|d| !(MIN_ANSWERS..=MAX_ANSWERS).contains(&d.answers.len()))
    {
        Some(d) => Err(EntryError::NotEnoughAnswers {
            category: d.category.nickname.clone(),
            have: d.answers.len(),
            need: MIN_ANSWERS,
        }),
        None => Ok(()),
    }
}

pub fn build_registry(drafts: &[CategoryDraft]) -> Result<Registry, EngineError> {
    Registry::build(
        drafts
            .iter()
            .map(|d| (d.category.clone(), d.answers.clone())),
    )
}

// ── Step count ────────────────────────────────────────────────────────

pub fn push_step_digit(state: &mut MashState, c: char) {
    if c.is_ascii_digit() && state.step_input.len() < 2 {
        state.step_input.push(c);
    }
}

pub fn parse_step_count(text: &str) -> Result<u32, EntryError> {
    match text.trim().parse::<u32>() {
        Ok(n) if (1..=MAX_STEP_COUNT).contains(&n) => Ok(n),
        _ => Err(EntryError::InvalidStepCount {
            max: MAX_STEP_COUNT,
        }),
    }
}

/// "Draw" a spiral: the ring count becomes the step count.
pub fn draw_spiral(state: &mut MashState) {
    let (lo, hi) = SPIRAL_RINGS;
    let rings = lo + roll(&mut state.rng_state, (hi - lo + 1) as usize) as u32;
    state.step_input = rings.to_string();
    state.add_log(&format!("渦巻きを描いた… 輪は {} 本！", rings));
}

// ── Game flow ─────────────────────────────────────────────────────────

/// Start a game in the current mode.
pub fn start_game(state: &mut MashState, teller: &dyn StoryTeller) -> Result<(), EntryError> {
    check_ready(&state.drafts)?;
    state.fortune = None;
    state.story = None;
    match state.mode {
        Mode::Spiral => {
            state.step_input = if state.last_step_count > 0 {
                state.last_step_count.to_string()
            } else {
                String::new()
            };
            state.screen = Screen::Spiral;
            Ok(())
        }
        Mode::Random | Mode::Story => resolve_now(state, teller),
    }
}

fn resolve_now(state: &mut MashState, teller: &dyn StoryTeller) -> Result<(), EntryError> {
    let registry = build_registry(&state.drafts)?;
    let run_state = resolve_random(registry, &mut state.rng_state);
    let fortune = extract(&run_state)?;
    let story = match state.mode {
        Mode::Story => Some(teller.tell(&fortune)),
        _ => None,
    };
    finish(state, fortune, None, story);
    Ok(())
}

/// Leave the Spiral screen and start paced counting.
pub fn begin_counting(state: &mut MashState) -> Result<(), EntryError> {
    let n = parse_step_count(&state.step_input)?;
    let run = EliminationRun::new(build_registry(&state.drafts)?, n)?;
    info!(
        "spiral game started: {} candidates, step count {}",
        run.state().candidates.len(),
        n
    );
    state.last_step_count = n;
    state.dirty = true;
    state.playback = Some(Playback::new(run));
    state.screen = Screen::Counting;
    state.add_log(&format!("{} つずつ数えます", n));
    Ok(())
}

pub fn tick(state: &mut MashState, delta_ticks: u32) {
    for _ in 0..delta_ticks {
        if state.screen != Screen::Counting {
            return;
        }
        step_playback(state);
    }
}

fn step_playback(state: &mut MashState) {
    let Some(pb) = state.playback.as_mut() else {
        return;
    };
    if pb.pause > 0 {
        pb.pause -= 1;
        return;
    }

    let mut messages = Vec::new();
    let counting = pb
        .current
        .as_ref()
        .is_some_and(|e| pb.cursor < e.path.len());

    if counting {
        if let Some(event) = &pb.current {
            let len = event.path.len();
            let stride = len.div_ceil(MAX_PATH_TICKS).max(1);
            pb.cursor = (pb.cursor + stride).min(len);
            if pb.cursor == len {
                pb.pause = PAUSE_TICKS;
                messages.push(format!("✕ {}", event.value));
                for key in &event.finalized {
                    let state_ref = pb.run.state();
                    let label = state_ref
                        .categories
                        .iter()
                        .find(|c| &c.real_name == key)
                        .map(|c| c.nickname.as_str())
                        .unwrap_or(key.as_str());
                    if let Some(winner) = state_ref.survivors_of(key).next() {
                        messages.push(format!("★ {} は「{}」に決定！", label, winner.value));
                    }
                }
            }
        }
    } else {
        pb.current = pb.run.next();
        pb.cursor = 0;
        if pb.current.is_none() {
            complete_counting(state);
            return;
        }
    }

    for m in messages {
        state.add_log(&m);
    }
}

/// Drop the animation and resolve everything that is left at once.
pub fn skip_counting(state: &mut MashState) {
    if let Some(pb) = state.playback.as_mut() {
        let rest = pb.run.finish();
        pb.current = None;
        pb.pause = 0;
        if !rest.is_empty() {
            state.add_log(&format!("残り {} 回の消去をスキップ", rest.len()));
        }
    }
    complete_counting(state);
}

fn complete_counting(state: &mut MashState) {
    let Some(pb) = state.playback.take() else {
        return;
    };
    let step_count = pb.run.step_count();
    let run_state = pb.run.into_state();
    match extract(&run_state) {
        Ok(fortune) => finish(state, fortune, Some(step_count), None),
        Err(e) => {
            state.add_log(&e.to_string());
            state.screen = Screen::Setup;
        }
    }
}

fn finish(state: &mut MashState, fortune: Fortune, step_count: Option<u32>, story: Option<String>) {
    info!(
        "{} game finished with {} categories",
        state.mode.label(),
        fortune.len()
    );
    state.history.push(HistoryEntry {
        mode: state.mode,
        step_count,
        fortune: fortune.clone(),
        story: story.clone(),
        played_at_ms: now_ms(),
    });
    if state.history.len() > HISTORY_LIMIT {
        let excess = state.history.len() - HISTORY_LIMIT;
        state.history.drain(..excess);
    }
    state.fortune = Some(fortune);
    state.story = story;
    state.playback = None;
    state.screen = Screen::Result;
    state.dirty = true;
    state.add_log("占い完了！");
}

pub fn cycle_mode(state: &mut MashState) {
    state.mode = state.mode.next();
    state.dirty = true;
}

// ── Templates & history ───────────────────────────────────────────────

pub fn save_template(state: &mut MashState) -> Result<(), EntryError> {
    if state.templates.len() >= TEMPLATE_LIMIT {
        return Err(EntryError::Full {
            max: TEMPLATE_LIMIT,
        });
    }
    let name = format!("テンプレート {}", state.templates.len() + 1);
    state.add_log(&format!("「{}」を保存しました", name));
    state.templates.push(Template {
        name,
        drafts: state.drafts.clone(),
    });
    state.dirty = true;
    Ok(())
}

pub fn load_template(state: &mut MashState, idx: usize) {
    if let Some(t) = state.templates.get(idx) {
        state.drafts = t.drafts.clone();
        state.dirty = true;
        let msg = format!("「{}」を読み込みました", t.name);
        state.add_log(&msg);
        state.screen = Screen::Setup;
    }
}

pub fn delete_template(state: &mut MashState, idx: usize) {
    if idx < state.templates.len() {
        state.templates.remove(idx);
        state.dirty = true;
    }
}

pub fn clear_history(state: &mut MashState) {
    state.history.clear();
    state.dirty = true;
    state.add_log("履歴を消去しました");
}
