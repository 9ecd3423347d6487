//! MASH game state.

use serde::{Deserialize, Serialize};

use super::engine::{EliminationEvent, EliminationRun};
use super::result::Fortune;

// ── Tuning ────────────────────────────────────────────────────────────

pub const MIN_ANSWERS: usize = 2;
pub const MAX_ANSWERS: usize = 6;
pub const MAX_ANSWER_LEN: usize = 24;
/// The step-count field takes two digits.
pub const MAX_STEP_COUNT: u32 = 99;
pub const MAX_CATEGORIES: usize = 9;
pub const HISTORY_LIMIT: usize = 20;
pub const TEMPLATE_LIMIT: usize = 9;
/// Ring counts produced by "drawing" a spiral.
pub const SPIRAL_RINGS: (u32, u32) = (3, 12);
/// Longest time (in ticks) the highlight may spend on one count.
pub const MAX_PATH_TICKS: usize = 15;
/// Ticks to hold on an eliminated item before counting resumes.
pub const PAUSE_TICKS: u32 = 6;
pub const LOG_LIMIT: usize = 30;

/// A fortune-telling topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Name shown to the player.
    pub nickname: String,
    /// Stable key, unique within a game.
    pub real_name: String,
    pub icon: String,
    pub is_default: bool,
}

impl Category {
    fn builtin(real_name: &str, nickname: &str, icon: &str) -> Self {
        Self {
            nickname: nickname.into(),
            real_name: real_name.into(),
            icon: icon.into(),
            is_default: true,
        }
    }

    pub fn custom(real_name: &str, nickname: &str) -> Self {
        Self {
            nickname: nickname.into(),
            real_name: real_name.into(),
            icon: "*".into(),
            is_default: false,
        }
    }
}

/// A category together with the answers entered for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub category: Category,
    pub answers: Vec<String>,
}

/// The categories every new game starts with. Housing is prefilled with
/// the letters that give the game its name.
pub fn default_drafts() -> Vec<CategoryDraft> {
    let housing = ["Mansion", "Apartment", "Shack", "House"];
    vec![
        CategoryDraft {
            category: Category::builtin("housing", "住まい", "H"),
            answers: housing.iter().map(|s| s.to_string()).collect(),
        },
        CategoryDraft {
            category: Category::builtin("spouse", "結婚相手", "S"),
            answers: Vec::new(),
        },
        CategoryDraft {
            category: Category::builtin("job", "仕事", "J"),
            answers: Vec::new(),
        },
        CategoryDraft {
            category: Category::builtin("car", "車", "C"),
            answers: Vec::new(),
        },
        CategoryDraft {
            category: Category::builtin("kids", "子どもの数", "K"),
            answers: Vec::new(),
        },
        CategoryDraft {
            category: Category::builtin("city", "住む街", "T"),
            answers: Vec::new(),
        },
    ]
}

/// How a game resolves its categories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Count around the list and eliminate.
    #[default]
    Spiral,
    /// Pick every winner at random.
    Random,
    /// Random winners plus a narrative.
    Story,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Spiral => "渦巻き",
            Mode::Random => "ランダム",
            Mode::Story => "ストーリー",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Mode::Spiral => Mode::Random,
            Mode::Random => Mode::Story,
            Mode::Story => Mode::Spiral,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Setup,
    /// Answer entry for the category at this index.
    Edit(usize),
    NewCategory,
    /// Step-count entry before counting.
    Spiral,
    Counting,
    Result,
    History,
    Templates,
}

/// A saved set of categories and answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub drafts: Vec<CategoryDraft>,
}

/// A finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub mode: Mode,
    pub step_count: Option<u32>,
    pub fortune: Fortune,
    pub story: Option<String>,
    pub played_at_ms: f64,
}

/// Tick-paced playback of an elimination run.
pub struct Playback {
    pub run: EliminationRun,
    /// The event whose counting path is being shown.
    pub current: Option<EliminationEvent>,
    /// How many cells of `current.path` have been highlighted.
    pub cursor: usize,
    pub pause: u32,
}

impl Playback {
    pub fn new(run: EliminationRun) -> Self {
        Self {
            run,
            current: None,
            cursor: 0,
            pause: 0,
        }
    }

    /// Flat index currently highlighted, if a count is in progress.
    pub fn highlighted(&self) -> Option<usize> {
        let event = self.current.as_ref()?;
        if self.cursor == 0 {
            return None;
        }
        event.path.get(self.cursor - 1).copied()
    }

    /// The current event's item is only drawn as eliminated once its
    /// count has landed.
    pub fn is_revealed(&self, index: usize) -> bool {
        match &self.current {
            Some(event) if event.index == index => self.cursor >= event.path.len(),
            _ => true,
        }
    }
}

pub struct MashState {
    pub screen: Screen,
    pub mode: Mode,
    pub drafts: Vec<CategoryDraft>,
    /// Text entry buffer for the Edit and NewCategory screens.
    pub input: String,
    /// Digits typed on the Spiral screen.
    pub step_input: String,
    pub last_step_count: u32,
    pub playback: Option<Playback>,
    pub fortune: Option<Fortune>,
    pub story: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub templates: Vec<Template>,
    pub rng_state: u64,
    pub log: Vec<String>,
    /// Set when something persistent changed and a save is due.
    pub dirty: bool,
}

impl MashState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Setup,
            mode: Mode::Spiral,
            drafts: default_drafts(),
            input: String::new(),
            step_input: String::new(),
            last_step_count: 0,
            playback: None,
            fortune: None,
            story: None,
            history: Vec::new(),
            templates: Vec::new(),
            rng_state: 0x4d41_5348,
            log: vec!["MASH へようこそ！答えを入力して未来を占おう。".into()],
            dirty: false,
        }
    }

    pub fn add_log(&mut self, text: &str) {
        self.log.push(text.to_string());
        if self.log.len() > LOG_LIMIT {
            self.log.remove(0);
        }
    }

    /// True when every category has an acceptable number of answers.
    pub fn is_ready(&self) -> bool {
        self.drafts
            .iter()
            .all(|d| (MIN_ANSWERS..=MAX_ANSWERS).contains(&d.answers.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let s = MashState::new();
        assert_eq!(s.screen, Screen::Setup);
        assert_eq!(s.mode, Mode::Spiral);
        assert_eq!(s.drafts.len(), 6);
        assert_eq!(s.drafts[0].answers.len(), 4);
        assert!(!s.is_ready());
    }

    #[test]
    fn default_keys_are_unique() {
        let drafts = default_drafts();
        let mut keys: Vec<&str> = drafts.iter().map(|d| d.category.real_name.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), drafts.len());
        assert!(drafts.iter().all(|d| d.category.is_default));
    }

    #[test]
    fn mode_cycles_through_all() {
        let mut m = Mode::Spiral;
        m = m.next();
        assert_eq!(m, Mode::Random);
        m = m.next();
        assert_eq!(m, Mode::Story);
        m = m.next();
        assert_eq!(m, Mode::Spiral);
    }

    #[test]
    fn log_truncation() {
        let mut s = MashState::new();
        for i in 0..50 {
            s.add_log(&format!("msg {}", i));
        }
        assert!(s.log.len() <= LOG_LIMIT);
        assert_eq!(s.log.last().unwrap(), "msg 49");
    }

    #[test]
    fn ready_when_all_categories_filled() {
        let mut s = MashState::new();
        for d in &mut s.drafts {
            d.answers = vec!["x".into(), "y".into()];
        }
        assert!(s.is_ready());
        s.drafts[0].answers.push("z".into());
        assert!(s.is_ready());
        s.drafts[1].answers.clear();
        assert!(!s.is_ready());
    }
}
