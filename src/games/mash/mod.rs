//! MASH: fortune telling by counting around a spiral.

pub mod actions;
pub mod engine;
pub mod error;
pub mod logic;
pub mod registry;
pub mod render;
pub mod result;
pub mod save;
pub mod state;
pub mod story;

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};

use actions::*;
use error::EntryError;
use save::KeyValueStore;
use state::{MashState, Screen, MAX_ANSWERS, MAX_CATEGORIES, TEMPLATE_LIMIT};
use story::{StoryTeller, TemplateStory};

pub struct MashGame {
    pub state: MashState,
    store: Box<dyn KeyValueStore>,
    teller: Box<dyn StoryTeller>,
}

impl MashGame {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let store: Box<dyn KeyValueStore> = Box::new(save::LocalStorage);
        #[cfg(not(target_arch = "wasm32"))]
        let store: Box<dyn KeyValueStore> = Box::new(save::MemoryStore::default());

        let mut game = Self::with_store(store);
        game.state.rng_state ^= logic::now_ms() as u64;
        game
    }

    pub fn with_store(mut store: Box<dyn KeyValueStore>) -> Self {
        let mut state = MashState::new();
        if save::load_game(&mut state, store.as_mut()) {
            state.add_log("セーブデータをロードしました");
        }
        Self {
            state,
            store,
            teller: Box::new(TemplateStory),
        }
    }

    fn report(&mut self, result: Result<(), EntryError>) {
        if let Err(e) = result {
            self.state.add_log(&e.to_string());
        }
    }

    fn persist(&mut self) {
        if !self.state.dirty {
            return;
        }
        if let Err(e) = save::save_game(&mut self.state, self.store.as_mut()) {
            warn!("MASH: failed to save: {e}");
            self.state.dirty = false;
        }
    }

    fn back_to_setup(&mut self) {
        self.state.input.clear();
        self.state.screen = Screen::Setup;
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        let screen = self.state.screen.clone();
        match action_id {
            BACK => match screen {
                Screen::Setup => false,
                Screen::Counting => {
                    logic::skip_counting(&mut self.state);
                    true
                }
                _ => {
                    self.back_to_setup();
                    true
                }
            },

            // Setup
            id if (EDIT_CATEGORY_BASE..EDIT_CATEGORY_BASE + MAX_CATEGORIES as u16).contains(&id) => {
                let idx = (id - EDIT_CATEGORY_BASE) as usize;
                if idx < self.state.drafts.len() {
                    self.state.input.clear();
                    self.state.screen = Screen::Edit(idx);
                }
                true
            }
            CYCLE_MODE => {
                logic::cycle_mode(&mut self.state);
                true
            }
            START_GAME => {
                let r = logic::start_game(&mut self.state, self.teller.as_ref());
                self.report(r);
                true
            }
            ADD_CATEGORY => {
                self.state.input.clear();
                self.state.screen = Screen::NewCategory;
                true
            }
            GO_HISTORY => {
                self.state.screen = Screen::History;
                true
            }
            GO_TEMPLATES => {
                self.state.screen = Screen::Templates;
                true
            }
            SAVE_TEMPLATE => {
                let r = logic::save_template(&mut self.state);
                self.report(r);
                true
            }
            RESET_ANSWERS => {
                logic::reset_answers(&mut self.state);
                true
            }

            // Edit / new category
            id if (REMOVE_ANSWER_BASE..REMOVE_ANSWER_BASE + MAX_ANSWERS as u16).contains(&id) => {
                if let Screen::Edit(idx) = screen {
                    logic::remove_answer(&mut self.state, idx, (id - REMOVE_ANSWER_BASE) as usize);
                }
                true
            }
            SUBMIT_ENTRY => match screen {
                Screen::Edit(idx) => {
                    let r = logic::submit_answer(&mut self.state, idx);
                    self.report(r);
                    true
                }
                Screen::NewCategory => {
                    match logic::submit_category(&mut self.state) {
                        Ok(idx) => self.state.screen = Screen::Edit(idx),
                        Err(e) => self.report(Err(e)),
                    }
                    true
                }
                _ => false,
            },
            REMOVE_CATEGORY => {
                if let Screen::Edit(idx) = screen {
                    match logic::remove_category(&mut self.state, idx) {
                        Ok(()) => self.back_to_setup(),
                        Err(e) => self.report(Err(e)),
                    }
                }
                true
            }

            // Spiral
            DRAW_SPIRAL => {
                logic::draw_spiral(&mut self.state);
                true
            }
            BEGIN_COUNTING => {
                let r = logic::begin_counting(&mut self.state);
                self.report(r);
                true
            }
            id if (STEP_DIGIT_BASE..STEP_DIGIT_BASE + 10).contains(&id) => {
                let digit = char::from(b'0' + (id - STEP_DIGIT_BASE) as u8);
                logic::push_step_digit(&mut self.state, digit);
                true
            }
            STEP_CLEAR => {
                self.state.step_input.clear();
                true
            }

            // Counting / result
            SKIP_COUNTING => {
                logic::skip_counting(&mut self.state);
                true
            }
            PLAY_AGAIN => {
                let r = logic::start_game(&mut self.state, self.teller.as_ref());
                self.report(r);
                true
            }

            // History / templates
            CLEAR_HISTORY => {
                logic::clear_history(&mut self.state);
                true
            }
            WIPE_SAVE => {
                save::delete_save(self.store.as_mut());
                self.state = MashState::new();
                self.state.add_log("すべてのデータを消去しました");
                true
            }
            id if (LOAD_TEMPLATE_BASE..LOAD_TEMPLATE_BASE + TEMPLATE_LIMIT as u16).contains(&id) => {
                logic::load_template(&mut self.state, (id - LOAD_TEMPLATE_BASE) as usize);
                true
            }
            id if (DELETE_TEMPLATE_BASE..DELETE_TEMPLATE_BASE + TEMPLATE_LIMIT as u16)
                .contains(&id) =>
            {
                logic::delete_template(&mut self.state, (id - DELETE_TEMPLATE_BASE) as usize);
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, event: &InputEvent) -> bool {
        let screen = self.state.screen.clone();
        match (&screen, event) {
            // Text entry swallows printable keys.
            (Screen::Edit(_) | Screen::NewCategory, InputEvent::Key(c)) => {
                logic::type_char(&mut self.state, *c);
                true
            }
            (Screen::Edit(_) | Screen::NewCategory, InputEvent::Backspace) => {
                logic::backspace(&mut self.state);
                true
            }
            (Screen::Edit(_) | Screen::NewCategory, InputEvent::Enter) => {
                self.handle_click(SUBMIT_ENTRY)
            }

            (Screen::Setup, InputEvent::Key(c @ '1'..='9')) => {
                self.handle_click(EDIT_CATEGORY_BASE + (*c as u8 - b'1') as u16)
            }
            (Screen::Setup, InputEvent::Key('m')) => self.handle_click(CYCLE_MODE),
            (Screen::Setup, InputEvent::Key('p') | InputEvent::Enter) => {
                self.handle_click(START_GAME)
            }
            (Screen::Setup, InputEvent::Key('a')) => self.handle_click(ADD_CATEGORY),
            (Screen::Setup, InputEvent::Key('h')) => self.handle_click(GO_HISTORY),
            (Screen::Setup, InputEvent::Key('t')) => self.handle_click(GO_TEMPLATES),
            (Screen::Setup, InputEvent::Key('s')) => self.handle_click(SAVE_TEMPLATE),
            (Screen::Setup, InputEvent::Key('x')) => self.handle_click(RESET_ANSWERS),

            (Screen::Spiral, InputEvent::Key(c @ '0'..='9')) => {
                self.handle_click(STEP_DIGIT_BASE + (*c as u8 - b'0') as u16)
            }
            (Screen::Spiral, InputEvent::Backspace) => {
                self.state.step_input.pop();
                true
            }
            (Screen::Spiral, InputEvent::Key('d')) => self.handle_click(DRAW_SPIRAL),
            (Screen::Spiral, InputEvent::Key('c')) => self.handle_click(STEP_CLEAR),
            (Screen::Spiral, InputEvent::Enter) => self.handle_click(BEGIN_COUNTING),

            (Screen::Counting, InputEvent::Key(' ') | InputEvent::Enter) => {
                self.handle_click(SKIP_COUNTING)
            }

            (Screen::Result, InputEvent::Key('r')) => self.handle_click(PLAY_AGAIN),
            (Screen::Result, InputEvent::Enter) => self.handle_click(BACK),

            (Screen::History, InputEvent::Key('c')) => self.handle_click(CLEAR_HISTORY),
            (Screen::History, InputEvent::Key('w')) => self.handle_click(WIPE_SAVE),

            (Screen::Templates, InputEvent::Key(c @ '1'..='9')) => {
                self.handle_click(LOAD_TEMPLATE_BASE + (*c as u8 - b'1') as u16)
            }

            (_, InputEvent::Escape | InputEvent::Key('-')) => self.handle_click(BACK),
            _ => false,
        }
    }
}

impl Game for MashGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = match event {
            InputEvent::Click(id) => self.handle_click(*id),
            _ => self.handle_key(event),
        };
        self.persist();
        consumed
    }

    fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, delta_ticks);
        self.persist();
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state);
    }

    fn help(&self) -> &'static str {
        match self.state.screen {
            Screen::Setup => "1-9 編集 / M モード / P 開始 / A 追加 / H 履歴 / T テンプレ",
            Screen::Edit(_) | Screen::NewCategory => "入力して Enter / Esc 戻る",
            Screen::Spiral => "数字でステップ数 / D 渦巻き / C クリア / Enter 開始",
            Screen::Counting => "Space スキップ",
            Screen::Result => "R もう一度 / Enter 戻る",
            Screen::History => "C 履歴消去 / W 全消去 / Esc 戻る",
            Screen::Templates => "1-9 読み込み / Esc 戻る",
        }
    }
}
