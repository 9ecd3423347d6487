//! MASH rendering (read-only from state).

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TextField};

use super::actions::*;
use super::state::{
    CategoryDraft, MashState, Mode, Playback, Screen, MAX_ANSWERS, MAX_CATEGORIES, MIN_ANSWERS,
};

pub fn render(state: &MashState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let is_narrow = is_narrow_layout(area.width);
    let borders = if is_narrow {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(6)])
        .split(area);

    match &state.screen {
        Screen::Setup => render_setup(state, f, chunks[0], borders, click_state),
        Screen::Edit(idx) => render_edit(state, *idx, f, chunks[0], borders, click_state),
        Screen::NewCategory => render_new_category(state, f, chunks[0], borders, click_state),
        Screen::Spiral => render_spiral(state, f, chunks[0], borders, click_state),
        Screen::Counting => render_counting(state, f, chunks[0], borders, click_state),
        Screen::Result => render_result(state, f, chunks[0], borders, click_state),
        Screen::History => render_history(state, f, chunks[0], borders, click_state),
        Screen::Templates => render_templates(state, f, chunks[0], borders, click_state),
    }
    render_log(state, f, chunks[1], borders);
}

fn titled_block(title: &str, borders: Borders, color: Color) -> Block<'static> {
    Block::default()
        .borders(borders)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

fn back_line() -> Line<'static> {
    Line::from(Span::styled(" [-] 戻る", Style::default().fg(Color::DarkGray)))
}

fn key_span(key: &str) -> Span<'static> {
    Span::styled(
        format!(" [{}] ", key),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

// ── Setup Screen ───────────────────────────────────────────────────────

fn draft_color(draft: &CategoryDraft) -> Color {
    if (MIN_ANSWERS..=MAX_ANSWERS).contains(&draft.answers.len()) {
        Color::Green
    } else {
        Color::Red
    }
}

fn render_setup(
    state: &MashState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();

    cl.push_clickable(
        Line::from(vec![
            key_span("M"),
            Span::styled("モード: ", Style::default().fg(Color::Gray)),
            Span::styled(
                state.mode.label(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        CYCLE_MODE,
    );
    cl.push(Line::from(""));

    for (i, draft) in state.drafts.iter().enumerate() {
        let count = draft.answers.len();
        let preview = if draft.answers.is_empty() {
            "(未入力)".to_string()
        } else {
            draft.answers.join(", ")
        };
        cl.push_clickable(
            Line::from(vec![
                key_span(&(i + 1).to_string()),
                Span::styled(
                    format!("{} {} ", draft.category.icon, draft.category.nickname),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("({}/{}) ", count, MAX_ANSWERS),
                    Style::default().fg(draft_color(draft)),
                ),
                Span::styled(preview, Style::default().fg(Color::DarkGray)),
            ]),
            EDIT_CATEGORY_BASE + i as u16,
        );
    }
    cl.push(Line::from(""));

    let start_style = if state.is_ready() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    cl.push_clickable(
        Line::from(vec![key_span("P"), Span::styled("占う！", start_style)]),
        START_GAME,
    );
    if state.drafts.len() < MAX_CATEGORIES {
        cl.push_clickable(
            Line::from(vec![key_span("A"), Span::raw("カテゴリを追加")]),
            ADD_CATEGORY,
        );
    }
    cl.push_clickable(
        Line::from(vec![key_span("S"), Span::raw("テンプレートとして保存")]),
        SAVE_TEMPLATE,
    );
    cl.push_clickable(
        Line::from(vec![
            key_span("T"),
            Span::raw(format!("テンプレート ({})", state.templates.len())),
        ]),
        GO_TEMPLATES,
    );
    cl.push_clickable(
        Line::from(vec![
            key_span("H"),
            Span::raw(format!("履歴 ({})", state.history.len())),
        ]),
        GO_HISTORY,
    );
    cl.push_clickable(
        Line::from(vec![key_span("X"), Span::raw("答えをリセット")]),
        RESET_ANSWERS,
    );

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    let block = titled_block("MASH - 未来占い", borders, Color::Cyan);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Edit / New Category ────────────────────────────────────────────────

fn render_edit(
    state: &MashState,
    idx: usize,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let Some(draft) = state.drafts.get(idx) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let mut cs = click_state.borrow_mut();
    TextField::new(&state.input)
        .placeholder("答えを入力して Enter")
        .block(titled_block(
            &format!("{} {}", draft.category.icon, draft.category.nickname),
            borders,
            Color::Yellow,
        ))
        .on_submit(SUBMIT_ENTRY)
        .render(f, chunks[0], &mut cs);

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        format!(
            " 答え {}/{} (最低 {} 個)  タップで削除",
            draft.answers.len(),
            MAX_ANSWERS,
            MIN_ANSWERS
        ),
        Style::default().fg(draft_color(draft)),
    )));
    for (i, answer) in draft.answers.iter().enumerate() {
        cl.push_clickable(
            Line::from(vec![
                Span::styled("  ✕ ", Style::default().fg(Color::Red)),
                Span::styled(answer.as_str(), Style::default().fg(Color::White)),
            ]),
            REMOVE_ANSWER_BASE + i as u16,
        );
    }
    cl.push(Line::from(""));
    if !draft.category.is_default {
        cl.push_clickable(
            Line::from(Span::styled(
                "  このカテゴリを削除",
                Style::default().fg(Color::Red),
            )),
            REMOVE_CATEGORY,
        );
    }
    cl.push_clickable(back_line(), BACK);

    cl.register_targets(chunks[1], &mut cs, 1, 1);
    let block = titled_block("答えの編集", borders, Color::Cyan);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), chunks[1]);
}

fn render_new_category(
    state: &MashState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let mut cs = click_state.borrow_mut();
    TextField::new(&state.input)
        .placeholder("例: ペット")
        .block(titled_block("新しいカテゴリ", borders, Color::Yellow))
        .on_submit(SUBMIT_ENTRY)
        .render(f, chunks[0], &mut cs);

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        format!(
            " カテゴリ {}/{}  名前を入力して Enter",
            state.drafts.len(),
            MAX_CATEGORIES
        ),
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(""));
    cl.push_clickable(back_line(), BACK);

    cl.register_targets(chunks[1], &mut cs, 1, 1);
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), chunks[1]);
}

// ── Spiral Screen ──────────────────────────────────────────────────────

fn render_spiral(
    state: &MashState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Step count
            Constraint::Length(3), // Keypad
            Constraint::Min(4),    // Actions
        ])
        .split(area);

    let shown = if state.step_input.is_empty() {
        "--".to_string()
    } else {
        state.step_input.clone()
    };
    let header = vec![
        Line::from(Span::styled(
            "渦巻きの輪の数 = ステップ数",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            shown,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .block(titled_block("渦巻き", borders, Color::Magenta)),
        chunks[0],
    );

    let mut cs = click_state.borrow_mut();

    let keypad_block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    let keypad_inner = keypad_block.inner(chunks[1]);
    f.render_widget(keypad_block, chunks[1]);
    let digits = [1u16, 2, 3, 4, 5, 6, 7, 8, 9, 0];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(digits.iter().map(|_| Constraint::Ratio(1, digits.len() as u32)))
        .split(keypad_inner);
    for (cell, digit) in cells.iter().zip(digits) {
        f.render_widget(
            Paragraph::new(Span::styled(
                digit.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            *cell,
        );
        cs.add_click_target(*cell, STEP_DIGIT_BASE + digit);
    }

    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(vec![key_span("D"), Span::raw("渦巻きを描く (ランダム)")]),
        DRAW_SPIRAL,
    );
    cl.push_clickable(
        Line::from(vec![key_span("C"), Span::raw("クリア")]),
        STEP_CLEAR,
    );
    cl.push_clickable(
        Line::from(vec![
            key_span("Enter"),
            Span::styled(
                "数え始める",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        BEGIN_COUNTING,
    );
    cl.push_clickable(back_line(), BACK);

    cl.register_targets(chunks[2], &mut cs, 1, 1);
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), chunks[2]);
}

// ── Counting Screen ────────────────────────────────────────────────────

/// One line per category: its candidates, styled by elimination status.
fn board_lines(pb: &Playback) -> Vec<Line<'static>> {
    let run = pb.run.state();
    let highlighted = pb.highlighted();
    let pending_finals: &[String] = match &pb.current {
        Some(event) if !pb.is_revealed(event.index) => &event.finalized,
        _ => &[],
    };

    run.categories
        .iter()
        .map(|category| {
            let mut spans = vec![Span::styled(
                format!(" {} {}: ", category.icon, category.nickname),
                Style::default().fg(Color::Gray),
            )];
            let finalized_now = !pending_finals.contains(&category.real_name);
            for (i, item) in run
                .candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.category == category.real_name)
            {
                let style = if highlighted == Some(i) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else if item.eliminated && run.pointed == Some(i) && pb.is_revealed(i) {
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else if item.eliminated && pb.is_revealed(i) {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else if item.is_final && finalized_now {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                spans.push(Span::styled(item.value.clone(), style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect()
}

fn render_counting(
    state: &MashState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let Some(pb) = &state.playback else {
        return;
    };

    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(" ラウンド ", Style::default().fg(Color::Gray)),
        Span::styled(
            pb.run.state().round.to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled("  ステップ数 ", Style::default().fg(Color::Gray)),
        Span::styled(
            pb.run.step_count().to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!(
                "  消去 {}/{}",
                pb.run.state().eliminated_count(),
                pb.run.state().candidates.len()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    cl.push(Line::from(""));
    for line in board_lines(pb) {
        cl.push(line);
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(vec![key_span("Space"), Span::raw("結果までスキップ")]),
        SKIP_COUNTING,
    );

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    let block = titled_block("数えています…", borders, Color::Magenta);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Result Screen ──────────────────────────────────────────────────────

fn render_result(
    state: &MashState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();

    if let Some(fortune) = &state.fortune {
        for entry in &fortune.entries {
            cl.push(Line::from(vec![
                Span::styled(
                    format!(" {} {}: ", entry.icon, entry.label),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    entry.value.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(vec![key_span("R"), Span::raw("もう一度占う")]),
        PLAY_AGAIN,
    );
    cl.push_clickable(back_line(), BACK);

    // The story wraps, so it gets its own pane below the buttons.
    let list_area = match &state.story {
        Some(story) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(cl.len() as u16 + 2), Constraint::Min(3)])
                .split(area);
            let block = titled_block("物語", borders, Color::Magenta);
            f.render_widget(
                Paragraph::new(story.as_str())
                    .style(Style::default().fg(Color::Cyan))
                    .block(block)
                    .wrap(Wrap { trim: false }),
                chunks[1],
            );
            chunks[0]
        }
        None => area,
    };

    let mut cs = click_state.borrow_mut();
    cl.register_targets(list_area, &mut cs, 1, 1);
    let block = titled_block(
        &format!("あなたの未来 ({})", state.mode.label()),
        borders,
        Color::Green,
    );
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), list_area);
}

// ── History Screen ─────────────────────────────────────────────────────

fn render_history(
    state: &MashState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();

    // Newest first, as many as fit above the buttons.
    let room = (area.height as usize).saturating_sub(2 + 4).max(1);
    if state.history.is_empty() {
        cl.push(Line::from(Span::styled(
            " まだ占っていません",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (n, entry) in state.history.iter().enumerate().rev().take(room) {
        let mode = match (entry.mode, entry.step_count) {
            (Mode::Spiral, Some(steps)) => format!("{}({})", entry.mode.label(), steps),
            _ => entry.mode.label().to_string(),
        };
        let summary = entry
            .fortune
            .entries
            .iter()
            .map(|e| format!("{}:{}", e.label, e.value))
            .collect::<Vec<_>>()
            .join(" / ");
        cl.push(Line::from(vec![
            Span::styled(format!(" #{} ", n + 1), Style::default().fg(Color::Yellow)),
            Span::styled(format!("{} ", mode), Style::default().fg(Color::Magenta)),
            Span::styled(summary, Style::default().fg(Color::White)),
        ]));
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(vec![key_span("C"), Span::raw("履歴を消去")]),
        CLEAR_HISTORY,
    );
    cl.push_clickable(
        Line::from(vec![
            key_span("W"),
            Span::styled("すべてのデータを消去", Style::default().fg(Color::Red)),
        ]),
        WIPE_SAVE,
    );
    cl.push_clickable(back_line(), BACK);

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    let block = titled_block(
        &format!("履歴 ({})", state.history.len()),
        borders,
        Color::Cyan,
    );
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Templates Screen ───────────────────────────────────────────────────

fn render_templates(
    state: &MashState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let mut delete_rows = Vec::new();

    if state.templates.is_empty() {
        cl.push(Line::from(Span::styled(
            " テンプレートはまだありません",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, template) in state.templates.iter().enumerate() {
        delete_rows.push((cl.len() as u16, DELETE_TEMPLATE_BASE + i as u16));
        cl.push_clickable(
            Line::from(vec![
                key_span(&(i + 1).to_string()),
                Span::styled(template.name.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  ({} カテゴリ)", template.drafts.len()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled("  ✕削除", Style::default().fg(Color::Red)),
            ]),
            LOAD_TEMPLATE_BASE + i as u16,
        );
    }
    cl.push(Line::from(""));
    cl.push_clickable(back_line(), BACK);

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    // The delete button sits at the right end of each row, over the load target.
    let content_end = area.y + area.height.saturating_sub(1);
    for (line_idx, action_id) in delete_rows {
        let row = area.y + 1 + line_idx;
        if row < content_end {
            let x = area.x + area.width.saturating_sub(10);
            cs.add_click_target(Rect::new(x, row, 9.min(area.width), 1), action_id);
        }
    }

    let block = titled_block("テンプレート", borders, Color::Cyan);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Log ────────────────────────────────────────────────────────────────

fn render_log(state: &MashState, f: &mut Frame, area: Rect, borders: Borders) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let start = state.log.len().saturating_sub(max_lines);
    let lines: Vec<Line> = state.log[start..]
        .iter()
        .map(|msg| {
            Line::from(Span::styled(
                format!(" > {}", msg),
                Style::default().fg(Color::DarkGray),
            ))
        })
        .collect();

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" ログ ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::mash::logic;
    use crate::games::mash::story::TemplateStory;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn filled_state() -> MashState {
        let mut s = MashState::new();
        for (i, d) in s.drafts.iter_mut().enumerate() {
            d.answers = vec![format!("{i}-a"), format!("{i}-b"), format!("{i}-c")];
        }
        s
    }

    fn draw(state: &MashState, width: u16, height: u16) -> (String, ClickState) {
        let click_state = Rc::new(RefCell::new(ClickState::new()));
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(state, f, area, &click_state);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content.iter().map(|c| c.symbol()).collect();
        let cs = Rc::try_unwrap(click_state).ok().unwrap().into_inner();
        (text, cs)
    }

    fn has_target(cs: &ClickState, action_id: u16) -> bool {
        cs.targets.iter().any(|t| t.action_id == action_id)
    }

    #[test]
    fn setup_registers_category_targets() {
        let s = MashState::new();
        let (text, cs) = draw(&s, 80, 40);
        assert!(text.contains("Mansion"));
        for i in 0..s.drafts.len() as u16 {
            assert!(has_target(&cs, EDIT_CATEGORY_BASE + i));
        }
        assert!(has_target(&cs, START_GAME));
        assert!(has_target(&cs, CYCLE_MODE));
    }

    #[test]
    fn setup_hides_add_when_full() {
        let mut s = MashState::new();
        while s.drafts.len() < MAX_CATEGORIES {
            s.input = format!("extra{}", s.drafts.len());
            logic::submit_category(&mut s).unwrap();
        }
        let (_, cs) = draw(&s, 80, 40);
        assert!(!has_target(&cs, ADD_CATEGORY));
    }

    #[test]
    fn edit_screen_lists_removable_answers() {
        let mut s = MashState::new();
        s.screen = Screen::Edit(0);
        let (text, cs) = draw(&s, 80, 30);
        assert!(text.contains("Mansion"));
        assert!(has_target(&cs, SUBMIT_ENTRY));
        for i in 0..4 {
            assert!(has_target(&cs, REMOVE_ANSWER_BASE + i));
        }
        // Default categories cannot be removed.
        assert!(!has_target(&cs, REMOVE_CATEGORY));
    }

    #[test]
    fn spiral_keypad_has_all_digits() {
        let mut s = filled_state();
        logic::start_game(&mut s, &TemplateStory).unwrap();
        let (_, cs) = draw(&s, 80, 30);
        for d in 0..10 {
            assert!(has_target(&cs, STEP_DIGIT_BASE + d));
        }
        assert!(has_target(&cs, BEGIN_COUNTING));
    }

    #[test]
    fn counting_and_result_screens_render() {
        let mut s = filled_state();
        logic::start_game(&mut s, &TemplateStory).unwrap();
        s.step_input = "4".into();
        logic::begin_counting(&mut s).unwrap();
        logic::tick(&mut s, 5);
        let (text, cs) = draw(&s, 80, 30);
        assert!(text.contains("0-a"));
        assert!(has_target(&cs, SKIP_COUNTING));

        logic::skip_counting(&mut s);
        let (_, cs) = draw(&s, 80, 30);
        assert!(has_target(&cs, PLAY_AGAIN));
        assert!(has_target(&cs, BACK));
    }

    #[test]
    fn story_result_keeps_buttons_tappable() {
        let mut s = filled_state();
        s.mode = Mode::Story;
        logic::start_game(&mut s, &TemplateStory).unwrap();
        let (_, cs) = draw(&s, 40, 40);
        assert!(has_target(&cs, PLAY_AGAIN));
        assert!(has_target(&cs, BACK));
    }

    #[test]
    fn history_buttons_stay_visible() {
        let mut s = filled_state();
        s.mode = Mode::Random;
        for _ in 0..20 {
            logic::start_game(&mut s, &TemplateStory).unwrap();
        }
        s.screen = Screen::History;
        let (_, cs) = draw(&s, 80, 24);
        assert!(has_target(&cs, CLEAR_HISTORY));
        assert!(has_target(&cs, WIPE_SAVE));
        assert!(has_target(&cs, BACK));
    }

    #[test]
    fn template_rows_have_load_and_delete() {
        let mut s = filled_state();
        logic::save_template(&mut s).unwrap();
        s.screen = Screen::Templates;
        let (_, cs) = draw(&s, 80, 24);
        let load = cs.targets.iter().find(|t| t.action_id == LOAD_TEMPLATE_BASE).unwrap();
        let row = load.rect.y;
        assert_eq!(cs.hit_test(2, row), Some(LOAD_TEMPLATE_BASE));
        assert_eq!(cs.hit_test(75, row), Some(DELETE_TEMPLATE_BASE));
    }

    #[test]
    fn new_category_screen_renders_field() {
        let mut s = MashState::new();
        s.screen = Screen::NewCategory;
        s.input = "Pet".into();
        let (text, cs) = draw(&s, 80, 24);
        assert!(text.contains("Pet"));
        assert!(has_target(&cs, SUBMIT_ENTRY));
        assert!(has_target(&cs, BACK));
    }
}
