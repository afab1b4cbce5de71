//! Layout and drawing: menu, board, sidebar, pause, game over, score popups.

use crate::app::{GameOverReason, MenuState, MenuTab, Screen};
use crate::game::GameState;
use crate::theme::Theme;
use crate::Variant;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Tiles are 2 terminal cells wide, 1 tall, so they read roughly square.
const CELL_W: u16 = 2;
const SIDEBAR_WIDTH: u16 = 26;

/// Fade durations; match the resolution wait caps in game.rs so the state
/// machine never moves on mid-fade.
const REMOVE_FADE_MS: u32 = 160;
const SPAWN_FADE_MS: u32 = 140;

/// Board size limits in cells. Zoomed-out terminals get up to MAX.
pub const MIN_BOARD_WIDTH: u16 = 6;
pub const MIN_BOARD_HEIGHT: u16 = 6;
pub const MAX_BOARD_WIDTH: u16 = 16;
pub const MAX_BOARD_HEIGHT: u16 = 16;

/// Board + border footprint in terminal cells.
fn board_pixel_size(width: u16, height: u16) -> (u16, u16) {
    (width * CELL_W + 2, height + 2)
}

/// Largest board (width, height) in cells that fits the given terminal,
/// leaving room for the sidebar and the border.
pub fn max_board_cells_for_terminal(term_cols: u16, term_rows: u16) -> (u16, u16) {
    let max_w = term_cols
        .saturating_sub(2)
        .saturating_sub(SIDEBAR_WIDTH)
        / CELL_W;
    let max_h = term_rows.saturating_sub(2);
    (max_w, max_h)
}

/// Board size that fits the terminal: at most MAX, at least 1. Small
/// terminals go below MIN so the content always fits rather than squeezing.
pub fn board_size_for_terminal_clamped(term_cols: u16, term_rows: u16) -> (u16, u16) {
    let (max_w, max_h) = max_board_cells_for_terminal(term_cols, term_rows);
    let w = max_w.min(MAX_BOARD_WIDTH).max(1);
    let h = max_h.min(MAX_BOARD_HEIGHT).max(1);
    (w, h)
}

/// TachyonFX state for one resolution: removal fade plus spawn fade-in.
#[derive(Default)]
pub struct ResolveFx {
    remove: Option<Effect>,
    spawn: Option<Effect>,
    process_time: Option<Instant>,
}

impl ResolveFx {
    pub fn clear(&mut self) {
        self.remove = None;
        self.spawn = None;
        self.process_time = None;
    }
}

/// Centered (board, sidebar) areas for the given frame area. Single source
/// of truth: the fade effects place themselves with the same split the
/// frame is drawn with.
fn game_layout(area: Rect, state: &GameState) -> (Rect, Rect) {
    let (pw, ph) = board_pixel_size(state.board.width as u16, state.board.height as u16);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    (inner[0], inner[1])
}

/// Board inner rect (inside the border) for the given frame area.
fn board_rect(area: Rect, state: &GameState) -> Rect {
    let (board_area, _) = game_layout(area, state);
    Rect {
        x: board_area.x + 1,
        y: board_area.y + 1,
        width: board_area.width.saturating_sub(2),
        height: board_area.height.saturating_sub(2),
    }
}

/// Buffer positions covered by the given board cells.
fn buffer_positions(rect: Rect, cells: &[(usize, usize)]) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for &(gx, gy) in cells {
        let x0 = rect.x + gx as u16 * CELL_W;
        let y0 = rect.y + gy as u16;
        for bx in x0..(x0 + CELL_W).min(rect.x + rect.width) {
            if y0 < rect.y + rect.height {
                set.insert((bx, y0));
            }
        }
    }
    set
}

/// Create/advance the removal fade and spawn fade-in over the board rect.
fn apply_resolve_effects(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    fx_state: &mut ResolveFx,
    now: Instant,
) {
    let rect = board_rect(area, state);
    let delta = fx_state
        .process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(Duration::ZERO);
    let tfx_delta = TfxDuration::from_millis(delta.as_millis().min(u32::MAX as u128) as u32);
    fx_state.process_time = Some(now);
    let bg = theme.bg;

    if state.removing.is_empty() {
        fx_state.remove = None;
    } else if fx_state.remove.is_none() {
        let cells: Vec<(usize, usize)> = state.removing.iter().map(|&(pos, _)| pos).collect();
        let set = buffer_positions(rect, &cells);
        let filter =
            CellFilter::PositionFn(ref_count(move |pos: Position| set.contains(&(pos.x, pos.y))));
        fx_state.remove = Some(
            fx::fade_to(bg, bg, (REMOVE_FADE_MS, Interpolation::Linear))
                .with_filter(filter)
                .with_area(rect),
        );
    }

    if state.spawning.is_empty() {
        fx_state.spawn = None;
    } else if fx_state.spawn.is_none() {
        let cells: Vec<(usize, usize)> = state
            .board
            .tiles()
            .filter(|(_, _, t)| state.spawning.contains(&t.id))
            .map(|(x, y, _)| (x, y))
            .collect();
        let set = buffer_positions(rect, &cells);
        let filter =
            CellFilter::PositionFn(ref_count(move |pos: Position| set.contains(&(pos.x, pos.y))));
        fx_state.spawn = Some(
            fx::fade_from(bg, bg, (SPAWN_FADE_MS, Interpolation::Linear))
                .with_filter(filter)
                .with_area(rect),
        );
    }

    if let Some(effect) = &mut fx_state.remove {
        frame.render_effect(effect, rect, tfx_delta);
    }
    if let Some(effect) = &mut fx_state.spawn {
        frame.render_effect(effect, rect, tfx_delta);
    }
}

/// High scores per variant: (fragments, edgeflow).
pub type HighScores = (u32, u32);

/// Draw the current screen, with optional pause overlay and quit menu.
#[allow(clippy::too_many_arguments)]
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    paused: bool,
    game_over_reason: Option<GameOverReason>,
    time_limit: u32,
    game_start: Instant,
    next_push: Option<Instant>,
    push_interval: Duration,
    area: Rect,
    fx_state: &mut ResolveFx,
    menu_state: &MenuState,
    now: Instant,
    // Game clock: equals `now` except while paused, when it stays frozen so
    // the countdown and push gauge stop visibly.
    clock_now: Instant,
    no_animation: bool,
    quit_selected: Option<crate::app::QuitOption>,
    high_scores: HighScores,
    new_high_score: bool,
) {
    match screen {
        Screen::Menu => draw_menu(frame, theme, menu_state, area, now),
        Screen::Playing => {
            draw_game(
                frame, state, theme, area, time_limit, game_start, next_push, push_interval,
                clock_now, high_scores,
            );
            if paused {
                draw_pause_overlay(frame, theme, area);
            }
            if !no_animation {
                apply_resolve_effects(frame, state, theme, area, fx_state, now);
            }
        }
        Screen::QuitMenu => {
            draw_game(
                frame, state, theme, area, time_limit, game_start, next_push, push_interval,
                clock_now, high_scores,
            );
            if let Some(opt) = quit_selected {
                draw_quit_menu(frame, theme, opt);
            }
        }
        Screen::GameOver => draw_game_over(
            frame,
            state,
            theme,
            game_over_reason,
            area,
            high_scores,
            new_high_score,
        ),
    }
}

fn draw_menu(frame: &mut Frame, theme: &Theme, menu_state: &MenuState, area: Rect, now: Instant) {
    let popup_w = 46u16;
    let popup_h = 19u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };

    let title = Line::from(vec![
        Span::styled(" purge ", Style::default().fg(theme.tile[2]).bold()),
        Span::styled(" tui ", Style::default().fg(theme.main_fg).bold()),
    ]);

    let highlight_style = Style::default().fg(Color::Black).bg(theme.tile[1]).bold();
    let selected_style = Style::default().fg(theme.tile[1]).bold();
    let normal_style = Style::default().fg(theme.main_fg);

    fn tab_style(current: bool, selected: bool, hi: Style, sel: Style, normal: Style) -> Style {
        if current {
            hi
        } else if selected {
            sel
        } else {
            normal
        }
    }

    let var_fragments = Span::styled(
        " FRAGMENTS ",
        tab_style(
            menu_state.current_tab == MenuTab::Variant
                && menu_state.selected_variant == Variant::Fragments,
            menu_state.selected_variant == Variant::Fragments,
            highlight_style,
            selected_style,
            normal_style,
        ),
    );
    let var_edgeflow = Span::styled(
        " EDGEFLOW ",
        tab_style(
            menu_state.current_tab == MenuTab::Variant
                && menu_state.selected_variant == Variant::Edgeflow,
            menu_state.selected_variant == Variant::Edgeflow,
            highlight_style,
            selected_style,
            normal_style,
        ),
    );

    let diff_span = |d: crate::Difficulty, label: &'static str| {
        Span::styled(
            label,
            tab_style(
                menu_state.current_tab == MenuTab::Difficulty
                    && menu_state.selected_difficulty == d,
                menu_state.selected_difficulty == d,
                highlight_style,
                selected_style,
                normal_style,
            ),
        )
    };
    let diff_easy = diff_span(crate::Difficulty::Easy, " EASY ");
    let diff_med = diff_span(crate::Difficulty::Medium, " MEDIUM ");
    let diff_hard = diff_span(crate::Difficulty::Hard, " HARD ");

    let start_btn = if menu_state.current_tab == MenuTab::Start {
        Span::styled(" [ START ] ", highlight_style)
    } else {
        Span::styled(" [ START ] ", normal_style)
    };

    let lines = vec![
        Line::from(""),
        title,
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            " ─ VARIANT ─ ",
            Style::default().fg(theme.div_line),
        )),
        Line::from(vec![var_fragments, Span::from("  "), var_edgeflow]),
        Line::from(""),
        Line::from(Span::styled(
            " ─ DIFFICULTY ─ ",
            Style::default().fg(theme.div_line),
        )),
        Line::from(vec![
            diff_easy,
            Span::from("  "),
            diff_med,
            Span::from("  "),
            diff_hard,
        ]),
        Line::from(""),
        Line::from(""),
        Line::from(start_btn),
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ↕ ", Style::default().fg(theme.tile[3])),
            Span::from("NAVIGATE   "),
            Span::styled(" ↔ ", Style::default().fg(theme.tile[3])),
            Span::from("CHANGE   "),
            Span::styled(" ENTER ", Style::default().fg(theme.tile[3])),
            Span::from("START"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " [Q] QUIT ",
            Style::default().fg(theme.tile[2]),
        )),
    ];

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );

    // Slide in from below on open, ease-out cubic.
    let elapsed = now.duration_since(menu_state.animation_start).as_millis() as u32;
    let t = (elapsed as f32 / 500.0).min(1.0);
    let offset_t = 1.0 - (1.0 - t).powi(3);
    let mut anim_popup = popup;
    anim_popup.y += ((1.0 - offset_t) * 10.0) as u16;

    p.render(anim_popup, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    reason: Option<GameOverReason>,
    area: Rect,
    high_scores: HighScores,
    new_high_score: bool,
) {
    let (pw, ph) = board_pixel_size(state.board.width as u16, state.board.height as u16);
    let total_w = pw + SIDEBAR_WIDTH;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(total_w) / 2,
        y: area.y + area.height.saturating_sub(ph) / 2,
        width: total_w.min(area.width),
        height: ph.min(area.height),
    };
    let title = match reason {
        Some(GameOverReason::TimeUp) => " Time's up! ",
        _ => " Board Full ",
    };
    let (best_fragments, best_edgeflow) = high_scores;
    let best = match state.variant {
        Variant::Fragments => best_fragments,
        Variant::Edgeflow => best_edgeflow,
    };
    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", state.score),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Best: {} ", best),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Level: {}   Tiles: {} ", state.level, state.removed_total),
            Style::default().fg(theme.main_fg),
        )),
    ];
    if new_high_score {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default().fg(Color::Yellow).bold(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " R — Restart    M — Menu    Q — Quit ",
        Style::default().fg(theme.main_fg),
    )));
    lines.push(Line::from(""));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" purgetui ", Style::default().fg(theme.title))),
    );
    p.render(popup, frame.buffer_mut());
}

/// Draw game: board + sidebar, centered in the full area.
#[allow(clippy::too_many_arguments)]
fn draw_game(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    time_limit: u32,
    game_start: Instant,
    next_push: Option<Instant>,
    push_interval: Duration,
    now: Instant,
    high_scores: HighScores,
) {
    let (board_area, sidebar_area) = game_layout(area, state);

    draw_board(frame, state, theme, board_area, time_limit, game_start, now);
    draw_sidebar(
        frame,
        state,
        theme,
        sidebar_area,
        next_push,
        push_interval,
        now,
        high_scores,
    );
}

fn draw_board(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    time_limit: u32,
    game_start: Instant,
    now: Instant,
) {
    let title = match state.variant {
        Variant::Edgeflow => {
            let elapsed = now.duration_since(game_start).as_secs();
            let remaining = (time_limit as u64).saturating_sub(elapsed);
            format!(
                " purgetui  Time: {:02}:{:02} ",
                remaining / 60,
                remaining % 60
            )
        }
        Variant::Fragments => " purgetui ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let hover: HashSet<(usize, usize)> = state.hover.iter().copied().collect();
    let buf = frame.buffer_mut();

    for y in 0..state.board.height {
        for x in 0..state.board.width {
            let rx = inner.x + x as u16 * CELL_W;
            let ry = inner.y + y as u16;
            if rx + 1 >= inner.x + inner.width || ry >= inner.y + inner.height {
                continue;
            }
            // Background tint marks hover and cursor even on empty cells.
            let bg = if (x, y) == state.cursor {
                theme.title
            } else if hover.contains(&(x, y)) {
                theme.inactive_fg
            } else {
                theme.bg
            };
            match state.board.get(x, y) {
                Some(t) if t.bomb => {
                    buf[(rx, ry)]
                        .set_symbol("◆")
                        .set_style(Style::default().fg(theme.bomb).bg(bg));
                    buf[(rx + 1, ry)]
                        .set_symbol(" ")
                        .set_style(Style::default().bg(bg));
                }
                Some(t) => {
                    // Lower seven-eighths block leaves a sliver of bg on top,
                    // so the cursor/hover tint stays visible on full cells.
                    let style = Style::default().fg(theme.tile_color(t.kind)).bg(bg);
                    buf[(rx, ry)].set_symbol("▆").set_style(style);
                    buf[(rx + 1, ry)].set_symbol("▆").set_style(style);
                }
                None => {
                    let style = Style::default().bg(bg);
                    buf[(rx, ry)].set_symbol(" ").set_style(style);
                    buf[(rx + 1, ry)].set_symbol(" ").set_style(style);
                }
            }
        }
    }

    // Cells mid-removal show a dissolving remnant for the fade to chew on.
    for &((x, y), _) in &state.removing {
        let rx = inner.x + x as u16 * CELL_W;
        let ry = inner.y + y as u16;
        if rx + 1 < inner.x + inner.width && ry < inner.y + inner.height {
            let style = Style::default().fg(theme.inactive_fg).bg(theme.bg);
            buf[(rx, ry)].set_symbol("▒").set_style(style);
            buf[(rx + 1, ry)].set_symbol("▒").set_style(style);
        }
    }

    for popup in &state.popups {
        let rx = inner.x + popup.x as u16 * CELL_W;
        let ry = inner.y + popup.y as u16;
        if rx < inner.x + inner.width && ry < inner.y + inner.height {
            let label = format!("+{}", popup.amount);
            let style = Style::default().fg(theme.title).bg(theme.bg).bold();
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_sidebar(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    next_push: Option<Instant>,
    push_interval: Duration,
    now: Instant,
    high_scores: HighScores,
) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);
    let (best_fragments, best_edgeflow) = high_scores;
    let best = match state.variant {
        Variant::Fragments => best_fragments,
        Variant::Edgeflow => best_edgeflow,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // stats
            Constraint::Length(1), // gap
            Constraint::Length(5), // variant / gravity
            Constraint::Length(1), // gap
            Constraint::Length(4), // push gauge (fragments)
        ])
        .split(area);

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[0]);
    stats_block.render(chunks[0], frame.buffer_mut());
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(state.score.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Best: ", title_style),
            Span::styled(best.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Level: ", title_style),
            Span::styled(state.level.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Tiles: ", title_style),
            Span::styled(state.removed_total.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Group: ", title_style),
            Span::styled(state.hover.len().to_string(), fg_style),
        ]),
    ];
    Paragraph::new(ratatui::text::Text::from(stats_lines))
        .render(stats_inner, frame.buffer_mut());

    let mode_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let mode_inner = mode_block.inner(chunks[2]);
    mode_block.render(chunks[2], frame.buffer_mut());
    let mut mode_lines = vec![Line::from(vec![
        Span::styled("Mode: ", title_style),
        Span::styled(state.variant.label(), fg_style),
    ])];
    if state.variant == Variant::Edgeflow {
        mode_lines.push(Line::from(vec![
            Span::styled("Flow: ", title_style),
            Span::styled(state.gravity.arrow(), fg_style.bold()),
        ]));
    } else {
        mode_lines.push(Line::from(Span::styled(
            "Tab — hint  P — pause",
            Style::default().fg(theme.inactive_fg),
        )));
    }
    Paragraph::new(ratatui::text::Text::from(mode_lines)).render(mode_inner, frame.buffer_mut());

    // Fragments: gauge counting down to the next pushed row.
    if state.variant == Variant::Fragments {
        let push_block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let push_inner = push_block.inner(chunks[4]);
        push_block.render(chunks[4], frame.buffer_mut());
        let push_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(push_inner);
        Paragraph::new(Line::from(Span::styled("Next row", title_style)))
            .render(push_layout[0], frame.buffer_mut());
        let ratio = match next_push {
            Some(at) if !push_interval.is_zero() => {
                let left = at.saturating_duration_since(now);
                (left.as_secs_f64() / push_interval.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 1.0,
        };
        let bar_color = if ratio > 0.5 {
            Color::Green
        } else if ratio > 0.2 {
            Color::Yellow
        } else {
            Color::Red
        };
        Gauge::default()
            .ratio(ratio)
            .gauge_style(Style::default().fg(bar_color))
            .render(push_layout[1], frame.buffer_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, GameConfig};

    fn small_state() -> GameState {
        GameState::new(
            4,
            4,
            &GameConfig {
                variant: Variant::Edgeflow,
                difficulty: Difficulty::Easy,
                kinds: 4,
                min_group: 3,
                seed: Some(1),
                animations: false,
                time_limit: 180,
                push_interval_ms: 9000,
            },
        )
    }

    #[test]
    fn effect_rect_matches_drawn_board() {
        let state = small_state();
        // Odd slack in both directions so the centering has a remainder;
        // the fade rect must land exactly inside the drawn board border.
        for area in [Rect::new(0, 0, 61, 17), Rect::new(3, 2, 79, 23)] {
            let (board_area, sidebar_area) = game_layout(area, &state);
            let rect = board_rect(area, &state);
            assert_eq!(rect.x, board_area.x + 1);
            assert_eq!(rect.y, board_area.y + 1);
            assert_eq!(rect.width, state.board.width as u16 * CELL_W);
            assert_eq!(rect.height, state.board.height as u16);
            assert_eq!(sidebar_area.x, board_area.x + board_area.width);
        }
    }
}

pub fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: crate::app::QuitOption) {
    let area = frame.area();
    let qw = 24;
    let qh = 8;
    let quit_rect = Rect {
        x: area.x + area.width.saturating_sub(qw) / 2,
        y: area.y + area.height.saturating_sub(qh) / 2,
        width: qw,
        height: qh,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .title(" Quit? ");

    for y in quit_rect.y..quit_rect.y + quit_rect.height {
        for x in quit_rect.x..quit_rect.x + quit_rect.width {
            frame.buffer_mut()[(x, y)].set_style(Style::default().bg(theme.bg));
        }
    }

    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (crate::app::QuitOption::Resume, " Resume "),
        (crate::app::QuitOption::MainMenu, " Main Menu "),
        (crate::app::QuitOption::Exit, " Exit "),
    ];

    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default().fg(theme.bg).bg(theme.title).bold()
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        frame.buffer_mut().set_string(rx, ry, label, style);
    }
}
