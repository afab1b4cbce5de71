//! App: terminal init, main loop, tick and key handling.

use crate::game::{GameEvent, GameState};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::ResolveFx;
use crate::{Args, GameConfig, Variant};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// DAS (Delayed Auto-Shift): delay before cursor movement starts repeating.
const REPEAT_DELAY_MS: u64 = 170;
/// ARR (Auto-Repeat Rate): time between repeated moves while holding.
const REPEAT_INTERVAL_MS: u64 = 50;

/// Deferred-push retry while a resolution is in flight.
const PUSH_RETRY_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    MainMenu,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Fragments: an injected row found no room.
    BoardOverflow,
    /// Edgeflow: the countdown ran out.
    TimeUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTab {
    Variant,
    Difficulty,
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub current_tab: MenuTab,
    pub selected_variant: Variant,
    pub selected_difficulty: crate::Difficulty,
    pub animation_start: Instant,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            current_tab: MenuTab::Variant,
            selected_variant: Variant::Fragments,
            selected_difficulty: crate::Difficulty::Easy,
            animation_start: Instant::now(),
        }
    }
}

pub struct App {
    args: Args,
    config: GameConfig,
    theme: Theme,
    /// Board size clamped to terminal so board + sidebar fit on screen.
    effective_board_width: u16,
    effective_board_height: u16,
    state: GameState,
    screen: Screen,
    paused: bool,
    game_start: Instant,
    game_over_reason: Option<GameOverReason>,
    /// Fragments: when the next row pushes in. None for edgeflow.
    next_push: Option<Instant>,
    /// Set while the game clock is frozen (pause, quit menu). Resuming
    /// shifts `game_start` and `next_push` by the frozen span.
    clock_stopped_at: Option<Instant>,
    repeat_state: Option<(Action, Instant)>,
    last_repeat_fire: Option<Instant>,
    fx: ResolveFx,
    menu_state: MenuState,
    quit_selected: QuitOption,
    high_score_fragments: u32,
    high_score_edgeflow: u32,
    new_high_score: bool,
    score_recorded: bool,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let (width, height) = (args.width, args.height);
        let state = GameState::new(width, height, &config);
        let screen = if args.no_menu {
            Screen::Playing
        } else {
            Screen::Menu
        };
        let now = Instant::now();
        let (high_score_fragments, high_score_edgeflow) = crate::highscores::load_high_scores();
        let mut app = Self {
            args,
            config,
            theme,
            effective_board_width: width,
            effective_board_height: height,
            state,
            screen,
            paused: false,
            game_start: now,
            game_over_reason: None,
            next_push: None,
            clock_stopped_at: None,
            repeat_state: None,
            last_repeat_fire: None,
            fx: ResolveFx::default(),
            menu_state: MenuState::default(),
            quit_selected: QuitOption::Resume,
            high_score_fragments,
            high_score_edgeflow,
            new_high_score: false,
            score_recorded: false,
        };
        app.menu_state.selected_variant = app.config.variant;
        app.menu_state.selected_difficulty = app.config.difficulty;
        if app.screen == Screen::Playing {
            app.arm_push_timer(now);
        }
        Ok(app)
    }

    /// Push interval for fragments at the current level; shorter on harder
    /// difficulties and as the level climbs.
    fn push_interval(&self) -> Duration {
        let base = self.config.push_interval_ms as f64 * self.config.difficulty.push_scale();
        let scaled = base / (1.0 + 0.08 * (self.state.level.saturating_sub(1) as f64));
        Duration::from_millis(scaled.max(1500.0) as u64)
    }

    fn arm_push_timer(&mut self, now: Instant) {
        self.next_push = match self.config.variant {
            Variant::Fragments => Some(now + self.push_interval()),
            Variant::Edgeflow => None,
        };
    }

    fn reset_game(&mut self) {
        self.config.variant = self.menu_state.selected_variant;
        self.config.difficulty = self.menu_state.selected_difficulty;
        self.config.kinds = self.config.difficulty.kind_count();
        self.state.invalidate();
        self.state = GameState::new(
            self.effective_board_width,
            self.effective_board_height,
            &self.config,
        );
        let now = Instant::now();
        self.screen = Screen::Playing;
        self.paused = false;
        self.game_start = now;
        self.game_over_reason = None;
        self.clock_stopped_at = None;
        self.repeat_state = None;
        self.last_repeat_fire = None;
        self.fx.clear();
        self.new_high_score = false;
        self.score_recorded = false;
        self.arm_push_timer(now);
    }

    fn stop_clock(&mut self, now: Instant) {
        if self.clock_stopped_at.is_none() {
            self.clock_stopped_at = Some(now);
        }
    }

    fn resume_clock(&mut self) {
        if let Some(stopped) = self.clock_stopped_at.take() {
            let frozen = stopped.elapsed();
            self.game_start += frozen;
            if let Some(at) = self.next_push {
                self.next_push = Some(at + frozen);
            }
        }
    }

    /// Fold the finished game's score into the per-variant best and persist.
    fn record_final_score(&mut self) {
        if self.score_recorded {
            return;
        }
        self.score_recorded = true;
        let best = match self.config.variant {
            Variant::Fragments => &mut self.high_score_fragments,
            Variant::Edgeflow => &mut self.high_score_edgeflow,
        };
        if self.state.score > *best {
            *best = self.state.score;
            self.new_high_score = true;
        }
        let _ = crate::highscores::save_high_scores(
            self.high_score_fragments,
            self.high_score_edgeflow,
        );
    }

    fn apply_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::MoveUp => self.state.move_cursor(0, -1),
            Action::MoveDown => self.state.move_cursor(0, 1),
            Action::MoveLeft => self.state.move_cursor(-1, 0),
            Action::MoveRight => self.state.move_cursor(1, 0),
            Action::Select => {
                self.state.click(now);
                self.repeat_state = None;
            }
            Action::Hint => {
                self.state.hint();
            }
            Action::Pause | Action::Quit | Action::None => {}
        }
    }

    fn tick_repeat(&mut self) {
        let now = Instant::now();
        let Some((action, first)) = self.repeat_state else {
            return;
        };
        if !matches!(
            action,
            Action::MoveUp | Action::MoveDown | Action::MoveLeft | Action::MoveRight
        ) {
            return;
        }
        if first.elapsed() < Duration::from_millis(REPEAT_DELAY_MS) {
            return;
        }
        let next =
            self.last_repeat_fire.unwrap_or(first) + Duration::from_millis(REPEAT_INTERVAL_MS);
        if now >= next {
            self.apply_action(action, now);
            self.last_repeat_fire = Some(now);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{
                KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
                PushKeyboardEnhancementFlags,
            },
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                size,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Enhanced keyboard gives us Release events for clean DAS/ARR.
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        // Size board to fit terminal; respect --width/--height when they fit.
        let (term_cols, term_rows) = size()?;
        let (fit_w, fit_h) = crate::ui::board_size_for_terminal_clamped(term_cols, term_rows);
        self.effective_board_width = self.args.width.min(fit_w).max(1);
        self.effective_board_height = self.args.height.min(fit_h).max(1);
        let need_resize = self.state.board.width != self.effective_board_width as usize
            || self.state.board.height != self.effective_board_height as usize;
        if need_resize {
            self.state = GameState::new(
                self.effective_board_width,
                self.effective_board_height,
                &self.config,
            );
            self.arm_push_timer(Instant::now());
        }

        let result = self.run_loop(&mut terminal);

        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.args.frame_rate.max(1.0));
        loop {
            let now = Instant::now();
            let push_interval = self.push_interval();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    self.paused,
                    self.game_over_reason,
                    self.config.time_limit,
                    self.game_start,
                    self.next_push,
                    push_interval,
                    f.area(),
                    &mut self.fx,
                    &self.menu_state,
                    now,
                    self.clock_stopped_at.unwrap_or(now),
                    !self.config.animations,
                    (self.screen == Screen::QuitMenu).then_some(self.quit_selected),
                    (self.high_score_fragments, self.high_score_edgeflow),
                    self.new_high_score,
                )
            })?;

            let frame_ms = frame_duration.as_millis().min(u32::MAX as u128) as u32;
            self.state.tick_popups(frame_ms);

            if self.screen == Screen::Playing && !self.paused {
                self.tick_repeat();
                self.state.tick_resolution(now);

                // Fragments: push a fresh row on schedule. While a turn is
                // resolving the push waits and retries shortly after.
                if self.config.variant == Variant::Fragments {
                    if let Some(at) = self.next_push {
                        if now >= at {
                            if self.state.is_locked() {
                                self.next_push =
                                    Some(now + Duration::from_millis(PUSH_RETRY_MS));
                            } else {
                                self.state.timer_push_row(now);
                                self.next_push = Some(now + self.push_interval());
                            }
                        }
                    }
                }

                // Edgeflow: countdown clock.
                if self.config.variant == Variant::Edgeflow
                    && now.duration_since(self.game_start).as_secs()
                        >= self.config.time_limit as u64
                {
                    self.game_over_reason = Some(GameOverReason::TimeUp);
                    self.screen = Screen::GameOver;
                    self.record_final_score();
                }

                for ev in self.state.drain_events() {
                    if ev == GameEvent::GameOver {
                        self.game_over_reason = Some(GameOverReason::BoardOverflow);
                        self.screen = Screen::GameOver;
                        self.record_final_score();
                    }
                }
            }

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        let action = key_to_action(key);

                        if key.kind != KeyEventKind::Press {
                            if key.kind == KeyEventKind::Release
                                && self.repeat_state.map(|(a, _)| a) == Some(action)
                            {
                                self.repeat_state = None;
                                self.last_repeat_fire = None;
                            }
                            continue;
                        }
                        // OS key repeat: our own DAS/ARR already covers it.
                        if self.repeat_state.map(|(a, _)| a) == Some(action) {
                            continue;
                        }

                        match self.screen {
                            Screen::Menu => {
                                if self.handle_menu_key(action) {
                                    return Ok(());
                                }
                            }
                            Screen::Playing => self.handle_playing_key(action),
                            Screen::QuitMenu => {
                                if self.handle_quit_menu_key(action) {
                                    return Ok(());
                                }
                            }
                            Screen::GameOver => {
                                if action == Action::Quit {
                                    return Ok(());
                                }
                                match key.code {
                                    KeyCode::Char('r') | KeyCode::Char('R') => self.reset_game(),
                                    KeyCode::Char('m') | KeyCode::Char('M') => {
                                        self.screen = Screen::Menu;
                                        self.menu_state.animation_start = Instant::now();
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Returns true when the app should exit.
    fn handle_menu_key(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveDown => {
                self.menu_state.current_tab = match self.menu_state.current_tab {
                    MenuTab::Variant => MenuTab::Difficulty,
                    MenuTab::Difficulty => MenuTab::Start,
                    MenuTab::Start => MenuTab::Variant,
                };
            }
            Action::MoveUp => {
                self.menu_state.current_tab = match self.menu_state.current_tab {
                    MenuTab::Variant => MenuTab::Start,
                    MenuTab::Difficulty => MenuTab::Variant,
                    MenuTab::Start => MenuTab::Difficulty,
                };
            }
            Action::MoveLeft | Action::MoveRight => {
                let forward = action == Action::MoveRight;
                match self.menu_state.current_tab {
                    MenuTab::Variant => {
                        self.menu_state.selected_variant =
                            match self.menu_state.selected_variant {
                                Variant::Fragments => Variant::Edgeflow,
                                Variant::Edgeflow => Variant::Fragments,
                            };
                    }
                    MenuTab::Difficulty => {
                        use crate::Difficulty::*;
                        self.menu_state.selected_difficulty =
                            match (self.menu_state.selected_difficulty, forward) {
                                (Easy, true) | (Hard, false) => Medium,
                                (Medium, true) | (Easy, false) => Hard,
                                (Hard, true) | (Medium, false) => Easy,
                            };
                    }
                    MenuTab::Start => {}
                }
            }
            Action::Select => {
                if self.menu_state.current_tab == MenuTab::Start {
                    self.reset_game();
                } else {
                    self.menu_state.current_tab = MenuTab::Start;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_playing_key(&mut self, action: Action) {
        let now = Instant::now();
        if self.paused {
            match action {
                Action::Pause => {
                    self.paused = false;
                    self.resume_clock();
                }
                Action::Quit => {
                    self.screen = Screen::QuitMenu;
                    self.quit_selected = QuitOption::Resume;
                }
                _ => {}
            }
            return;
        }
        match action {
            Action::Pause => {
                self.paused = true;
                self.stop_clock(now);
            }
            Action::Quit => {
                self.screen = Screen::QuitMenu;
                self.quit_selected = QuitOption::Resume;
                self.stop_clock(now);
            }
            _ => {
                self.apply_action(action, now);
                let repeatable = matches!(
                    action,
                    Action::MoveUp | Action::MoveDown | Action::MoveLeft | Action::MoveRight
                );
                if repeatable {
                    self.repeat_state = Some((action, now));
                    self.last_repeat_fire = None;
                }
            }
        }
    }

    /// Returns true when the app should exit.
    fn handle_quit_menu_key(&mut self, action: Action) -> bool {
        match action {
            Action::MoveDown | Action::MoveRight => {
                self.quit_selected = match self.quit_selected {
                    QuitOption::Resume => QuitOption::MainMenu,
                    QuitOption::MainMenu => QuitOption::Exit,
                    QuitOption::Exit => QuitOption::Resume,
                };
            }
            Action::MoveUp | Action::MoveLeft => {
                self.quit_selected = match self.quit_selected {
                    QuitOption::Resume => QuitOption::Exit,
                    QuitOption::MainMenu => QuitOption::Resume,
                    QuitOption::Exit => QuitOption::MainMenu,
                };
            }
            Action::Select => match self.quit_selected {
                QuitOption::Resume => {
                    self.screen = Screen::Playing;
                    if !self.paused {
                        self.resume_clock();
                    }
                }
                QuitOption::MainMenu => {
                    self.record_final_score();
                    self.screen = Screen::Menu;
                    self.menu_state.animation_start = Instant::now();
                }
                QuitOption::Exit => {
                    self.record_final_score();
                    return true;
                }
            },
            Action::Pause | Action::Quit => {
                self.screen = Screen::Playing;
                if !self.paused {
                    self.resume_clock();
                }
            }
            _ => {}
        }
        false
    }
}
