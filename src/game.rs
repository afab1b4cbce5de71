//! Game state: board, turn resolution, scoring, events.
//!
//! A turn runs removal → settle → refill → playability repair as a small
//! state machine driven by `tick_resolution`. Each step carries the
//! resolution token captured when the action was accepted; a newer action
//! (or `invalidate`) makes in-flight steps abort silently.

use crate::board::{Board, IdAlloc, TileId};
use crate::settle::Gravity;
use crate::{GameConfig, Variant, refill, settle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Matches of at least this size collapse into a bomb at the clicked cell.
pub const BOMB_GROUP_THRESHOLD: usize = 8;

/// Bombs appear (in injected rows and from oversized matches) from this level.
pub const BOMB_UNLOCK_LEVEL: u32 = 2;

/// Reshuffle budget for the playability guarantor.
pub const SHUFFLE_ATTEMPTS: u32 = 12;

/// Vote lead a challenger direction needs before gravity flips (edgeflow).
pub const VOTE_HYSTERESIS: u32 = 3;

/// Removed tiles per level.
const LEVEL_STEP: u32 = 60;

/// Animation-wait caps for the resolution steps (ms). The state machine only
/// waits up to these; it never blocks on the presentation layer.
const REMOVE_ANIM_MS: u64 = 160;
const SHIFT_ANIM_MS: u64 = 140;
const RESOLVE_PAD_MS: u64 = 60;

/// Discrete notifications for the SFX/presentation layer; fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Hit,
    Miss,
    Bomb,
    Line,
    Refill,
    LevelUp,
    GameOver,
}

/// What the score/level layer gets per resolved action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionReport {
    pub removed_count: usize,
    pub group_size: usize,
    pub created_special: bool,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Removing { token: u64, until: Instant },
    Settling { token: u64, until: Instant },
    Padding { token: u64, until: Instant },
    GameOver,
}

#[derive(Debug, Clone)]
pub struct ScorePopup {
    pub x: usize,
    pub y: usize,
    pub amount: u32,
    pub age_ms: u32,
}

/// Full game state for one run of either variant.
#[derive(Debug)]
pub struct GameState {
    pub variant: Variant,
    pub min_group: usize,
    pub kinds: u8,
    pub board: Board,
    ids: IdAlloc,
    rng: StdRng,
    phase: Phase,
    token: u64,
    /// Current gravity direction; only the edgeflow vote changes it.
    pub gravity: Gravity,
    pub cursor: (usize, usize),
    /// Group under the cursor (eligible groups and bombs only).
    pub hover: Vec<(usize, usize)>,
    /// Cells just vacated this turn, with the ids that left them; drives the
    /// removal fade. The holes are committed before compaction so the gap is
    /// visible for one beat.
    pub removing: Vec<((usize, usize), TileId)>,
    /// Ids of tiles created by the last refill, for the spawn fade.
    pub spawning: HashSet<TileId>,
    pub score: u32,
    pub level: u32,
    pub removed_total: u32,
    pub game_over: bool,
    pub popups: Vec<ScorePopup>,
    /// Times the shuffle budget ran out without reaching a playable board.
    pub shuffle_exhausted: u32,
    events: Vec<GameEvent>,
    last_report: Option<ActionReport>,
    animate: bool,
}

impl GameState {
    pub fn new(width: u16, height: u16, config: &GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut ids = IdAlloc::default();
        let (w, h) = (width as usize, height as usize);
        // Edgeflow plays on a full board; fragments opens with only the
        // bottom third seeded so the pushed rows have room to climb.
        let filled_rows = match config.variant {
            Variant::Fragments => (h / 3).max(2).min(h),
            Variant::Edgeflow => h,
        };
        let mut board = refill::seed_board(w, h, filled_rows, config.kinds, &mut ids, &mut rng);
        // Stricter opening check: one barely-legal move is not a fun start.
        board.ensure_playable_rich(
            config.min_group,
            config.min_group * 3,
            SHUFFLE_ATTEMPTS,
            &mut rng,
        );
        let mut state = Self {
            variant: config.variant,
            min_group: config.min_group,
            kinds: config.kinds,
            board,
            ids,
            rng,
            phase: Phase::Idle,
            token: 0,
            gravity: Gravity::default(),
            cursor: (w / 2, h / 2),
            hover: Vec::new(),
            removing: Vec::new(),
            spawning: HashSet::new(),
            score: 0,
            level: 1,
            removed_total: 0,
            game_over: false,
            popups: Vec::new(),
            shuffle_exhausted: 0,
            events: Vec::new(),
            last_report: None,
            animate: config.animations,
        };
        state.refresh_hover();
        state
    }

    fn anim(&self, ms: u64) -> Duration {
        if self.animate {
            Duration::from_millis(ms)
        } else {
            Duration::ZERO
        }
    }

    /// Input is gated while a turn resolves or the game is over.
    pub fn is_locked(&self) -> bool {
        self.game_over || !matches!(self.phase, Phase::Idle)
    }

    pub fn is_resolving(&self) -> bool {
        matches!(
            self.phase,
            Phase::Removing { .. } | Phase::Settling { .. } | Phase::Padding { .. }
        )
    }

    pub fn last_report(&self) -> Option<ActionReport> {
        self.last_report
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let x = (self.cursor.0 as i32 + dx).clamp(0, self.board.width as i32 - 1);
        let y = (self.cursor.1 as i32 + dy).clamp(0, self.board.height as i32 - 1);
        self.cursor = (x as usize, y as usize);
        self.refresh_hover();
    }

    /// Recompute the hover group for the cursor cell: the connected group
    /// when it is eligible, the single cell for a bomb, nothing otherwise.
    pub fn refresh_hover(&mut self) {
        self.hover.clear();
        if self.is_locked() {
            return;
        }
        let (x, y) = self.cursor;
        match self.board.get(x, y) {
            Some(t) if t.bomb => self.hover.push((x, y)),
            Some(_) => {
                let group = self.board.find_group(x, y);
                if group.len() >= self.min_group {
                    self.hover = group;
                }
            }
            None => {}
        }
    }

    /// Player confirms the cursor cell. A no-op "miss" while locked.
    pub fn click(&mut self, now: Instant) {
        if self.is_locked() {
            self.events.push(GameEvent::Miss);
            return;
        }
        let (x, y) = self.cursor;
        self.start_resolution(x, y, now);
    }

    /// Accept a match or detonation at (x, y) and commit the hole frame.
    /// Supersedes any in-flight resolution: the token moves on and stale
    /// steps become no-ops.
    pub fn start_resolution(&mut self, x: usize, y: usize, now: Instant) {
        if self.game_over {
            return;
        }
        let Some(seed) = self.board.get(x, y) else {
            self.events.push(GameEvent::Miss);
            return;
        };
        let (cells, group_size) = if seed.bomb {
            (self.board.detonate(x, y), 0)
        } else {
            let group = self.board.find_group(x, y);
            if group.len() < self.min_group {
                self.events.push(GameEvent::Miss);
                return;
            }
            let len = group.len();
            (group, len)
        };
        if cells.is_empty() {
            self.events.push(GameEvent::Miss);
            return;
        }

        self.token += 1;
        let token = self.token;
        self.hover.clear();
        self.removing.clear();

        // Oversized matches leave a bomb behind at the clicked cell; the
        // tile keeps its id, only kind/special are rewritten.
        let make_bomb = !seed.bomb
            && group_size >= BOMB_GROUP_THRESHOLD
            && self.level >= BOMB_UNLOCK_LEVEL;
        let mut removed = 0usize;
        for &(cx, cy) in &cells {
            if make_bomb && (cx, cy) == (x, y) {
                if let Some(t) = self.board.get_mut(cx, cy) {
                    t.bomb = true;
                }
                continue;
            }
            if let Some(tile) = self.board.take(cx, cy) {
                removed += 1;
                self.removing.push(((cx, cy), tile.id));
            }
        }

        self.last_report = Some(ActionReport {
            removed_count: removed,
            group_size,
            created_special: make_bomb,
        });
        self.apply_score(removed, group_size, seed.bomb, x, y);
        self.events.push(if seed.bomb { GameEvent::Bomb } else { GameEvent::Hit });
        self.phase = Phase::Removing {
            token,
            until: now + self.anim(REMOVE_ANIM_MS),
        };
    }

    /// Invalidate all in-flight resolution steps (used on reset).
    pub fn invalidate(&mut self) {
        self.token += 1;
    }

    /// Advance the resolution state machine. Steps fire once their wait cap
    /// passes and only while their captured token is still current.
    pub fn tick_resolution(&mut self, now: Instant) {
        match self.phase {
            Phase::Removing { token, until } if now >= until => {
                if token != self.token {
                    self.abort_stale();
                    return;
                }
                self.removing.clear();
                let moved = self.settle_step();
                if moved {
                    self.phase = Phase::Settling {
                        token,
                        until: now + self.anim(SHIFT_ANIM_MS),
                    };
                } else {
                    self.refill_step(token, now);
                }
            }
            Phase::Settling { token, until } if now >= until => {
                if token != self.token {
                    self.abort_stale();
                    return;
                }
                self.refill_step(token, now);
            }
            Phase::Padding { token, until } if now >= until => {
                if token != self.token {
                    self.abort_stale();
                    return;
                }
                self.spawning.clear();
                self.phase = Phase::Idle;
                self.refresh_hover();
            }
            _ => {}
        }
    }

    /// A stale step drops its animation leftovers too, so no removal
    /// remnants or spawn fades outlive the invalidated resolution.
    fn abort_stale(&mut self) {
        self.removing.clear();
        self.spawning.clear();
        self.phase = Phase::Idle;
    }

    fn settle_step(&mut self) -> bool {
        match self.variant {
            Variant::Fragments => settle::settle_down_centered(&mut self.board),
            Variant::Edgeflow => {
                self.gravity =
                    settle::vote_direction(&self.board, self.gravity, VOTE_HYSTERESIS);
                settle::settle_toward(&mut self.board, self.gravity)
            }
        }
    }

    fn refill_step(&mut self, token: u64, now: Instant) {
        self.spawning.clear();
        match self.variant {
            Variant::Fragments => {
                let bombs = self.level >= BOMB_UNLOCK_LEVEL;
                match refill::inject_row(
                    &mut self.board,
                    self.kinds,
                    bombs,
                    &mut self.ids,
                    &mut self.rng,
                ) {
                    Some(ids) => {
                        self.spawning.extend(ids);
                        self.events.push(GameEvent::Line);
                    }
                    None => {
                        self.game_over = true;
                        self.phase = Phase::GameOver;
                        self.events.push(GameEvent::GameOver);
                        return;
                    }
                }
            }
            Variant::Edgeflow => {
                let ids = refill::refill_cells(
                    &mut self.board,
                    self.kinds,
                    &mut self.ids,
                    &mut self.rng,
                );
                self.spawning.extend(ids);
                self.events.push(GameEvent::Refill);
            }
        }
        if !self
            .board
            .ensure_playable(self.min_group, SHUFFLE_ATTEMPTS, &mut self.rng)
        {
            self.shuffle_exhausted += 1;
        }
        self.phase = Phase::Padding {
            token,
            until: now + self.anim(RESOLVE_PAD_MS),
        };
    }

    /// Periodic board push (fragments). Ignored while resolving, paused by
    /// the caller, or after game over.
    pub fn timer_push_row(&mut self, now: Instant) {
        if self.variant != Variant::Fragments || self.is_locked() {
            return;
        }
        let bombs = self.level >= BOMB_UNLOCK_LEVEL;
        match refill::inject_row(
            &mut self.board,
            self.kinds,
            bombs,
            &mut self.ids,
            &mut self.rng,
        ) {
            Some(ids) => {
                self.spawning = ids.into_iter().collect();
                self.events.push(GameEvent::Line);
                if !self
                    .board
                    .ensure_playable(self.min_group, SHUFFLE_ATTEMPTS, &mut self.rng)
                {
                    self.shuffle_exhausted += 1;
                }
                // Brief pad so the spawn fade plays before input resumes.
                self.phase = Phase::Padding {
                    token: self.token,
                    until: now + self.anim(RESOLVE_PAD_MS),
                };
            }
            None => {
                self.game_over = true;
                self.phase = Phase::GameOver;
                self.events.push(GameEvent::GameOver);
            }
        }
    }

    /// Move the cursor to some legal move: a bomb if present, otherwise the
    /// seed of the first eligible group.
    pub fn hint(&mut self) -> Option<(usize, usize)> {
        if self.is_locked() {
            return None;
        }
        let mut target = self
            .board
            .tiles()
            .find(|(_, _, t)| t.bomb)
            .map(|(x, y, _)| (x, y));
        if target.is_none() {
            let mut seen = HashSet::new();
            for (x, y, t) in self.board.tiles() {
                if t.bomb || seen.contains(&(x, y)) {
                    continue;
                }
                let group = self.board.find_group(x, y);
                if group.len() >= self.min_group {
                    target = Some((x, y));
                    break;
                }
                seen.extend(group);
            }
        }
        if let Some((x, y)) = target {
            self.cursor = (x, y);
            self.refresh_hover();
        }
        target
    }

    fn apply_score(
        &mut self,
        removed: usize,
        group_size: usize,
        was_bomb: bool,
        x: usize,
        y: usize,
    ) {
        let amount = if was_bomb {
            removed as u32 * 15
        } else {
            (group_size * group_size) as u32
        };
        self.score += amount;
        self.removed_total += removed as u32;
        let new_level = 1 + self.removed_total / LEVEL_STEP;
        if new_level > self.level {
            self.level = new_level;
            self.events.push(GameEvent::LevelUp);
        }
        self.popups.push(ScorePopup { x, y, amount, age_ms: 0 });
    }

    pub fn tick_popups(&mut self, delta_ms: u32) {
        self.popups.retain_mut(|p| {
            let old_steps = p.age_ms / 150;
            p.age_ms += delta_ms;
            let new_steps = p.age_ms / 150;
            if new_steps > old_steps && p.y > 0 {
                p.y -= 1;
            }
            p.age_ms < 1500
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Difficulty;
    use crate::board::Tile;

    fn config(variant: Variant) -> GameConfig {
        GameConfig {
            variant,
            difficulty: Difficulty::Easy,
            kinds: 4,
            min_group: 3,
            seed: Some(42),
            animations: true,
            time_limit: 180,
            push_interval_ms: 8000,
        }
    }

    /// Overwrite the board with kinds from digit rows ('.' empty, 'B' bomb).
    fn load(state: &mut GameState, rows: &[&str]) {
        state.board = crate::board::tests::board_from(rows);
        state.refresh_hover();
    }

    fn resolve_fully(state: &mut GameState) {
        // Far-future ticks step through every wait cap.
        let mut far = Instant::now() + Duration::from_secs(60);
        for _ in 0..8 {
            state.tick_resolution(far);
            far += Duration::from_secs(60);
        }
    }

    #[test]
    fn full_purge_scenario() {
        // 4x4, all kind 0 except (3,3): clicking (0,0) removes 15 tiles,
        // refill replaces all 15, and the board ends playable.
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0000", "0000", "0000", "0001"]);
        state.start_resolution(0, 0, Instant::now());

        let report = state.last_report().unwrap();
        assert_eq!(report.group_size, 15);
        assert_eq!(report.removed_count, 15, "level 1: no bomb conversion yet");
        assert!(!report.created_special);
        assert_eq!(state.board.occupied_count(), 1);

        resolve_fully(&mut state);
        assert!(!state.is_locked());
        assert_eq!(state.board.occupied_count(), 16, "all 15 holes refilled");
        assert!(state.board.has_available_move(3));
        assert_eq!(state.score, 15 * 15);
    }

    #[test]
    fn undersized_group_is_a_miss() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0100", "1010", "0101", "1010"]);
        let before = state.board.clone();
        state.start_resolution(0, 0, Instant::now());
        assert_eq!(state.drain_events(), vec![GameEvent::Miss]);
        assert_eq!(state.board, before);
        assert!(!state.is_locked());
    }

    #[test]
    fn empty_cell_is_a_miss() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0000", "0000", "0000", ".001"]);
        state.start_resolution(0, 3, Instant::now());
        assert_eq!(state.drain_events(), vec![GameEvent::Miss]);
    }

    #[test]
    fn oversized_match_leaves_a_bomb() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        state.level = BOMB_UNLOCK_LEVEL;
        load(&mut state, &["0000", "0000", "1111", "2222"]);
        let clicked_id = state.board.get(1, 0).unwrap().id;
        state.start_resolution(1, 0, Instant::now());

        let report = state.last_report().unwrap();
        assert_eq!(report.group_size, 8);
        assert_eq!(report.removed_count, 7);
        assert!(report.created_special);
        let kept = state.board.get(1, 0).unwrap();
        assert!(kept.bomb);
        assert_eq!(kept.id, clicked_id, "conversion rewrites values, not identity");
    }

    #[test]
    fn bomb_click_detonates() {
        let mut state = GameState::new(5, 5, &config(Variant::Edgeflow));
        load(&mut state, &["01010", "10101", "01010", "10101", "01B10"]);
        state.cursor = (2, 4);
        state.refresh_hover();
        assert_eq!(state.hover, vec![(2, 4)], "bomb hovers alone");
        state.click(Instant::now());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Bomb));
        // Diamond of radius 2 clipped to the bottom edge around (2,4):
        // 1 + 3 + 5 cells.
        let report = state.last_report().unwrap();
        assert_eq!(report.removed_count, 9);
        assert_eq!(report.group_size, 0);
    }

    #[test]
    fn clicks_rejected_while_resolving() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0000", "1111", "0000", "1111"]);
        let now = Instant::now();
        state.cursor = (0, 0);
        state.refresh_hover();
        state.click(now);
        assert!(state.is_resolving());
        state.drain_events();
        state.click(now);
        assert_eq!(state.drain_events(), vec![GameEvent::Miss]);
    }

    #[test]
    fn newer_resolution_supersedes_older() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0000", "1111", "2222", "3333"]);
        let now = Instant::now();
        state.start_resolution(0, 0, now);
        // B starts before any of A's waits elapse.
        state.start_resolution(0, 1, now);
        resolve_fully(&mut state);
        assert!(!state.is_locked());
        // B's pipeline settled and refilled everything, including A's holes.
        assert_eq!(state.board.occupied_count(), 16);
        assert!(state.board.has_available_move(3));
    }

    #[test]
    fn invalidated_steps_are_noops() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0000", "1111", "2222", "3333"]);
        state.start_resolution(0, 0, Instant::now());
        state.invalidate();
        let holes = state.board.occupied_count();
        resolve_fully(&mut state);
        // The stale step aborted: no settle, no refill, no commit.
        assert_eq!(state.board.occupied_count(), holes);
        assert!(!state.is_locked());
    }

    #[test]
    fn invalidation_drops_animation_leftovers() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0000", "1111", "2222", "3333"]);
        state.start_resolution(0, 0, Instant::now());
        assert!(!state.removing.is_empty());
        state.invalidate();
        resolve_fully(&mut state);
        assert!(state.removing.is_empty(), "no lingering removal remnants");
        assert!(state.spawning.is_empty());
    }

    #[test]
    fn fragments_overflow_ends_the_game() {
        let mut state = GameState::new(3, 3, &config(Variant::Fragments));
        // Column 0 is a vertical group; columns 1 and 2 stay full, so the
        // row injection after removal overflows.
        load(&mut state, &["012", "021", "012"]);
        state.start_resolution(0, 0, Instant::now());
        resolve_fully(&mut state);
        assert!(state.game_over);
        assert!(state.drain_events().contains(&GameEvent::GameOver));
        // Terminal: further actions are ignored.
        state.start_resolution(1, 0, Instant::now());
        assert_eq!(state.last_report().unwrap().removed_count, 3);
    }

    #[test]
    fn fragments_resolution_injects_a_row() {
        let mut state = GameState::new(4, 4, &config(Variant::Fragments));
        load(&mut state, &["....", "....", "0333", "0012"]);
        state.start_resolution(1, 3, Instant::now());
        assert_eq!(state.last_report().unwrap().group_size, 3);
        resolve_fully(&mut state);
        assert!(!state.game_over);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Line));
        // 5 survivors plus a fresh row of 4.
        assert_eq!(state.board.occupied_count(), 9);
        for x in 0..4 {
            assert!(state.board.get(x, 3).is_some(), "bottom row injected");
        }
    }

    #[test]
    fn timer_push_overflow_ends_the_game() {
        let mut state = GameState::new(3, 3, &config(Variant::Fragments));
        load(&mut state, &["012", "120", "201"]);
        // The stack already touches the top row, so the push overflows.
        state.timer_push_row(Instant::now());
        assert!(state.game_over);
        assert!(state.drain_events().contains(&GameEvent::GameOver));
    }

    #[test]
    fn fragments_opens_with_headroom() {
        let state = GameState::new(10, 12, &config(Variant::Fragments));
        assert_eq!(state.board.occupied_count(), 40, "bottom third seeded");
        for x in 0..10 {
            assert_eq!(state.board.get(x, 0), None, "top row starts clear");
        }
    }

    #[test]
    fn fresh_fragments_game_survives_first_click() {
        let mut state = GameState::new(10, 12, &config(Variant::Fragments));
        let (x, y) = state.hint().expect("fresh board has a move");
        state.start_resolution(x, y, Instant::now());
        resolve_fully(&mut state);
        assert!(!state.game_over, "opening click must not overflow");
        assert!(state.drain_events().contains(&GameEvent::Line));
        assert!(state.board.has_available_move(3));
    }

    #[test]
    fn hint_prefers_bombs() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        let mut board = crate::board::tests::board_from(&["0100", "1010", "0101", "1010"]);
        if let Some(t) = board.get_mut(3, 3) {
            t.bomb = true;
        }
        state.board = board;
        assert_eq!(state.hint(), Some((3, 3)));
        assert_eq!(state.cursor, (3, 3));
    }

    #[test]
    fn hint_finds_eligible_group() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0101", "1010", "0101", "1110"]);
        let (x, y) = state.hint().expect("bottom row has a triple");
        assert!(state.board.find_group(x, y).len() >= 3);
    }

    #[test]
    fn edgeflow_gravity_follows_vote() {
        let mut state = GameState::new(4, 6, &config(Variant::Edgeflow));
        // Removing the kind-0 block clusters empties near the top edge, so
        // the vote flips gravity from Down to Up.
        load(&mut state, &["0001", "0001", "1101", "2323", "3232", "2323"]);
        assert_eq!(state.gravity, Gravity::Down);
        state.start_resolution(0, 0, Instant::now());
        resolve_fully(&mut state);
        assert_eq!(state.gravity, Gravity::Up);
    }

    #[test]
    fn removal_lists_each_tile_once() {
        let mut state = GameState::new(4, 4, &config(Variant::Edgeflow));
        load(&mut state, &["0000", "0000", "1111", "2222"]);
        let tile = Tile { id: 999, kind: 0, bomb: false };
        state.board.set(0, 0, Some(tile));
        state.start_resolution(0, 0, Instant::now());
        let removed_ids: Vec<TileId> = state.removing.iter().map(|&(_, id)| id).collect();
        assert!(removed_ids.contains(&999));
        let unique: HashSet<_> = removed_ids.iter().collect();
        assert_eq!(unique.len(), removed_ids.len());
    }
}
