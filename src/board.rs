//! Board model: tiles, group finding, bomb blasts, playability.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};

/// Manhattan radius of a bomb blast (diamond shape).
pub const BLAST_RADIUS: usize = 2;

/// Stable tile identity; survives gravity and refill so the UI can track a
/// tile across turns.
pub type TileId = u32;

/// One tile on the board. `id` is assigned once and never changes; `kind` and
/// `bomb` are only rewritten when an oversized match collapses into a bomb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    /// Colour index 0..kinds.
    pub kind: u8,
    /// Bomb tiles never join ordinary groups; they detonate.
    pub bomb: bool,
}

/// Monotonic tile id allocator. Ids are never reused within a game.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdAlloc {
    next_id: TileId,
}

impl IdAlloc {
    pub fn next(&mut self) -> TileId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Rectangular grid of optional tiles. (0,0) is top-left; x grows right,
/// y grows down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    /// Row-major: cells[y * width + x].
    pub(crate) cells: Vec<Option<Tile>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Tile> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        if x < self.width && y < self.height {
            let i = self.idx(x, y);
            self.cells[i].as_mut()
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, tile: Option<Tile>) {
        if x < self.width && y < self.height {
            let i = self.idx(x, y);
            self.cells[i] = tile;
        }
    }

    /// Remove and return the tile at (x, y).
    pub fn take(&mut self, x: usize, y: usize) -> Option<Tile> {
        if x < self.width && y < self.height {
            let i = self.idx(x, y);
            self.cells[i].take()
        } else {
            None
        }
    }

    /// All occupied cells as (x, y, tile).
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, c)| {
            c.map(|t| (i % self.width, i / self.width, t))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Maximal 4-connected same-kind component containing (x, y).
    /// Empty result for empty cells and bombs (bombs only act via detonation).
    pub fn find_group(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let seed = match self.get(x, y) {
            Some(t) if !t.bomb => t,
            _ => return Vec::new(),
        };

        let mut group = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert((x, y));
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            group.push((cx, cy));
            for (dx, dy) in [(0i32, -1i32), (0, 1), (-1, 0), (1, 0)] {
                let nx = cx as i32 + dx;
                let ny = cy as i32 + dy;
                if !self.in_bounds(nx, ny) {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if visited.contains(&(nx, ny)) {
                    continue;
                }
                if let Some(t) = self.get(nx, ny) {
                    if !t.bomb && t.kind == seed.kind {
                        visited.insert((nx, ny));
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        group
    }

    /// Cells removed by detonating the bomb at (x, y): the Manhattan-radius
    /// diamond around the origin, unioned with the diamonds of every bomb
    /// caught in the blast (chained via a trigger queue, each cell once).
    pub fn detonate(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        if self.get(x, y).is_none() {
            return Vec::new();
        }

        let r = BLAST_RADIUS as i32;
        let mut hit: Vec<(usize, usize)> = Vec::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut triggered: HashSet<(usize, usize)> = HashSet::new();
        let mut queue = VecDeque::new();
        triggered.insert((x, y));
        queue.push_back((x, y));

        while let Some((ox, oy)) = queue.pop_front() {
            for dy in -r..=r {
                let span = r - dy.abs();
                for dx in -span..=span {
                    let cx = ox as i32 + dx;
                    let cy = oy as i32 + dy;
                    if !self.in_bounds(cx, cy) {
                        continue;
                    }
                    let (cx, cy) = (cx as usize, cy as usize);
                    let Some(tile) = self.get(cx, cy) else { continue };
                    if seen.insert((cx, cy)) {
                        hit.push((cx, cy));
                    }
                    if tile.bomb && triggered.insert((cx, cy)) {
                        queue.push_back((cx, cy));
                    }
                }
            }
        }
        hit
    }

    /// True iff a legal move exists: any bomb, or any group of at least
    /// `min_group`. The seen-set only skips already-grouped cells; it does
    /// not change the answer.
    pub fn has_available_move(&self, min_group: usize) -> bool {
        let mut seen = HashSet::new();
        for (x, y, tile) in self.tiles() {
            if tile.bomb {
                return true;
            }
            if seen.contains(&(x, y)) {
                continue;
            }
            let group = self.find_group(x, y);
            if group.len() >= min_group {
                return true;
            }
            seen.extend(group);
        }
        false
    }

    /// Total number of cells participating in groups of at least `min_group`.
    /// Used by the stricter start-of-game playability check.
    pub fn eligible_cell_count(&self, min_group: usize) -> usize {
        let mut seen = HashSet::new();
        let mut count = 0;
        for (x, y, tile) in self.tiles() {
            if tile.bomb || seen.contains(&(x, y)) {
                continue;
            }
            let group = self.find_group(x, y);
            if group.len() >= min_group {
                count += group.len();
            }
            seen.extend(group);
        }
        count
    }

    /// Fisher–Yates shuffle of (kind, bomb) pairs across occupied cells.
    /// Ids stay where they are; only the values move.
    pub fn shuffle_values(&mut self, rng: &mut impl Rng) {
        let coords: Vec<(usize, usize)> =
            self.tiles().map(|(x, y, _)| (x, y)).collect();
        let mut values: Vec<(u8, bool)> = coords
            .iter()
            .map(|&(x, y)| {
                let t = self.get(x, y).unwrap();
                (t.kind, t.bomb)
            })
            .collect();
        values.shuffle(rng);
        for (&(x, y), (kind, bomb)) in coords.iter().zip(values) {
            if let Some(t) = self.get_mut(x, y) {
                t.kind = kind;
                t.bomb = bomb;
            }
        }
    }

    /// Reshuffle tile values until a legal move exists, up to `max_attempts`
    /// times. Returns whether the board is playable on return; after the
    /// budget the board is accepted as-is (bounded, never loops forever).
    pub fn ensure_playable(
        &mut self,
        min_group: usize,
        max_attempts: u32,
        rng: &mut impl Rng,
    ) -> bool {
        for _ in 0..max_attempts {
            if self.has_available_move(min_group) {
                return true;
            }
            self.shuffle_values(rng);
        }
        self.has_available_move(min_group)
    }

    /// Stricter variant for freshly seeded boards: in addition to a legal
    /// move, require at least `min_cells` cells in eligible groups, so the
    /// game never opens on a board with one barely-legal move.
    pub fn ensure_playable_rich(
        &mut self,
        min_group: usize,
        min_cells: usize,
        max_attempts: u32,
        rng: &mut impl Rng,
    ) -> bool {
        for _ in 0..max_attempts {
            if self.has_available_move(min_group)
                && self.eligible_cell_count(min_group) >= min_cells
            {
                return true;
            }
            self.shuffle_values(rng);
        }
        self.has_available_move(min_group)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Board from rows of kind digits; '.' = empty, 'B' = bomb (kind 0).
    pub(crate) fn board_from(rows: &[&str]) -> Board {
        let height = rows.len();
        let width = rows[0].len();
        let mut ids = IdAlloc::default();
        let mut board = Board::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '.' => None,
                    'B' => Some(Tile { id: ids.next(), kind: 0, bomb: true }),
                    d => Some(Tile {
                        id: ids.next(),
                        kind: d.to_digit(10).unwrap() as u8,
                        bomb: false,
                    }),
                };
                board.set(x, y, tile);
            }
        }
        board
    }

    #[test]
    fn group_is_maximal_component() {
        let board = board_from(&[
            "0010", //
            "0110", //
            "1100", //
            "0001",
        ]);
        let group = board.find_group(1, 1);
        let set: HashSet<_> = group.iter().copied().collect();
        assert_eq!(set.len(), group.len(), "each cell visited once");
        // The connected 1s: (2,0), (1,1), (2,1), (0,2), (1,2)
        let expected: HashSet<_> =
            [(2, 0), (1, 1), (2, 1), (0, 2), (1, 2)].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn group_same_from_any_member() {
        let board = board_from(&[
            "0010", //
            "0110", //
            "1100", //
            "0001",
        ]);
        let reference: HashSet<_> = board.find_group(1, 1).into_iter().collect();
        for &(x, y) in &reference.clone() {
            let from_here: HashSet<_> = board.find_group(x, y).into_iter().collect();
            assert_eq!(from_here, reference);
        }
    }

    #[test]
    fn group_excludes_bombs_and_empty() {
        let board = board_from(&[
            "00B", //
            "0.0",
        ]);
        assert!(board.find_group(2, 0).is_empty(), "bomb seed");
        assert!(board.find_group(1, 1).is_empty(), "empty seed");
        // The bomb does not bridge (1,0)'s component to (2,1).
        let group: HashSet<_> = board.find_group(0, 0).into_iter().collect();
        assert!(!group.contains(&(2, 1)));
    }

    #[test]
    fn blast_diamond_shape() {
        // Fully occupied 7x7, bomb at centre: 13 cells at Manhattan distance <= 2.
        let mut board = board_from(&[
            "0000000", "0000000", "0000000", "0000000", "0000000", "0000000",
            "0000000",
        ]);
        if let Some(t) = board.get_mut(3, 3) {
            t.bomb = true;
        }
        let hit: HashSet<_> = board.detonate(3, 3).into_iter().collect();
        let expected: HashSet<(usize, usize)> = [
            (3, 1),
            (2, 2), (3, 2), (4, 2),
            (1, 3), (2, 3), (3, 3), (4, 3), (5, 3),
            (2, 4), (3, 4), (4, 4),
            (3, 5),
        ]
        .into_iter()
        .collect();
        assert_eq!(hit, expected);
    }

    #[test]
    fn blast_chains_through_bombs() {
        let mut board = board_from(&[
            "0000000", "0000000", "0000000", "0000000", "0000000", "0000000",
            "0000000",
        ]);
        // Two bombs 2 cells apart: each inside the other's radius.
        board.get_mut(1, 3).unwrap().bomb = true;
        board.get_mut(3, 3).unwrap().bomb = true;
        let hit = board.detonate(1, 3);
        let set: HashSet<_> = hit.iter().copied().collect();
        assert_eq!(set.len(), hit.len(), "each cell removed exactly once");
        // Union of both diamonds.
        let mut expected = HashSet::new();
        for (ox, oy) in [(1i32, 3i32), (3, 3)] {
            for dy in -2i32..=2 {
                for dx in -(2 - dy.abs())..=(2 - dy.abs()) {
                    let (x, y) = (ox + dx, oy + dy);
                    if board.in_bounds(x, y) {
                        expected.insert((x as usize, y as usize));
                    }
                }
            }
        }
        assert_eq!(set, expected);
    }

    #[test]
    fn detonate_empty_origin_is_noop() {
        let mut board = board_from(&["00", "00"]);
        board.take(0, 0);
        assert!(board.detonate(0, 0).is_empty());
    }

    #[test]
    fn available_move_detection() {
        // Checkerboard of two kinds: no group of 3, no bombs.
        let board = board_from(&[
            "0101", //
            "1010", //
            "0101",
        ]);
        assert!(!board.has_available_move(3));
        assert!(board.has_available_move(1));

        let with_bomb = board_from(&["01", "1B"]);
        assert!(with_bomb.has_available_move(3), "a bomb is always a move");
    }

    #[test]
    fn ensure_playable_repairs_board() {
        let mut rng = StdRng::seed_from_u64(7);
        // 2 kinds on a 4x4 checkerboard: unplayable at min_group 3, but any
        // shuffle of 8+8 values almost surely creates a triple.
        let mut board = board_from(&[
            "0101", //
            "1010", //
            "0101", //
            "1010",
        ]);
        assert!(!board.has_available_move(3));
        let ids_before: Vec<TileId> = board.tiles().map(|(_, _, t)| t.id).collect();
        assert!(board.ensure_playable(3, 12, &mut rng));
        let ids_after: Vec<TileId> = board.tiles().map(|(_, _, t)| t.id).collect();
        assert_eq!(ids_before, ids_after, "shuffle moves values, not ids");
    }

    #[test]
    fn shuffle_preserves_value_multiset() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = board_from(&["0012", "21.0", "B102"]);
        let mut before: Vec<(u8, bool)> =
            board.tiles().map(|(_, _, t)| (t.kind, t.bomb)).collect();
        board.shuffle_values(&mut rng);
        let mut after: Vec<(u8, bool)> =
            board.tiles().map(|(_, _, t)| (t.kind, t.bomb)).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn eligible_cell_count_sums_groups() {
        let board = board_from(&[
            "000", //
            "121", //
            "111",
        ]);
        // 0-group of 3 plus the 1-group of 5 around the centre 2.
        assert_eq!(board.eligible_cell_count(3), 8);
    }
}
