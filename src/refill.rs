//! Refill suppliers: bottom-row injection (fragments) and in-place cell
//! refill (edgeflow), plus initial board seeding.

use crate::board::{Board, IdAlloc, Tile, TileId};
use rand::Rng;

/// Probability that an injected tile is a bomb, once bombs are unlocked.
pub const BOMB_CHANCE: f64 = 0.06;

fn random_tile(ids: &mut IdAlloc, kinds: u8, bomb_chance: f64, rng: &mut impl Rng) -> Tile {
    Tile {
        id: ids.next(),
        kind: rng.random_range(0..kinds),
        bomb: bomb_chance > 0.0 && rng.random_bool(bomb_chance),
    }
}

/// Fresh board with the bottom `filled_rows` rows occupied by plain tiles.
/// Edgeflow seeds the whole board; fragments opens with headroom so the
/// row pushes have somewhere to go.
pub fn seed_board(
    width: usize,
    height: usize,
    filled_rows: usize,
    kinds: u8,
    ids: &mut IdAlloc,
    rng: &mut impl Rng,
) -> Board {
    let mut board = Board::new(width, height);
    let first_row = height - filled_rows.min(height);
    for y in first_row..height {
        for x in 0..width {
            board.set(x, y, Some(random_tile(ids, kinds, 0.0, rng)));
        }
    }
    board
}

/// Shift the whole board up one row and inject a fresh random row at the
/// bottom. Returns the new tile ids, or `None` when the top row is already
/// occupied: the overflow is the game-over signal and the board is left
/// untouched.
pub fn inject_row(
    board: &mut Board,
    kinds: u8,
    bombs_unlocked: bool,
    ids: &mut IdAlloc,
    rng: &mut impl Rng,
) -> Option<Vec<TileId>> {
    if (0..board.width).any(|x| board.get(x, 0).is_some()) {
        return None;
    }

    for y in 1..board.height {
        for x in 0..board.width {
            let tile = board.take(x, y);
            board.set(x, y - 1, tile);
        }
    }

    let bomb_chance = if bombs_unlocked { BOMB_CHANCE } else { 0.0 };
    let mut spawned = Vec::with_capacity(board.width);
    for x in 0..board.width {
        let tile = random_tile(ids, kinds, bomb_chance, rng);
        spawned.push(tile.id);
        board.set(x, board.height - 1, Some(tile));
    }
    Some(spawned)
}

/// Fill every empty cell with a fresh plain tile. Returns the new ids for
/// the spawn animation.
pub fn refill_cells(
    board: &mut Board,
    kinds: u8,
    ids: &mut IdAlloc,
    rng: &mut impl Rng,
) -> Vec<TileId> {
    let mut spawned = Vec::new();
    for y in 0..board.height {
        for x in 0..board.width {
            if board.get(x, y).is_none() {
                let tile = random_tile(ids, kinds, 0.0, rng);
                spawned.push(tile.id);
                board.set(x, y, Some(tile));
            }
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn seeded_board_is_full_and_plain() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = IdAlloc::default();
        let board = seed_board(5, 4, 4, 4, &mut ids, &mut rng);
        assert_eq!(board.occupied_count(), 20);
        for (_, _, t) in board.tiles() {
            assert!(t.kind < 4);
            assert!(!t.bomb);
        }
    }

    #[test]
    fn partial_seed_fills_only_bottom_rows() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = IdAlloc::default();
        let board = seed_board(5, 6, 2, 4, &mut ids, &mut rng);
        assert_eq!(board.occupied_count(), 10);
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(board.get(x, y), None, "rows above the seed stay empty");
            }
        }
        for y in 4..6 {
            for x in 0..5 {
                assert!(board.get(x, y).is_some());
            }
        }
    }

    #[test]
    fn injection_shifts_up_and_fills_bottom() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut ids = IdAlloc::default();
        let mut board = Board::new(3, 3);
        let marker = Tile { id: ids.next(), kind: 1, bomb: false };
        board.set(0, 2, Some(marker));

        let spawned = inject_row(&mut board, 4, false, &mut ids, &mut rng)
            .expect("top row empty, must inject");
        assert_eq!(spawned.len(), 3);
        assert_eq!(board.get(0, 1), Some(marker), "old bottom moved up");
        for x in 0..3 {
            let t = board.get(x, 2).expect("new bottom row");
            assert!(spawned.contains(&t.id));
        }
    }

    #[test]
    fn injection_overflow_is_deterministic_noop() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ids = IdAlloc::default();
        let mut board = Board::new(4, 3);
        for x in 0..4 {
            board.set(x, 0, Some(Tile { id: ids.next(), kind: 0, bomb: false }));
        }
        let snapshot = board.clone();
        for _ in 0..5 {
            assert!(inject_row(&mut board, 4, true, &mut ids, &mut rng).is_none());
            assert_eq!(board, snapshot, "overflow must not mutate the board");
        }
    }

    #[test]
    fn refill_fills_exactly_the_holes() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut ids = IdAlloc::default();
        let mut board = seed_board(4, 4, 4, 4, &mut ids, &mut rng);
        let kept = board.get(0, 0).unwrap();
        board.take(1, 1);
        board.take(2, 3);
        board.take(3, 0);

        let spawned = refill_cells(&mut board, 4, &mut ids, &mut rng);
        assert_eq!(spawned.len(), 3);
        assert_eq!(board.occupied_count(), 16);
        assert_eq!(board.get(0, 0), Some(kept), "existing tiles untouched");
        assert!(spawned.contains(&board.get(1, 1).unwrap().id));
        for id in &spawned {
            assert!(*id >= 16, "spawned ids are fresh");
        }
    }
}
