//! Gravity and compaction: fixed-down with center-out column packing
//! (fragments) and four-directional voted gravity (edgeflow).

use crate::board::{Board, Tile};

/// Direction tiles currently fall toward. Edgeflow mutates this through the
/// vote; fragments always use Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Gravity {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Left => "←",
            Self::Right => "→",
        }
    }
}

/// Policy A: per-column downward gravity, then whole empty columns pushed to
/// the outer edges so the occupied columns close toward the horizontal
/// centre. Returns whether any tile changed position.
pub fn settle_down_centered(board: &mut Board) -> bool {
    let before = board.cells.clone();

    compact_columns_down(board);
    pack_columns_to_center(board);

    board.cells != before
}

fn compact_columns_down(board: &mut Board) {
    for x in 0..board.width {
        let column: Vec<Tile> =
            (0..board.height).filter_map(|y| board.take(x, y)).collect();
        let base = board.height - column.len();
        for (i, tile) in column.into_iter().enumerate() {
            board.set(x, base + i, Some(tile));
        }
    }
}

/// Non-empty columns keep their relative order within each half; the left
/// half packs rightward ending at centre-left (width/2 - 1), the right half
/// packs leftward starting at centre-right (width/2).
fn pack_columns_to_center(board: &mut Board) {
    let center_right = board.width / 2;

    let mut columns: Vec<Vec<Option<Tile>>> = (0..board.width)
        .map(|x| (0..board.height).map(|y| board.get(x, y)).collect())
        .collect();
    let occupied = |col: &Vec<Option<Tile>>| col.iter().any(Option::is_some);

    let left: Vec<Vec<Option<Tile>>> = columns[..center_right]
        .iter()
        .filter(|c| occupied(c))
        .cloned()
        .collect();
    let right: Vec<Vec<Option<Tile>>> = columns[center_right..]
        .iter()
        .filter(|c| occupied(c))
        .cloned()
        .collect();

    for col in &mut columns {
        col.fill(None);
    }
    for (i, col) in left.iter().enumerate() {
        columns[center_right - left.len() + i] = col.clone();
    }
    for (i, col) in right.iter().enumerate() {
        columns[center_right + i] = col.clone();
    }

    for (x, col) in columns.into_iter().enumerate() {
        for (y, cell) in col.into_iter().enumerate() {
            board.set(x, y, cell);
        }
    }
}

/// Policy B direction vote: each empty cell votes for every direction that
/// realises its minimum distance-to-edge. The current direction keeps
/// control unless a challenger's total exceeds it by at least `hysteresis`.
pub fn vote_direction(board: &Board, current: Gravity, hysteresis: u32) -> Gravity {
    let mut votes = [0u32; 4];
    for y in 0..board.height {
        for x in 0..board.width {
            if board.get(x, y).is_some() {
                continue;
            }
            let dist = [
                y as u32,
                (board.height - 1 - y) as u32,
                x as u32,
                (board.width - 1 - x) as u32,
            ];
            let min = *dist.iter().min().unwrap();
            for (i, &d) in dist.iter().enumerate() {
                if d == min {
                    votes[i] += 1;
                }
            }
        }
    }

    let current_votes = votes[current as usize];
    let mut winner = current;
    let mut best = current_votes;
    for dir in Gravity::ALL {
        let v = votes[dir as usize];
        if dir != current && v >= current_votes + hysteresis && v > best {
            winner = dir;
            best = v;
        }
    }
    winner
}

/// Compact every lane perpendicular to `dir` toward its near end, preserving
/// relative order. Returns whether any tile changed position.
pub fn settle_toward(board: &mut Board, dir: Gravity) -> bool {
    let before = board.cells.clone();
    match dir {
        Gravity::Down => compact_columns_down(board),
        Gravity::Up => {
            for x in 0..board.width {
                let column: Vec<Tile> =
                    (0..board.height).filter_map(|y| board.take(x, y)).collect();
                for (y, tile) in column.into_iter().enumerate() {
                    board.set(x, y, Some(tile));
                }
            }
        }
        Gravity::Left => {
            for y in 0..board.height {
                let row: Vec<Tile> =
                    (0..board.width).filter_map(|x| board.take(x, y)).collect();
                for (x, tile) in row.into_iter().enumerate() {
                    board.set(x, y, Some(tile));
                }
            }
        }
        Gravity::Right => {
            for y in 0..board.height {
                let row: Vec<Tile> =
                    (0..board.width).filter_map(|x| board.take(x, y)).collect();
                let base = board.width - row.len();
                for (i, tile) in row.into_iter().enumerate() {
                    board.set(base + i, y, Some(tile));
                }
            }
        }
    }
    board.cells != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileId;

    fn board_from(rows: &[&str]) -> Board {
        crate::board::tests::board_from(rows)
    }

    fn ids_sorted(board: &Board) -> Vec<TileId> {
        let mut ids: Vec<TileId> = board.tiles().map(|(_, _, t)| t.id).collect();
        ids.sort_unstable();
        ids
    }

    fn kinds(board: &Board) -> Vec<Vec<Option<u8>>> {
        (0..board.height)
            .map(|y| (0..board.width).map(|x| board.get(x, y).map(|t| t.kind)).collect())
            .collect()
    }

    #[test]
    fn down_centered_slides_and_packs() {
        let mut board = board_from(&[
            "1.2.", //
            "....", //
            "3.4.",
        ]);
        // Tiles fall, then the lone occupied left-half column packs against
        // centre-left (x=1); the right half already starts at centre-right.
        let moved = settle_down_centered(&mut board);
        assert!(moved);
        assert_eq!(board.get(0, 2), None);
        assert_eq!(board.get(1, 1).map(|t| t.kind), Some(1));
        assert_eq!(board.get(1, 2).map(|t| t.kind), Some(3));
        assert_eq!(board.get(2, 1).map(|t| t.kind), Some(2));
        assert_eq!(board.get(2, 2).map(|t| t.kind), Some(4));
    }

    #[test]
    fn empty_columns_pushed_to_edges() {
        // Width 6: centre-left = 2, centre-right = 3. Occupied columns 0 and
        // 5 must end up at 2 and 3.
        let mut board = board_from(&["1....2"]);
        settle_down_centered(&mut board);
        assert_eq!(board.get(2, 0).map(|t| t.kind), Some(1));
        assert_eq!(board.get(3, 0).map(|t| t.kind), Some(2));
        for x in [0, 1, 4, 5] {
            assert_eq!(board.get(x, 0), None);
        }
    }

    #[test]
    fn center_pack_preserves_half_order() {
        // Left half columns 0,1,2 of width 6: occupied 0 and 2 pack to 1 and
        // 2 in the same order; right half 3..6: occupied 4,5 pack to 3,4.
        let mut board = board_from(&["1.2.34"]);
        settle_down_centered(&mut board);
        assert_eq!(
            kinds(&board),
            vec![vec![None, Some(1), Some(2), Some(3), Some(4), None]]
        );
    }

    #[test]
    fn down_centered_idempotent() {
        let mut board = board_from(&[
            "..1..", //
            ".212.", //
            "12321",
        ]);
        let first = settle_down_centered(&mut board);
        let snapshot = board.clone();
        let second = settle_down_centered(&mut board);
        assert!(!first, "already settled");
        assert!(!second);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn gravity_conserves_tiles() {
        let mut board = board_from(&["1.2", ".3.", "4.."]);
        let before = ids_sorted(&board);
        settle_down_centered(&mut board);
        assert_eq!(ids_sorted(&board), before);

        let mut board = board_from(&["1.2", ".3.", "4.."]);
        for dir in Gravity::ALL {
            settle_toward(&mut board, dir);
            assert_eq!(ids_sorted(&board), before, "{dir:?}");
        }
    }

    #[test]
    fn settle_toward_each_direction() {
        let rows = &["1.2", "...", "3.4"];

        let mut b = board_from(rows);
        settle_toward(&mut b, Gravity::Up);
        assert_eq!(
            kinds(&b),
            vec![
                vec![Some(1), None, Some(2)],
                vec![Some(3), None, Some(4)],
                vec![None, None, None]
            ]
        );

        let mut b = board_from(rows);
        settle_toward(&mut b, Gravity::Left);
        assert_eq!(
            kinds(&b),
            vec![
                vec![Some(1), Some(2), None],
                vec![None, None, None],
                vec![Some(3), Some(4), None]
            ]
        );

        let mut b = board_from(rows);
        settle_toward(&mut b, Gravity::Right);
        assert_eq!(
            kinds(&b),
            vec![
                vec![None, Some(1), Some(2)],
                vec![None, None, None],
                vec![None, Some(3), Some(4)]
            ]
        );
    }

    #[test]
    fn settle_toward_idempotent_reports_unmoved() {
        let mut board = board_from(&["12.", "3..", "..."]);
        assert!(!settle_toward(&mut board, Gravity::Up));
        let mut board = board_from(&["12.", "3..", "..."]);
        assert!(!settle_toward(&mut board, Gravity::Left));
    }

    #[test]
    fn vote_respects_hysteresis() {
        // 3 wide, 5 tall, fully occupied except the top row: three empty
        // cells all closest to the top edge.
        let mut board = board_from(&[
            "111", "111", "111", "111", "111",
        ]);
        for x in 0..3 {
            board.take(x, 0);
        }
        // Up gets 3 votes, everything else at most 1 ((0,0) and (2,0) also
        // tie with Left/Right at distance 0).
        assert_eq!(vote_direction(&board, Gravity::Up, 3), Gravity::Up);
        // Down holds: Up leads 3 to 0 but the threshold is not met at 4.
        assert_eq!(vote_direction(&board, Gravity::Down, 4), Gravity::Down);
        // Threshold met at 3: Up takes over.
        assert_eq!(vote_direction(&board, Gravity::Down, 3), Gravity::Up);
    }

    #[test]
    fn vote_ties_keep_current() {
        // Fully occupied board: zero votes everywhere, current holds.
        let board = board_from(&["11", "11"]);
        assert_eq!(vote_direction(&board, Gravity::Left, 3), Gravity::Left);
    }
}
