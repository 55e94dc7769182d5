//! Alpha-beta minimax search.
//!
//! White maximizes and black minimizes a centipawn score. The board is
//! mutated in place under make/undo discipline during the search and is
//! structurally identical before and after every entry point.

use crate::evaluate::evaluate_board;
use chess_board::{Board, MoveGuard};
use chess_core::{Color, Move};

/// Window bound, strictly larger than any score the evaluator can return.
const INF: i32 = 1_000_000;

/// Per-root-move search breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDetail {
    /// The root move.
    pub mv: Move,
    /// Nodes visited in this move's subtree.
    pub nodes: u64,
    /// Backed-up score for this move (exact for the chosen move, possibly
    /// a bound for moves refuted by pruning).
    pub score: i32,
}

/// Statistics collected by one [`next_move_with_stats`] call.
///
/// `move_details` holds one entry per root move, in reverse visitation
/// order; subtree node counts sum to `nodes_searched`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Total nodes evaluated or expanded, root excluded.
    pub nodes_searched: u64,
    /// One entry per root move, last visited first.
    pub move_details: Vec<MoveDetail>,
}

/// Returns the best move at the given depth, or `None` when the side to
/// move has no legal moves.
///
/// Callers distinguish mate from stalemate by inspecting `board.checkmate`
/// after a `None` return.
///
/// # Panics
///
/// Panics if `depth` is zero.
pub fn next_move(board: &mut Board, depth: u32) -> Option<Move> {
    next_move_with_stats(board, depth).0
}

/// [`next_move`] plus node-count instrumentation.
///
/// Pruning never changes the chosen move relative to an exhaustive minimax
/// over the same tree: root moves are searched in generation order, only a
/// strict improvement replaces the incumbent, and a refuted move's backed-up
/// bound can never register as an improvement.
///
/// # Panics
///
/// Panics if `depth` is zero.
pub fn next_move_with_stats(board: &mut Board, depth: u32) -> (Option<Move>, SearchStats) {
    assert!(depth >= 1, "search depth must be at least 1");

    let mut stats = SearchStats::default();
    let moves = board.legal_moves();
    if moves.is_empty() {
        return (None, stats);
    }

    let maximizing = board.side_to_move == Color::White;
    let mut alpha = -INF;
    let mut beta = INF;
    let mut best: Option<Move> = None;
    let mut best_score = if maximizing { -INF } else { INF };

    for mv in moves {
        let before = stats.nodes_searched;
        let score = {
            let mut guard = MoveGuard::new(board, mv);
            alpha_beta(&mut guard, depth - 1, alpha, beta, &mut stats)
        };
        stats.move_details.push(MoveDetail {
            mv,
            nodes: stats.nodes_searched - before,
            score,
        });

        if maximizing {
            if score > best_score {
                best_score = score;
                best = Some(mv);
                alpha = score;
            }
        } else if score < best_score {
            best_score = score;
            best = Some(mv);
            beta = score;
        }
    }

    stats.move_details.reverse();
    (best, stats)
}

fn alpha_beta(
    board: &mut Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    stats: &mut SearchStats,
) -> i32 {
    stats.nodes_searched += 1;

    if depth == 0 {
        return evaluate_board(board);
    }

    let moves = board.legal_moves();
    if moves.is_empty() {
        // Mate or stalemate, scored by the evaluator's terminal rules.
        return evaluate_board(board);
    }

    if board.side_to_move == Color::White {
        let mut best = -INF;
        for mv in moves {
            let score = {
                let mut guard = MoveGuard::new(board, mv);
                alpha_beta(&mut guard, depth - 1, alpha, beta, stats)
            };
            if score > best {
                best = score;
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break;
            }
        }
        best
    } else {
        let mut best = INF;
        for mv in moves {
            let score = {
                let mut guard = MoveGuard::new(board, mv);
                alpha_beta(&mut guard, depth - 1, alpha, beta, stats)
            };
            if score < best {
                best = score;
            }
            if best < beta {
                beta = best;
            }
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_a_move_from_the_start_position() {
        let mut board = Board::new();
        let mv = next_move(&mut board, 2);
        assert!(mv.is_some());
    }

    #[test]
    #[should_panic(expected = "search depth must be at least 1")]
    fn zero_depth_is_a_contract_violation() {
        let mut board = Board::new();
        next_move(&mut board, 0);
    }

    #[test]
    fn finds_mate_in_one() {
        // After 1. f3 e5 2. g4 the black queen mates on h4.
        let mut board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2")
                .unwrap();
        let mv = next_move(&mut board, 1).unwrap();
        assert_eq!(mv.to_coord(), "d8h4");
    }

    #[test]
    fn checkmated_root_returns_none() {
        let mut board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/8/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert_eq!(next_move(&mut board, 1), None);
        assert!(board.checkmate);
    }

    #[test]
    fn stalemated_root_returns_none() {
        let mut board = Board::from_fen("7k/5Q2/8/8/8/8/8/7K b - - 0 1").unwrap();
        assert_eq!(next_move(&mut board, 2), None);
        assert!(!board.checkmate);
        assert!(board.stalemate);
    }

    #[test]
    fn board_is_unchanged_after_search() {
        let mut board = Board::new();
        let before = board.clone();

        next_move(&mut board, 3);

        assert_eq!(board, before);
    }

    #[test]
    fn stats_cover_every_root_move() {
        let mut board = Board::new();
        let root_moves = board.legal_moves();

        let (mv, stats) = next_move_with_stats(&mut board, 2);

        assert!(mv.is_some());
        assert_eq!(stats.move_details.len(), root_moves.len());
        assert!(stats.nodes_searched > 0);

        let total: u64 = stats.move_details.iter().map(|d| d.nodes).sum();
        assert_eq!(total, stats.nodes_searched);
    }

    #[test]
    fn move_details_are_in_reverse_visitation_order() {
        let mut board = Board::new();
        let root_moves = board.legal_moves();

        let (_, stats) = next_move_with_stats(&mut board, 1);

        assert_eq!(stats.move_details.last().map(|d| d.mv), root_moves.first().copied());
        assert_eq!(stats.move_details.first().map(|d| d.mv), root_moves.last().copied());
    }

    #[test]
    fn prefers_capturing_a_hanging_queen() {
        // White rook on a1 can take the undefended queen on a8.
        let mut board = Board::from_fen("q6k/8/8/8/8/8/8/R6K w - - 0 1").unwrap();
        let mv = next_move(&mut board, 2).unwrap();
        assert_eq!(mv.to_coord(), "a1a8");
    }
}
