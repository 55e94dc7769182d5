//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use crate::{Board, MoveGuard};

/// Counts the number of leaf nodes at the given depth.
///
/// This is the standard perft function used to validate move generators.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in moves {
        let mut guard = MoveGuard::new(board, m);
        nodes += perft(&mut guard, depth - 1);
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let moves = board.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in moves {
        let mut guard = MoveGuard::new(board, m);
        let nodes = if depth > 1 {
            perft(&mut guard, depth - 1)
        } else {
            1
        };
        results.push((m.to_coord(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
