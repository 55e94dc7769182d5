//! Static position evaluation.
//!
//! Scores are in centipawns, positive favoring white. Terminal positions
//! use [`MATE_SCORE`] (checkmate) and 0 (stalemate), both outside the
//! range any static evaluation can produce.

use chess_board::{Board, MoveGuard};
use chess_core::{Color, Move, Piece};

/// Piece values in centipawns
const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;

/// Bonus per legal move for the side to move.
const MOBILITY_WEIGHT: i32 = 2;

/// Penalty per doubled or isolated pawn.
const PAWN_STRUCTURE_PENALTY: i32 = 15;

/// Score of a checkmated position, from the loser's point of view.
///
/// Larger in magnitude than any static evaluation, so a forced mate can
/// never be confused with a merely lost position during search back-up.
pub const MATE_SCORE: i32 = 100_000;

/// Piece-square tables for positional evaluation, written from white's
/// perspective with rank 8 on the first row. White pieces index with
/// `square ^ 56` (vertical flip), black pieces with the raw square index.
const PAWN_PST: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, 50, 50, 50, 50, 50, 50, 50, 50, 10, 10, 20, 30, 30, 20, 10, 10, 5, 5,
    10, 25, 25, 10, 5, 5, 0, 0, 0, 20, 20, 0, 0, 0, 5, -5, -10, 0, 0, -10, -5, 5, 5, 10, 10, -20,
    -20, 10, 10, 5, 0, 0, 0, 0, 0, 0, 0, 0,
];

const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, -40, -20, 0, 0, 0, 0, -20, -40, -30, 0, 10, 15, 15, 10,
    0, -30, -30, 5, 15, 20, 20, 15, 5, -30, -30, 0, 15, 20, 20, 15, 0, -30, -30, 5, 10, 15, 15, 10,
    5, -30, -40, -20, 0, 5, 5, 0, -20, -40, -50, -40, -30, -30, -30, -30, -40, -50,
];

const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20, -10, 0, 0, 0, 0, 0, 0, -10, -10, 0, 5, 10, 10, 5, 0,
    -10, -10, 5, 5, 10, 10, 5, 5, -10, -10, 0, 10, 10, 10, 10, 0, -10, -10, 10, 10, 10, 10, 10, 10,
    -10, -10, 5, 0, 0, 0, 0, 5, -10, -20, -10, -10, -10, -10, -10, -10, -20,
];

const ROOK_PST: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, 5, 10, 10, 10, 10, 10, 10, 5, -5, 0, 0, 0, 0, 0, 0, -5, -5, 0, 0, 0, 0,
    0, 0, -5, -5, 0, 0, 0, 0, 0, 0, -5, -5, 0, 0, 0, 0, 0, 0, -5, -5, 0, 0, 0, 0, 0, 0, -5, 0, 0,
    0, 5, 5, 0, 0, 0,
];

const QUEEN_PST: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20, -10, 0, 0, 0, 0, 0, 0, -10, -10, 0, 5, 5, 5, 5, 0, -10,
    -5, 0, 5, 5, 5, 5, 0, -5, 0, 0, 5, 5, 5, 5, 0, -5, -10, 5, 5, 5, 5, 5, 0, -10, -10, 0, 5, 0, 0,
    0, 0, -10, -20, -10, -10, -5, -5, -10, -10, -20,
];

const KING_PST: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30, -30, -40, -40, -50, -50, -40, -40, -30, -30, -40, -40,
    -50, -50, -40, -40, -30, -30, -40, -40, -50, -50, -40, -40, -30, -20, -30, -30, -40, -40, -30,
    -30, -20, -10, -20, -20, -20, -20, -20, -20, -10, 20, 20, 0, 0, 0, 0, 20, 20, 20, 30, 10, 0, 0,
    10, 30, 20,
];

const fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0,
    }
}

const fn piece_table(piece: Piece) -> &'static [i32; 64] {
    match piece {
        Piece::Pawn => &PAWN_PST,
        Piece::Knight => &KNIGHT_PST,
        Piece::Bishop => &BISHOP_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Queen => &QUEEN_PST,
        Piece::King => &KING_PST,
    }
}

/// Evaluates the current position in centipawns, positive favoring white.
///
/// Terminal positions short-circuit: checkmate scores `-MATE_SCORE` when
/// white is mated and `+MATE_SCORE` when black is, stalemate scores 0.
/// Otherwise the score is material plus piece-square placement, pawn
/// structure, and a mobility bonus for the side to move.
///
/// Takes `&mut Board` because terminal detection and mobility run the move
/// generator; the board is unchanged when the call returns apart from the
/// refreshed `checkmate`/`stalemate` flags.
pub fn evaluate_board(board: &mut Board) -> i32 {
    let moves = board.legal_moves();

    if moves.is_empty() {
        if board.checkmate {
            return match board.side_to_move {
                Color::White => -MATE_SCORE,
                Color::Black => MATE_SCORE,
            };
        }
        // Stalemate
        return 0;
    }

    let mut score = material_and_placement(board);
    score += pawn_structure(board, Color::White) - pawn_structure(board, Color::Black);

    let mobility = moves.len() as i32 * MOBILITY_WEIGHT;
    score += match board.side_to_move {
        Color::White => mobility,
        Color::Black => -mobility,
    };

    score
}

/// Evaluates the position reached by playing `mv`, leaving `board` unchanged.
///
/// Equivalent to apply, evaluate, undo; the guard keeps the make/undo
/// stack balanced.
pub fn evaluate_move(board: &mut Board, mv: Move) -> i32 {
    let mut guard = MoveGuard::new(board, mv);
    evaluate_board(&mut guard)
}

fn material_and_placement(board: &Board) -> i32 {
    let mut score = 0i32;

    for (index, entry) in board.squares.iter().enumerate() {
        let Some((color, piece)) = entry else {
            continue;
        };
        let table = piece_table(*piece);
        let idx = match color {
            Color::White => index ^ 56,
            Color::Black => index,
        };
        let value = piece_value(*piece) + table[idx];
        score += match color {
            Color::White => value,
            Color::Black => -value,
        };
    }

    score
}

/// Doubled and isolated pawn penalties for one side, as a non-positive score.
fn pawn_structure(board: &Board, color: Color) -> i32 {
    let mut per_file = [0i32; 8];
    for (index, entry) in board.squares.iter().enumerate() {
        if *entry == Some((color, Piece::Pawn)) {
            per_file[index % 8] += 1;
        }
    }

    let mut penalty = 0i32;
    for file in 0..8 {
        let count = per_file[file];
        if count == 0 {
            continue;
        }
        if count > 1 {
            penalty += (count - 1) * PAWN_STRUCTURE_PENALTY;
        }
        let left = if file > 0 { per_file[file - 1] } else { 0 };
        let right = if file < 7 { per_file[file + 1] } else { 0 };
        if left == 0 && right == 0 {
            penalty += count * PAWN_STRUCTURE_PENALTY;
        }
    }

    -penalty
}
