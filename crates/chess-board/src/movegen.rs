//! Legal move generation.
//!
//! Pseudo-legal moves are produced per piece kind through a fixed dispatch
//! table, then filtered by trial application: a move is legal iff the
//! mover's own king is not attacked afterwards. Every trial application is
//! undone before generation returns.

use crate::board::{Board, MoveGuard};
use chess_core::{Color, Move, Piece, Square};

/// Pseudo-legal move generators, indexed by `Piece::index`.
const GENERATORS: [fn(&Board, Square, &mut Vec<Move>); 6] = [
    pawn_moves,
    knight_moves,
    bishop_moves,
    rook_moves,
    queen_moves,
    king_moves,
];

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const EVERY_DIRECTION: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl Board {
    /// Generates all legal moves for the side to move.
    ///
    /// The list is computed fresh on every call, in a deterministic order
    /// (squares a1 through h8, piece pattern order within a square). The
    /// `checkmate` and `stalemate` flags are refreshed from the result;
    /// the position itself is left unchanged.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let us = self.side_to_move;
        let mut moves = Vec::with_capacity(48);

        for sq in (0..64).filter_map(Square::from_index) {
            if let Some((color, piece)) = self.squares[sq.index() as usize] {
                if color == us {
                    GENERATORS[piece.index()](self, sq, &mut moves);
                }
            }
        }
        castling_moves(self, &mut moves);

        let mut legal = Vec::with_capacity(moves.len());
        for mv in moves {
            let keep = {
                let probe = MoveGuard::new(self, mv);
                !probe.in_check(us)
            };
            if keep {
                legal.push(mv);
            }
        }

        let in_check = self.in_check(us);
        self.checkmate = legal.is_empty() && in_check;
        self.stalemate = legal.is_empty() && !in_check;
        legal
    }

    /// Returns true if the given square is attacked by the given color.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        // Pawns attack diagonally toward their own advance direction.
        let dir = by.pawn_direction();
        for df in [-1, 1] {
            if let Some(origin) = sq.offset(df, -dir) {
                if self.squares[origin.index() as usize] == Some((by, Piece::Pawn)) {
                    return true;
                }
            }
        }

        for &(df, dr) in &KNIGHT_STEPS {
            if let Some(origin) = sq.offset(df, dr) {
                if self.squares[origin.index() as usize] == Some((by, Piece::Knight)) {
                    return true;
                }
            }
        }

        for &(df, dr) in &EVERY_DIRECTION {
            if let Some(origin) = sq.offset(df, dr) {
                if self.squares[origin.index() as usize] == Some((by, Piece::King)) {
                    return true;
                }
            }
        }

        self.ray_hits(sq, &ORTHOGONAL, by, Piece::Rook)
            || self.ray_hits(sq, &DIAGONAL, by, Piece::Bishop)
    }

    /// Returns true if the king of the given color is in check.
    pub fn in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(sq) => self.is_square_attacked(sq, color.opposite()),
            // No king only happens transiently in test positions.
            None => false,
        }
    }

    fn king_square(&self, color: Color) -> Option<Square> {
        (0..64)
            .filter_map(Square::from_index)
            .find(|sq| self.squares[sq.index() as usize] == Some((color, Piece::King)))
    }

    /// Scans each ray to the first occupied square, looking for `slider`
    /// or a queen of the attacking color.
    fn ray_hits(&self, sq: Square, rays: &[(i8, i8)], by: Color, slider: Piece) -> bool {
        for &(df, dr) in rays {
            let mut current = sq;
            while let Some(next) = current.offset(df, dr) {
                match self.squares[next.index() as usize] {
                    None => current = next,
                    Some((color, piece)) => {
                        if color == by && (piece == slider || piece == Piece::Queen) {
                            return true;
                        }
                        break;
                    }
                }
            }
        }
        false
    }
}

fn pawn_moves(board: &Board, from: Square, moves: &mut Vec<Move>) {
    let us = board.side_to_move;
    let dir = us.pawn_direction();
    let promo_rank = us.promotion_rank();

    if let Some(to) = from.offset(0, dir) {
        if board.squares[to.index() as usize].is_none() {
            if to.rank() == promo_rank {
                push_promotions(moves, from, to, None);
            } else {
                moves.push(Move::quiet(from, to, Piece::Pawn));
                if from.rank() == us.pawn_rank() {
                    if let Some(double) = from.offset(0, 2 * dir) {
                        if board.squares[double.index() as usize].is_none() {
                            moves.push(Move::double_push(from, double));
                        }
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        if let Some(to) = from.offset(df, dir) {
            match board.squares[to.index() as usize] {
                Some((color, target)) if color != us => {
                    if to.rank() == promo_rank {
                        push_promotions(moves, from, to, Some(target));
                    } else {
                        moves.push(Move::capture(from, to, Piece::Pawn, target));
                    }
                }
                None if board.en_passant == Some(to) => {
                    moves.push(Move::en_passant(from, to));
                }
                _ => {}
            }
        }
    }
}

fn push_promotions(moves: &mut Vec<Move>, from: Square, to: Square, captured: Option<Piece>) {
    for promo in Piece::PROMOTION_TARGETS {
        moves.push(Move::promotion(from, to, promo, captured));
    }
}

fn knight_moves(board: &Board, from: Square, moves: &mut Vec<Move>) {
    step_moves(board, from, Piece::Knight, &KNIGHT_STEPS, moves);
}

fn bishop_moves(board: &Board, from: Square, moves: &mut Vec<Move>) {
    ray_moves(board, from, Piece::Bishop, &DIAGONAL, moves);
}

fn rook_moves(board: &Board, from: Square, moves: &mut Vec<Move>) {
    ray_moves(board, from, Piece::Rook, &ORTHOGONAL, moves);
}

fn queen_moves(board: &Board, from: Square, moves: &mut Vec<Move>) {
    ray_moves(board, from, Piece::Queen, &EVERY_DIRECTION, moves);
}

fn king_moves(board: &Board, from: Square, moves: &mut Vec<Move>) {
    step_moves(board, from, Piece::King, &EVERY_DIRECTION, moves);
}

fn step_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    let us = board.side_to_move;
    for &(df, dr) in steps {
        if let Some(to) = from.offset(df, dr) {
            match board.squares[to.index() as usize] {
                None => moves.push(Move::quiet(from, to, piece)),
                Some((color, target)) if color != us => {
                    moves.push(Move::capture(from, to, piece, target));
                }
                Some(_) => {}
            }
        }
    }
}

fn ray_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    rays: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    let us = board.side_to_move;
    for &(df, dr) in rays {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            match board.squares[to.index() as usize] {
                None => {
                    moves.push(Move::quiet(from, to, piece));
                    current = to;
                }
                Some((color, target)) => {
                    if color != us {
                        moves.push(Move::capture(from, to, piece, target));
                    }
                    break;
                }
            }
        }
    }
}

/// Castling requires the right, empty squares between king and rook, and
/// that the king neither stands in nor passes through an attacked square.
/// The destination square is covered by the legality filter.
fn castling_moves(board: &Board, moves: &mut Vec<Move>) {
    let us = board.side_to_move;
    let them = us.opposite();
    let rank = us.back_rank();

    if !board.castling.kingside(us) && !board.castling.queenside(us) {
        return;
    }
    if board.in_check(us) {
        return;
    }

    let king_from = Square::new(4, rank);

    if board.castling.kingside(us) {
        let f = Square::new(5, rank);
        let g = Square::new(6, rank);
        if board.squares[f.index() as usize].is_none()
            && board.squares[g.index() as usize].is_none()
            && !board.is_square_attacked(f, them)
        {
            moves.push(Move::castle_kingside(king_from, g));
        }
    }

    if board.castling.queenside(us) {
        let b = Square::new(1, rank);
        let c = Square::new(2, rank);
        let d = Square::new(3, rank);
        if board.squares[b.index() as usize].is_none()
            && board.squares[c.index() as usize].is_none()
            && board.squares[d.index() as usize].is_none()
            && !board.is_square_attacked(d, them)
        {
            moves.push(Move::castle_queenside(king_from, c));
        }
    }
}
