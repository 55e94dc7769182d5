//! Board state with reversible move application.

use chess_core::{CastlingRights, Color, Fen, FenError, Move, MoveFlag, Piece, Square};
use std::ops::{Deref, DerefMut};

/// Everything a `make_move` call destroys, captured for `undo_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UndoRecord {
    mv: Move,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    checkmate: bool,
    stalemate: bool,
}

/// Complete game state.
///
/// The board is mutated in place by [`make_move`](Board::make_move) and
/// restored by [`undo_move`](Board::undo_move) under a strict last-in
/// first-out discipline. Search shares one instance through the whole
/// recursion; it is never copied per node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Piece placement, a1 = index 0 through h8 = index 63.
    pub squares: [Option<(Color, Piece)>; 64],
    /// The side to move.
    pub side_to_move: Color,
    /// Castling rights.
    pub castling: CastlingRights,
    /// En passant target square (if any).
    pub en_passant: Option<Square>,
    /// Halfmove clock for the 50-move rule.
    pub halfmove_clock: u32,
    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
    /// True when the side to move has no legal moves and is in check.
    pub checkmate: bool,
    /// True when the side to move has no legal moves and is not in check.
    pub stalemate: bool,
    history: Vec<UndoRecord>,
}

impl Board {
    /// Creates a board in the standard starting position.
    pub fn new() -> Self {
        Self::from_parts(Fen::default())
    }

    /// Creates a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_parts(Fen::parse(fen)?))
    }

    fn from_parts(fen: Fen) -> Self {
        let mut board = Board {
            squares: fen.squares,
            side_to_move: fen.side_to_move,
            castling: fen.castling,
            en_passant: fen.en_passant,
            halfmove_clock: fen.halfmove_clock,
            fullmove_number: fen.fullmove_number,
            checkmate: false,
            stalemate: false,
            history: Vec::new(),
        };
        board.refresh_terminal_flags();
        board
    }

    /// Serializes the current position to a FEN string.
    pub fn to_fen(&self) -> String {
        Fen {
            squares: self.squares,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    /// Returns true if it is white's turn.
    #[inline]
    pub fn white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    /// Returns the piece and color on the given square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.index() as usize]
    }

    /// Applies a move.
    ///
    /// No legality check is performed; callers apply only moves obtained
    /// from [`legal_moves`](Board::legal_moves) or moves they will undo.
    /// A promotion move with `promotion == None` promotes to a queen.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;

        self.history.push(UndoRecord {
            mv,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            checkmate: self.checkmate,
            stalemate: self.stalemate,
        });

        self.squares[mv.from.index() as usize] = None;

        if mv.captured.is_some() {
            self.squares[Self::captured_square(mv).index() as usize] = None;
        }

        let placed = match mv.flag {
            MoveFlag::Promotion => mv.promotion.unwrap_or(Piece::Queen),
            _ => mv.piece,
        };
        self.squares[mv.to.index() as usize] = Some((us, placed));

        // Castling relocates the rook together with the king.
        match mv.flag {
            MoveFlag::CastleKingside => {
                let rank = us.back_rank();
                self.squares[Square::new(7, rank).index() as usize] = None;
                self.squares[Square::new(5, rank).index() as usize] = Some((us, Piece::Rook));
            }
            MoveFlag::CastleQueenside => {
                let rank = us.back_rank();
                self.squares[Square::new(0, rank).index() as usize] = None;
                self.squares[Square::new(3, rank).index() as usize] = Some((us, Piece::Rook));
            }
            _ => {}
        }

        if mv.piece == Piece::King {
            self.castling.revoke_all(us);
        }
        // A rook leaving its home square, or anything landing on one,
        // kills the corresponding right.
        self.revoke_rook_right(mv.from);
        self.revoke_rook_right(mv.to);

        self.en_passant = if mv.flag == MoveFlag::DoublePush {
            mv.from.offset(0, us.pawn_direction())
        } else {
            None
        };

        if mv.piece == Piece::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = us.opposite();
        self.checkmate = false;
        self.stalemate = false;
    }

    /// Undoes the most recent move, restoring the prior state exactly.
    ///
    /// # Panics
    ///
    /// Panics if no move has been made. Calling `undo_move` against an
    /// empty history is a caller bug, not a recoverable condition.
    pub fn undo_move(&mut self) {
        let record = self
            .history
            .pop()
            .expect("undo_move called with no move to undo");
        let mv = record.mv;

        self.side_to_move = self.side_to_move.opposite();
        let us = self.side_to_move;
        let them = us.opposite();

        // Putting the original piece back also reverses a promotion.
        self.squares[mv.to.index() as usize] = None;
        self.squares[mv.from.index() as usize] = Some((us, mv.piece));

        if let Some(captured) = mv.captured {
            self.squares[Self::captured_square(mv).index() as usize] = Some((them, captured));
        }

        match mv.flag {
            MoveFlag::CastleKingside => {
                let rank = us.back_rank();
                self.squares[Square::new(5, rank).index() as usize] = None;
                self.squares[Square::new(7, rank).index() as usize] = Some((us, Piece::Rook));
            }
            MoveFlag::CastleQueenside => {
                let rank = us.back_rank();
                self.squares[Square::new(3, rank).index() as usize] = None;
                self.squares[Square::new(0, rank).index() as usize] = Some((us, Piece::Rook));
            }
            _ => {}
        }

        self.castling = record.castling;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;
        self.checkmate = record.checkmate;
        self.stalemate = record.stalemate;

        if us == Color::Black {
            self.fullmove_number -= 1;
        }
    }

    /// The square a capture removes a piece from. For en passant this is
    /// beside the destination, not on it.
    fn captured_square(mv: Move) -> Square {
        match mv.flag {
            MoveFlag::EnPassant => Square::new(mv.to.file(), mv.from.rank()),
            _ => mv.to,
        }
    }

    fn revoke_rook_right(&mut self, sq: Square) {
        if sq == Square::A1 {
            self.castling.white_queenside = false;
        } else if sq == Square::H1 {
            self.castling.white_kingside = false;
        } else if sq == Square::A8 {
            self.castling.black_queenside = false;
        } else if sq == Square::H8 {
            self.castling.black_kingside = false;
        }
    }

    fn refresh_terminal_flags(&mut self) {
        let _ = self.legal_moves();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a move on construction and undoes it on drop.
///
/// The undo runs on every exit path, which keeps the make/undo stack
/// balanced through early returns and pruning cutoffs.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
}

impl<'a> MoveGuard<'a> {
    /// Applies `mv` to `board` for the lifetime of the guard.
    pub fn new(board: &'a mut Board, mv: Move) -> Self {
        board.make_move(mv);
        MoveGuard { board }
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.undo_move();
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}
