//! Board state and move generation.
//!
//! This crate provides the mutable game state and the rules of play:
//! - [`Board`] - piece placement, side to move, castling rights, clocks,
//!   with reversible `make_move`/`undo_move`
//! - [`MoveGuard`] - a scoped guard that undoes its move when dropped
//! - legal move generation via [`Board::legal_moves`]
//! - [`perft`] and [`perft_divide`] for move generator validation
//!
//! # Example
//!
//! ```
//! use chess_board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.legal_moves();
//! assert_eq!(moves.len(), 20);
//!
//! board.make_move(moves[0]);
//! board.undo_move();
//! assert_eq!(board, Board::new());
//! ```

mod board;
mod movegen;
mod perft;

pub use board::{Board, MoveGuard};
pub use perft::{perft, perft_divide};
