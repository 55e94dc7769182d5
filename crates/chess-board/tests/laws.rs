//! State-restoration laws checked across randomly reached positions.

use chess_board::Board;
use proptest::prelude::*;

/// Replays `picks` as indexes into the legal move list, stopping early at
/// a terminal position.
fn random_walk(board: &mut Board, picks: &[prop::sample::Index]) {
    for pick in picks {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        board.make_move(moves[pick.index(moves.len())]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn make_undo_is_an_exact_inverse(
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..24),
        last in any::<prop::sample::Index>(),
    ) {
        let mut board = Board::new();
        random_walk(&mut board, &picks);

        let moves = board.legal_moves();
        prop_assume!(!moves.is_empty());

        let before = board.clone();
        board.make_move(moves[last.index(moves.len())]);
        board.undo_move();

        prop_assert_eq!(board, before);
    }

    #[test]
    fn fen_round_trips_from_any_reachable_position(
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..24),
    ) {
        let mut board = Board::new();
        random_walk(&mut board, &picks);

        let fen = board.to_fen();
        let reparsed = Board::from_fen(&fen).unwrap();

        prop_assert_eq!(reparsed.to_fen(), fen);
        prop_assert_eq!(reparsed.squares, board.squares);
        prop_assert_eq!(reparsed.side_to_move, board.side_to_move);
        prop_assert_eq!(reparsed.castling, board.castling);
        prop_assert_eq!(reparsed.en_passant, board.en_passant);
        prop_assert_eq!(reparsed.halfmove_clock, board.halfmove_clock);
        prop_assert_eq!(reparsed.fullmove_number, board.fullmove_number);
    }

    #[test]
    fn generation_restores_the_board(
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..24),
    ) {
        let mut board = Board::new();
        random_walk(&mut board, &picks);

        // Settle the terminal flags, then generate again and compare.
        let _ = board.legal_moves();
        let before = board.clone();
        let _ = board.legal_moves();

        prop_assert_eq!(board, before);
    }
}

#[test]
fn adjacent_king_position_only_allows_king_capture() {
    // White to move with the black king en prise next to both white
    // pieces; the only moves resolving the contact are the captures.
    let mut board = Board::from_fen("8/8/8/8/8/8/6k1/6QK w - - 0 1").unwrap();
    let moves = board.legal_moves();

    let mut coords: Vec<String> = moves.iter().map(|m| m.to_coord()).collect();
    coords.sort();
    assert_eq!(coords, vec!["g1g2".to_string(), "h1g2".to_string()]);
    assert!(!board.checkmate);
}
