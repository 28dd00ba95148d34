//! Tests for placement validation and the turn/game-flow controller.

use chrono::Utc;
use strictly_blokus::{
    BoardPosition, Catalog, GameSetup, GameState, GameStatus, MoveSubmission, Occupant, Orientation,
    PieceId, Placement, Rejection, SeatKind, commit_placement,
};

fn ids(list: &[u8]) -> Vec<PieceId> {
    list.iter().map(|&i| PieceId::new(i)).collect()
}

fn place(piece: u8, row: i32, col: i32) -> MoveSubmission {
    MoveSubmission::Place {
        piece_id: PieceId::new(piece),
        position: BoardPosition::new(row, col),
        orientation: Orientation::IDENTITY,
    }
}

#[test]
fn test_two_seat_opening_and_overlap() {
    let game = GameSetup::two_player().start(Utc::now()).unwrap();
    let largest = Catalog::standard().largest().id();

    let opening = MoveSubmission::Place {
        piece_id: largest,
        position: BoardPosition::new(0, 0),
        orientation: Orientation::IDENTITY,
    };
    let game = game
        .submit(0, opening, Utc::now())
        .expect("largest piece at the start corner is legal");
    assert_eq!(game.current_player(), 1);
    assert_eq!(game.turn_history().len(), 1);
    for col in 0..5 {
        assert_eq!(
            game.board().occupant(BoardPosition::new(0, col)),
            Some(Occupant::Owned { seat: 0, piece: largest })
        );
    }

    let before = game.clone();
    let result = game.submit(1, place(0, 0, 0), Utc::now());
    assert_eq!(result, Err(Rejection::CellOccupied(BoardPosition::new(0, 0))));
    assert_eq!(game, before);
}

#[test]
fn test_camel_case_submission_is_canonicalized() {
    let json = r#"{"type":"place","pieceId":4,"position":{"row":0,"col":0},"orientation":{"rotation":4,"flipped":false}}"#;
    let submission: MoveSubmission = serde_json::from_str(json).unwrap();
    assert_eq!(submission, place(4, 0, 0));

    let game = GameSetup::two_player().start(Utc::now()).unwrap();
    let game = game.submit(0, submission, Utc::now()).unwrap();
    assert_eq!(
        game.turn_history()[0].placement(),
        Some(&Placement::new(PieceId::new(4), Orientation::IDENTITY, BoardPosition::new(0, 0)))
    );
}

#[test]
fn test_submission_without_orientation_uses_identity() {
    let json = r#"{"type":"place","pieceId":4,"position":{"row":0,"col":0}}"#;
    let submission: MoveSubmission = serde_json::from_str(json).unwrap();
    assert_eq!(submission, place(4, 0, 0));
}

#[test]
fn test_rejections_in_rule_order() {
    let game = GameSetup::two_player().start(Utc::now()).unwrap();
    let game = game.submit(0, place(1, 0, 0), Utc::now()).unwrap();
    let game = game.submit(1, place(0, 13, 13), Utc::now()).unwrap();

    // Horizontal I3 hanging off the right edge.
    assert_eq!(
        game.submit(0, place(2, 5, 12), Utc::now()),
        Err(Rejection::OutOfBounds(BoardPosition::new(5, 14)))
    );
    // Touches the domino's side.
    assert_eq!(
        game.submit(0, place(0, 1, 0), Utc::now()),
        Err(Rejection::IllegalEdgeAdjacency(BoardPosition::new(1, 0)))
    );
    // Floating in the middle.
    assert_eq!(
        game.submit(0, place(0, 6, 6), Utc::now()),
        Err(Rejection::MissingCornerAnchor)
    );
    // Diagonal to the domino's end.
    assert!(game.submit(0, place(0, 1, 2), Utc::now()).is_ok());
}

#[test]
fn test_first_piece_must_cover_start_corner() {
    let game = GameSetup::two_player().start(Utc::now()).unwrap();
    assert_eq!(
        game.submit(0, place(0, 1, 1), Utc::now()),
        Err(Rejection::MissingStartCorner(BoardPosition::new(0, 0)))
    );
    let game = game.submit(0, place(0, 0, 0), Utc::now()).unwrap();
    assert_eq!(
        game.submit(1, place(0, 0, 13), Utc::now()),
        Err(Rejection::MissingStartCorner(BoardPosition::new(13, 13)))
    );
}

#[test]
fn test_stuck_seat_is_skipped() {
    let game = GameSetup::new(vec![SeatKind::Human; 3])
        .with_board_size(5)
        .with_inventory(0, ids(&[0]))
        .with_inventory(1, ids(&[0]))
        .with_inventory(2, ids(&[0, 1, 2]))
        .start(Utc::now())
        .unwrap();

    let game = game.submit(0, place(0, 0, 0), Utc::now()).unwrap();
    let game = game.submit(1, place(0, 0, 4), Utc::now()).unwrap();
    assert_eq!(game.current_player(), 2);

    // Seats 0 and 1 are out of pieces; every commit lands back on seat 2.
    let game = game.submit(2, place(0, 4, 4), Utc::now()).unwrap();
    assert_eq!(game.current_player(), 2);
    let game = game.submit(2, place(1, 3, 2), Utc::now()).unwrap();
    assert_eq!(game.current_player(), 2);
    assert_eq!(game.status(), GameStatus::Playing);
}

#[test]
fn test_termination_assigns_winner() {
    let game = GameSetup::two_player()
        .with_board_size(3)
        .with_inventory(0, ids(&[0]))
        .with_inventory(1, ids(&[0, 9]))
        .start(Utc::now())
        .unwrap();
    let game = game.submit(0, place(0, 0, 0), Utc::now()).unwrap();
    let game = game.submit(1, place(0, 2, 2), Utc::now()).unwrap();

    assert_eq!(game.status(), GameStatus::Finished);
    assert_eq!(game.standings(), Some(&[0, 5][..]));
    assert_eq!(game.winner(), Some(0));
    assert_eq!(
        game.submit(0, MoveSubmission::Pass, Utc::now()),
        Err(Rejection::GameNotPlaying(GameStatus::Finished))
    );
}

#[test]
fn test_equal_penalties_tie() {
    let game = GameSetup::two_player()
        .with_board_size(3)
        .with_inventory(0, ids(&[0, 9]))
        .with_inventory(1, ids(&[0, 9]))
        .start(Utc::now())
        .unwrap();
    let game = game.submit(0, place(0, 0, 0), Utc::now()).unwrap();
    let game = game.submit(1, place(0, 2, 2), Utc::now()).unwrap();
    assert!(game.is_finished());
    assert_eq!(game.winner(), None);
}

#[test]
fn test_pass_rejected_with_legal_move() {
    let game = GameSetup::two_player().start(Utc::now()).unwrap();
    assert_eq!(
        game.submit(0, MoveSubmission::Pass, Utc::now()),
        Err(Rejection::PassWithLegalMove)
    );
}

#[test]
fn test_not_your_turn_and_used_piece() {
    let game = GameSetup::two_player().start(Utc::now()).unwrap();
    assert_eq!(
        game.submit(1, place(0, 13, 13), Utc::now()),
        Err(Rejection::NotYourTurn { seat: 1, current: 0 })
    );
    let game = game.submit(0, place(0, 0, 0), Utc::now()).unwrap();
    let game = game.submit(1, place(0, 13, 13), Utc::now()).unwrap();
    assert_eq!(
        game.submit(0, place(0, 1, 1), Utc::now()),
        Err(Rejection::PieceAlreadyUsed(PieceId::new(0)))
    );
}

#[test]
#[should_panic(expected = "never validated")]
fn test_commit_refuses_invalid_placement() {
    let game: GameState = GameSetup::two_player().start(Utc::now()).unwrap();
    let off_corner = Placement::new(PieceId::new(0), Orientation::IDENTITY, BoardPosition::new(6, 6));
    let _ = commit_placement(&game, &off_corner, Utc::now());
}

#[test]
fn test_snapshots_share_untouched_storage() {
    let game = GameSetup::two_player().start(Utc::now()).unwrap();
    let rejected = game.clone();
    assert!(rejected.board().shares_storage_with(game.board()));
    let next = game.submit(0, place(0, 0, 0), Utc::now()).unwrap();
    assert!(!next.board().shares_storage_with(game.board()));
    assert!(game.board().is_empty_at(BoardPosition::new(0, 0)));
}
