use trichess::domain::coordinate::{
    AttackBoardId, Level, MainBoard, PinId, Rotation, SquareId, Track,
};
use trichess::domain::models::{BoardMove, Piece, PieceType, Player};
use trichess::domain::rules::{MoveError, Position, Rules};
use trichess::domain::world::{BoardPosition, BoardStates, World};

fn sq(s: &str) -> SquareId {
    s.parse().unwrap()
}

fn at(track: Track, number: u8) -> BoardPosition {
    BoardPosition {
        pin: PinId::new(track, number),
        rotation: Rotation::R0,
    }
}

const B: Level = Level::Main(MainBoard::Black);

#[test]
fn interior_files_promote_on_the_back_rank() {
    let world = World::new();
    let states = BoardStates::initial();
    let pawn = Piece::new(0, PieceType::Pawn, Player::White, 2, 7, B);
    let pieces = vec![pawn];
    let position = Position::new(&world, &pieces, &states);

    assert_eq!(Rules::furthest_rank(&position, 2, Player::White), Some(8));
    assert_eq!(Rules::furthest_rank(&position, 3, Player::Black), Some(1));

    let check = Rules::check_promotion(&position, &pawn, 8);
    assert!(check.should_promote);
    assert!(check.can_promote);
    assert!(!check.is_deferred);
}

#[test]
fn outer_files_have_no_plane_without_the_far_board() {
    let world = World::new();
    // White's own board parked at QL6: the squares exist, but the plane
    // belongs to the opponent's board only.
    let states = BoardStates::initial()
        .with_position(AttackBoardId::BlackQueen, at(Track::Queen, 5))
        .with_position(AttackBoardId::WhiteQueen, at(Track::Queen, 6));
    let pawn = Piece::new(
        0,
        PieceType::Pawn,
        Player::White,
        0,
        8,
        Level::Attack(AttackBoardId::WhiteQueen),
    );
    let pieces = vec![pawn];
    let position = Position::new(&world, &pieces, &states);

    assert_eq!(Rules::furthest_rank(&position, 0, Player::White), None);
    let err = Rules::validate_move(&position, &pawn, &sq("z9QL6:0")).unwrap_err();
    assert!(matches!(err, MoveError::NonexistentTarget('z')));
}

#[test]
fn outer_files_promote_on_the_overhang_rank_when_present() {
    let world = World::new();
    // Black's queen board still sits at QL6 (the initial position), and a
    // white pawn has walked onto it.
    let states = BoardStates::initial();
    let pawn = Piece::new(
        0,
        PieceType::Pawn,
        Player::White,
        0,
        8,
        Level::Attack(AttackBoardId::BlackQueen),
    );
    let pieces = vec![pawn];
    let position = Position::new(&world, &pieces, &states);

    assert_eq!(Rules::furthest_rank(&position, 0, Player::White), Some(9));
    assert!(Rules::validate_move(&position, &pawn, &sq("z9QL6:0")).is_ok());

    let check = Rules::check_promotion(&position, &pawn, 9);
    assert!(check.should_promote);
    assert!(check.can_promote);
}

#[test]
fn corner_file_promotion_defers_under_overhang_then_forces() {
    let world = World::new();
    // Black's QL board at pin 6 overhangs white's a-file corner.
    let states = BoardStates::initial();
    let pawn = Piece::new(0, PieceType::Pawn, Player::White, 1, 8, B);
    let pieces = vec![pawn];
    let position = Position::new(&world, &pieces, &states);

    assert_eq!(Rules::furthest_rank(&position, 1, Player::White), Some(9));
    let check = Rules::check_promotion(&position, &pawn, 8);
    assert!(check.should_promote);
    assert!(!check.can_promote);
    assert!(check.is_deferred);
    assert_eq!(check.overhang_board, Some(AttackBoardId::BlackQueen));

    // While the overhang stands the pawn may not step onto it.
    assert!(matches!(
        Rules::validate_move(&position, &pawn, &sq("a9QL6:0")),
        Err(MoveError::PromotionDeferred(AttackBoardId::BlackQueen))
    ));
    // And nothing is forced yet.
    assert!(Rules::detect_forced_promotions(&position).is_empty());

    // The overhang leaves: the board move itself reports the forced
    // promotion.
    let request = BoardMove {
        board: AttackBoardId::BlackQueen,
        to: PinId::new(Track::Queen, 5),
        arrival: None,
    };
    let outcome = Rules::execute_board_move(&position, &request, Player::Black).unwrap();
    assert_eq!(outcome.forced_promotions, vec![pawn.id]);

    // The projection agrees after the fact.
    let after = Position::new(&world, &outcome.pieces, &outcome.boards);
    assert_eq!(Rules::detect_forced_promotions(&after), vec![pawn.id]);
    assert_eq!(Rules::furthest_rank(&after, 1, Player::White), Some(8));
}

#[test]
fn deferred_flag_follows_the_geometry() {
    let world = World::new();
    let states = BoardStates::initial();
    let pawn = Piece::new(0, PieceType::Pawn, Player::White, 1, 8, B);
    let pieces = vec![pawn];
    let position = Position::new(&world, &pieces, &states);

    // Moving some unrelated board refreshes every pawn's deferral flag.
    let request = BoardMove {
        board: AttackBoardId::WhiteQueen,
        to: PinId::new(Track::Queen, 2),
        arrival: None,
    };
    let outcome = Rules::execute_board_move(&position, &request, Player::White).unwrap();
    let flagged = outcome.pieces.iter().find(|p| p.id == 0).unwrap();
    assert_eq!(
        flagged.deferred_promotion,
        Some(AttackBoardId::BlackQueen)
    );
    assert!(outcome.forced_promotions.is_empty());
}

#[test]
fn black_mirror_geometry() {
    let world = World::new();
    // White's king-line board on KL1 overhangs black's d-file corner.
    let states = BoardStates::initial();
    let pawn = Piece::new(0, PieceType::Pawn, Player::Black, 4, 1, Level::Main(MainBoard::White));
    let pieces = vec![pawn];
    let position = Position::new(&world, &pieces, &states);

    assert_eq!(Rules::furthest_rank(&position, 4, Player::Black), Some(0));
    let check = Rules::check_promotion(&position, &pawn, 1);
    assert!(check.should_promote);
    assert!(!check.can_promote);
    assert!(check.is_deferred);
    assert_eq!(check.overhang_board, Some(AttackBoardId::WhiteKing));

    // Outer e-file for black promotes at rank 0 thanks to the same board.
    assert_eq!(Rules::furthest_rank(&position, 5, Player::Black), Some(0));
}
