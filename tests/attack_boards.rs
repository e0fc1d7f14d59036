use trichess::domain::coordinate::{
    AttackBoardId, Level, MainBoard, PinId, Rotation, Track,
};
use trichess::domain::models::{ArrivalChoice, BoardMove, Piece, PieceType, Player};
use trichess::domain::rules::{MoveError, Position, Rules};
use trichess::domain::world::{BoardPosition, BoardStates, World};

const WQL: AttackBoardId = AttackBoardId::WhiteQueen;
const BQL: AttackBoardId = AttackBoardId::BlackQueen;

fn ql(number: u8) -> PinId {
    PinId::new(Track::Queen, number)
}

fn kl(number: u8) -> PinId {
    PinId::new(Track::King, number)
}

fn at(pin: PinId) -> BoardPosition {
    BoardPosition {
        pin,
        rotation: Rotation::R0,
    }
}

fn passenger(id: u32, t: PieceType, owner: Player, file: u8, rank: u8, board: AttackBoardId) -> Piece {
    Piece::new(id, t, owner, file, rank, Level::Attack(board))
}

fn board_move(board: AttackBoardId, to: PinId) -> BoardMove {
    BoardMove {
        board,
        to,
        arrival: None,
    }
}

#[test]
fn empty_board_may_move_backward_occupied_may_not() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(2)));

    // Empty: backward (toward pin 1) is fine.
    let pieces: Vec<Piece> = Vec::new();
    let position = Position::new(&world, &pieces, &states);
    assert!(Rules::validate_board_move(&position, &board_move(WQL, ql(1)), Player::White).is_ok());

    // One passenger: backward is refused, forward is fine.
    let pieces = vec![passenger(0, PieceType::Pawn, Player::White, 0, 2, WQL)];
    let position = Position::new(&world, &pieces, &states);
    assert!(matches!(
        Rules::validate_board_move(&position, &board_move(WQL, ql(1)), Player::White),
        Err(MoveError::BackwardWhileOccupied)
    ));
    assert!(Rules::validate_board_move(&position, &board_move(WQL, ql(3)), Player::White).is_ok());
}

#[test]
fn occupancy_gate_two_passengers_block_all_movement() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(2)));
    let pieces = vec![
        passenger(0, PieceType::Pawn, Player::White, 0, 2, WQL),
        passenger(1, PieceType::Rook, Player::White, 1, 2, WQL),
    ];
    let position = Position::new(&world, &pieces, &states);

    for to in [ql(1), ql(3), kl(2)] {
        assert!(matches!(
            Rules::validate_board_move(&position, &board_move(WQL, to), Player::White),
            Err(MoveError::BoardImmovable(b)) if b == WQL
        ));
    }
}

#[test]
fn adjacency_is_enforced() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(2)));
    let pieces: Vec<Piece> = Vec::new();
    let position = Position::new(&world, &pieces, &states);

    assert!(matches!(
        Rules::validate_board_move(&position, &board_move(WQL, ql(4)), Player::White),
        Err(MoveError::NotAdjacent(_, _))
    ));
    // The side link only connects equal pin numbers.
    assert!(matches!(
        Rules::validate_board_move(&position, &board_move(WQL, kl(3)), Player::White),
        Err(MoveError::NotAdjacent(_, _))
    ));
}

#[test]
fn destination_pin_must_be_free() {
    let world = World::new();
    let states = BoardStates::initial()
        .with_position(WQL, at(ql(2)))
        .with_position(BQL, at(ql(3)));
    let pieces: Vec<Piece> = Vec::new();
    let position = Position::new(&world, &pieces, &states);

    assert!(matches!(
        Rules::validate_board_move(&position, &board_move(WQL, ql(3)), Player::White),
        Err(MoveError::PinOccupied(_, b)) if b == BQL
    ));
}

#[test]
fn controller_and_hijack() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(3)));

    // Empty board: original owner controls it.
    let pieces: Vec<Piece> = Vec::new();
    let position = Position::new(&world, &pieces, &states);
    assert_eq!(Rules::controller(&position, WQL), Some(Player::White));
    assert!(matches!(
        Rules::validate_board_move(&position, &board_move(WQL, ql(4)), Player::Black),
        Err(MoveError::NotController(_, _))
    ));

    // A lone black passenger hijacks it.
    let pieces = vec![passenger(0, PieceType::Pawn, Player::Black, 0, 4, WQL)];
    let position = Position::new(&world, &pieces, &states);
    assert_eq!(Rules::controller(&position, WQL), Some(Player::Black));
    assert!(matches!(
        Rules::validate_board_move(&position, &board_move(WQL, ql(4)), Player::White),
        Err(MoveError::NotController(_, _))
    ));
    // Forward for the black hijacker is toward pin 1.
    assert!(Rules::validate_board_move(&position, &board_move(WQL, ql(2)), Player::Black).is_ok());

    // Two passengers: contested, nobody controls it.
    let pieces = vec![
        passenger(0, PieceType::Pawn, Player::Black, 0, 4, WQL),
        passenger(1, PieceType::Pawn, Player::White, 1, 4, WQL),
    ];
    let position = Position::new(&world, &pieces, &states);
    assert_eq!(Rules::controller(&position, WQL), None);
}

#[test]
fn vertical_shadow_blocks_the_destination_footprint() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(2)));
    // A rook on the main stack under the QL3 footprint (a4 on W).
    let pieces = vec![Piece::new(
        0,
        PieceType::Rook,
        Player::Black,
        1,
        4,
        Level::Main(MainBoard::White),
    )];
    let position = Position::new(&world, &pieces, &states);
    assert!(matches!(
        Rules::validate_board_move(&position, &board_move(WQL, ql(3)), Player::White),
        Err(MoveError::Shadow(_))
    ));

    // A knight in the same place casts no shadow.
    let pieces = vec![Piece::new(
        0,
        PieceType::Knight,
        Player::Black,
        1,
        4,
        Level::Main(MainBoard::White),
    )];
    let position = Position::new(&world, &pieces, &states);
    assert!(Rules::validate_board_move(&position, &board_move(WQL, ql(3)), Player::White).is_ok());
}

#[test]
fn passenger_remap_and_flags_on_translation() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(2)));
    let pieces = vec![passenger(0, PieceType::Pawn, Player::White, 0, 2, WQL)];
    let position = Position::new(&world, &pieces, &states);

    let outcome =
        Rules::execute_board_move(&position, &board_move(WQL, ql(3)), Player::White).unwrap();
    let moved = outcome.pieces.iter().find(|p| p.id == 0).unwrap();
    // Identity mapping: local (0,0) of QL2 becomes local (0,0) of QL3.
    assert_eq!((moved.file, moved.rank), (0, 4));
    assert!(moved.has_moved);
    assert!(moved.moved_as_passenger);
    assert_eq!(outcome.boards.position(WQL).pin, ql(3));
    assert_eq!(outcome.boards.position(WQL).rotation, Rotation::R0);
}

#[test]
fn rotation_in_place_mirrors_the_passenger_and_round_trips() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(3)));
    let pieces = vec![passenger(0, PieceType::Pawn, Player::White, 0, 4, WQL)];
    let position = Position::new(&world, &pieces, &states);

    let rotate = BoardMove {
        board: WQL,
        to: ql(3),
        arrival: Some(ArrivalChoice::Rot180),
    };
    let outcome = Rules::execute_board_move(&position, &rotate, Player::White).unwrap();
    let moved = outcome.pieces.iter().find(|p| p.id == 0).unwrap();
    assert_eq!((moved.file, moved.rank), (1, 5));
    assert_eq!(outcome.boards.position(WQL).rotation, Rotation::R180);

    // Rotating again restores the original coordinate and orientation.
    let position = Position::new(&world, &outcome.pieces, &outcome.boards);
    let back = Rules::execute_board_move(&position, &rotate, Player::White).unwrap();
    let restored = back.pieces.iter().find(|p| p.id == 0).unwrap();
    assert_eq!((restored.file, restored.rank), (0, 4));
    assert_eq!(back.boards.position(WQL).rotation, Rotation::R0);
}

#[test]
fn cross_track_move_remaps_the_file_offset() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(3)));
    let pieces = vec![passenger(0, PieceType::Pawn, Player::White, 0, 4, WQL)];
    let position = Position::new(&world, &pieces, &states);

    let outcome =
        Rules::execute_board_move(&position, &board_move(WQL, kl(3)), Player::White).unwrap();
    let moved = outcome.pieces.iter().find(|p| p.id == 0).unwrap();
    // z-file local slot becomes the d-file slot on the king line.
    assert_eq!((moved.file, moved.rank), (4, 4));
    // The instance now derives from the destination track.
    assert_eq!(outcome.boards.position(WQL).pin.track, Track::King);
    assert_eq!(
        outcome.boards.instance(WQL).to_string(),
        "KL3:0".to_string()
    );
}

#[test]
fn arrival_choice_surfaces_when_docking_over_an_end_pin() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(2)));

    // QL2 is upright, QL1 is inverted. An empty board flips over the end
    // pin without ceremony.
    let pieces_empty: Vec<Piece> = Vec::new();
    let position_empty = Position::new(&world, &pieces_empty, &states);
    assert!(
        Rules::execute_board_move(&position_empty, &board_move(WQL, ql(1)), Player::White).is_ok()
    );

    // With a passenger the flip must be resolved by the caller. Pin 1 is
    // backward for a white passenger, so use a black hijacker, for whom it
    // is forward.
    let pieces = vec![passenger(0, PieceType::Pawn, Player::Black, 0, 2, WQL)];
    let position = Position::new(&world, &pieces, &states);
    let err =
        Rules::execute_board_move(&position, &board_move(WQL, ql(1)), Player::Black).unwrap_err();
    match err {
        MoveError::ArrivalChoiceRequired { identity, rot180 } => {
            assert_eq!(identity.to_string(), "z0QL1:0");
            assert_eq!(rot180.to_string(), "a1QL1:180");
        }
        other => panic!("expected arrival choice, got {:?}", other),
    }

    // Resolving the choice executes the move.
    let resolved = BoardMove {
        board: WQL,
        to: ql(1),
        arrival: Some(ArrivalChoice::Rot180),
    };
    let outcome = Rules::execute_board_move(&position, &resolved, Player::Black).unwrap();
    let moved = outcome.pieces.iter().find(|p| p.id == 0).unwrap();
    assert_eq!((moved.file, moved.rank), (1, 1));
    assert_eq!(outcome.boards.position(WQL).rotation, Rotation::R180);
}

#[test]
fn a_board_must_translate_or_rotate() {
    let world = World::new();
    let states = BoardStates::initial().with_position(WQL, at(ql(3)));
    let pieces: Vec<Piece> = Vec::new();
    let position = Position::new(&world, &pieces, &states);

    assert!(matches!(
        Rules::validate_board_move(&position, &board_move(WQL, ql(3)), Player::White),
        Err(MoveError::IllegalPattern)
    ));
}
