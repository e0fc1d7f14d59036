use crate::domain::coordinate::{
    AttackBoardId, AttackInstance, ColumnRef, Level, LevelId, PinId, SquareId,
};
use crate::domain::models::{ArrivalChoice, BoardMove, Piece, PieceId, PieceType, Player};
use crate::domain::rules::{promotion, MoveError, Position};
use crate::domain::world::{BoardPosition, BoardStates};

/// Result of an executed board move: the new snapshot pieces and board
/// placements, plus any pawns whose promotion became forced by the change
/// in geometry.
#[derive(Clone, Debug)]
pub struct BoardMoveOutcome {
    pub pieces: Vec<Piece>,
    pub boards: BoardStates,
    pub forced_promotions: Vec<PieceId>,
}

/// Who gets to move the board right now: the original owner while it is
/// empty, a lone passenger's side when hijacked, nobody when contested.
pub fn controller(position: &Position, board: AttackBoardId) -> Option<Player> {
    let passengers = position.passengers(board);
    match passengers.len() {
        0 => Some(board.owner()),
        1 => Some(passengers[0].owner),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
    Side,
}

fn classify(from: PinId, to: PinId, mover: Player) -> Direction {
    if from.track != to.track {
        return Direction::Side;
    }
    let increasing = to.number > from.number;
    if increasing == (mover == Player::White) {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

pub fn validate_board_move(
    position: &Position,
    request: &BoardMove,
    by: Player,
) -> Result<(), MoveError> {
    let current = position.boards.position(request.board);
    let passengers = position.passengers(request.board);

    if passengers.len() >= 2 {
        return Err(MoveError::BoardImmovable(request.board));
    }
    if controller(position, request.board) != Some(by) {
        return Err(MoveError::NotController(request.board, by));
    }

    let translating = request.to != current.pin;
    let rotating = matches!(request.arrival, Some(ArrivalChoice::Rot180));
    if !translating && !rotating {
        return Err(MoveError::IllegalPattern);
    }

    if translating {
        let pin = position.world.pin(current.pin);
        if !pin.adjacent.contains(&request.to) {
            return Err(MoveError::NotAdjacent(current.pin, request.to));
        }
        if let Some(other) = position.boards.board_at(request.to) {
            return Err(MoveError::PinOccupied(request.to, other));
        }
        if passengers.len() == 1
            && classify(current.pin, request.to, by) == Direction::Backward
        {
            return Err(MoveError::BackwardWhileOccupied);
        }
    }

    // Vertical shadow at the destination: a non-knight piece anywhere in the
    // 2x2 footprint on another level pins the board out. The board's own
    // passengers ride along and do not count.
    let dest_pin = position.world.pin(request.to);
    for (file, rank) in dest_pin.footprint() {
        for piece in position.pieces_in_column(file, rank) {
            if piece.level == Level::Attack(request.board) {
                continue;
            }
            if piece.piece_type != PieceType::Knight {
                return Err(MoveError::Shadow(ColumnRef { file, rank }));
            }
        }
    }

    Ok(())
}

pub fn execute_board_move(
    position: &Position,
    request: &BoardMove,
    by: Player,
) -> Result<BoardMoveOutcome, MoveError> {
    validate_board_move(position, request, by)?;

    let current = position.boards.position(request.board);
    let src_pin = position.world.pin(current.pin);
    let dst_pin = position.world.pin(request.to);
    let passengers = position.passengers(request.board);

    let arrival = match request.arrival {
        Some(choice) => choice,
        None => {
            // Docking over an end pin flips the board relative to the track,
            // so a carried piece has two geometrically distinct landings.
            // Surface both and make the caller pick.
            if passengers.len() == 1 && src_pin.inverted != dst_pin.inverted {
                let p = passengers[0];
                let local_f = p.file - src_pin.file_offset;
                let local_r = p.rank - src_pin.rank_offset;
                let identity = SquareId::new(
                    dst_pin.file_offset + local_f,
                    dst_pin.rank_offset + local_r,
                    LevelId::Instance(AttackInstance {
                        pin: request.to,
                        rotation: current.rotation,
                    }),
                );
                let rot180 = SquareId::new(
                    dst_pin.file_offset + 1 - local_f,
                    dst_pin.rank_offset + 1 - local_r,
                    LevelId::Instance(AttackInstance {
                        pin: request.to,
                        rotation: current.rotation.flipped(),
                    }),
                );
                return Err(MoveError::ArrivalChoiceRequired { identity, rot180 });
            }
            ArrivalChoice::Identity
        }
    };

    let rotation = match arrival {
        ArrivalChoice::Identity => current.rotation,
        ArrivalChoice::Rot180 => current.rotation.flipped(),
    };
    let boards = position.boards.with_position(
        request.board,
        BoardPosition {
            pin: request.to,
            rotation,
        },
    );

    let mut pieces: Vec<Piece> = position.pieces.to_vec();
    for piece in pieces.iter_mut() {
        if piece.level != Level::Attack(request.board) {
            continue;
        }
        let local_f = piece.file - src_pin.file_offset;
        let local_r = piece.rank - src_pin.rank_offset;
        let (lf, lr) = match arrival {
            ArrivalChoice::Identity => (local_f, local_r),
            ArrivalChoice::Rot180 => (1 - local_f, 1 - local_r),
        };
        piece.file = dst_pin.file_offset + lf;
        piece.rank = dst_pin.rank_offset + lr;
        piece.has_moved = true;
        if piece.piece_type == PieceType::Pawn {
            piece.moved_as_passenger = true;
        }
    }

    // The promotion geometry shifted with the board, for every pawn on the
    // table, not only the passengers.
    let pieces = promotion::refresh_deferred_flags(pieces, &boards);
    let next = Position::new(position.world, &pieces, &boards);
    let forced_promotions = promotion::detect_forced_promotions(&next);

    tracing::debug!(
        board = %request.board,
        from = %current.pin,
        to = %request.to,
        rotation = rotation.degrees(),
        passengers = passengers.len(),
        "attack board moved"
    );

    Ok(BoardMoveOutcome {
        pieces,
        boards,
        forced_promotions,
    })
}
