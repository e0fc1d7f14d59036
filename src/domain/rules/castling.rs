use crate::domain::coordinate::{AttackBoardId, Level, SquareId, Track};
use crate::domain::models::{CastleSide, Piece, PieceId, PieceType, Player};
use crate::domain::rules::{attacks, MoveError, Position};

#[derive(Clone, Debug)]
pub struct CastlingOptions {
    pub kingside: Result<(), MoveError>,
    pub queenside: Result<(), MoveError>,
}

/// The squares the king and rook end on, resolved against the current
/// snapshot. Needed by the executor as well as the validator.
#[derive(Clone, Copy, Debug)]
pub struct CastlePlan {
    pub king: PieceRelocation,
    pub rook: PieceRelocation,
}

#[derive(Clone, Copy, Debug)]
pub struct PieceRelocation {
    pub piece: PieceId,
    pub to: SquareId,
}

/// The file next to the main stack for a track: `a` on the queen line,
/// `d` on the king line. Castling destinations sit on these files.
fn bridge_file(track: Track) -> u8 {
    match track {
        Track::Queen => 1,
        Track::King => 4,
    }
}

fn back_rank(color: Player) -> u8 {
    match color {
        Player::White => 0,
        Player::Black => 9,
    }
}

/// Control in the castling sense. The movement controller is `None` for a
/// board with two or more passengers, but a castle board always carries at
/// least king and rook; what castling actually needs is that no enemy piece
/// rides the board (and that an empty board still answers to its owner).
fn controls_for_castle(position: &Position, board: AttackBoardId, color: Player) -> bool {
    let passengers = position.passengers(board);
    if passengers.is_empty() {
        return board.owner() == color;
    }
    passengers.iter().all(|p| p.owner == color)
}

pub fn validate_castle(
    position: &Position,
    color: Player,
    side: CastleSide,
    board_activated_this_turn: bool,
) -> Result<(), MoveError> {
    plan_castle(position, color, side, board_activated_this_turn).map(|_| ())
}

pub fn castling_options(
    position: &Position,
    color: Player,
    board_activated_this_turn: bool,
) -> CastlingOptions {
    CastlingOptions {
        kingside: validate_castle(position, color, CastleSide::King, board_activated_this_turn),
        queenside: validate_castle(position, color, CastleSide::Queen, board_activated_this_turn),
    }
}

pub fn plan_castle(
    position: &Position,
    color: Player,
    side: CastleSide,
    board_activated_this_turn: bool,
) -> Result<CastlePlan, MoveError> {
    if board_activated_this_turn {
        return Err(MoveError::CastlingAfterActivation);
    }

    let king = position.king(color).ok_or(MoveError::KingMoved)?;
    if king.has_moved {
        return Err(MoveError::KingMoved);
    }
    let king_board = match king.level {
        Level::Attack(board) => board,
        Level::Main(_) => return Err(MoveError::KingMoved),
    };
    let start = color.home_pin_number();
    let king_board_pos = position.boards.position(king_board);
    if king_board_pos.pin.number != start {
        return Err(MoveError::BoardNotAtStart(king_board));
    }
    if !controls_for_castle(position, king_board, color) {
        return Err(MoveError::NotController(king_board, color));
    }

    // Candidate rooks: unmoved, same color, riding an attack board.
    let rooks: Vec<&Piece> = position
        .pieces
        .iter()
        .filter(|p| {
            p.piece_type == PieceType::Rook
                && p.owner == color
                && !p.has_moved
                && matches!(p.level, Level::Attack(_))
        })
        .collect();

    let king_sq = position.square_of(king);
    let opponent = color.opponent();

    match side {
        CastleSide::King => {
            // King and rook swap on the king's own board.
            let rook = rooks
                .iter()
                .copied()
                .find(|r| r.level == Level::Attack(king_board))
                .ok_or(MoveError::RookMoved)?;
            let rook_sq = position.square_of(rook);
            if attacks::is_square_attacked(position, &king_sq, opponent) {
                return Err(MoveError::SquareAttacked(king_sq));
            }
            if attacks::is_square_attacked(position, &rook_sq, opponent) {
                return Err(MoveError::SquareAttacked(rook_sq));
            }
            Ok(CastlePlan {
                king: PieceRelocation {
                    piece: king.id,
                    to: rook_sq,
                },
                rook: PieceRelocation {
                    piece: rook.id,
                    to: king_sq,
                },
            })
        }
        CastleSide::Queen => {
            // King crosses the bridge to the rook's board; the rook crosses
            // the other way. Both boards must be at a start pin on opposite
            // tracks.
            let rook = match rooks.iter().copied().find(|r| r.level != Level::Attack(king_board)) {
                Some(rook) => rook,
                None => {
                    // A second unmoved rook parked on the king's board means
                    // both castle pieces sit on the same side of the bridge.
                    if rooks.len() >= 2 {
                        return Err(MoveError::SameSidePlacement);
                    }
                    return Err(MoveError::RookMoved);
                }
            };
            let rook_board = match rook.level {
                Level::Attack(board) => board,
                Level::Main(_) => return Err(MoveError::RookMoved),
            };
            let rook_board_pos = position.boards.position(rook_board);
            if rook_board_pos.pin.number != start {
                return Err(MoveError::BoardNotAtStart(rook_board));
            }
            if !controls_for_castle(position, rook_board, color) {
                return Err(MoveError::NotController(rook_board, color));
            }
            if rook_board_pos.pin.track == king_board_pos.pin.track {
                return Err(MoveError::SameSidePlacement);
            }

            let rank = back_rank(color);
            let king_to = SquareId::new(
                bridge_file(rook_board_pos.pin.track),
                rank,
                position.resolve_level(Level::Attack(rook_board)),
            );
            let rook_to = SquareId::new(
                bridge_file(king_board_pos.pin.track),
                rank,
                position.resolve_level(Level::Attack(king_board)),
            );
            if position.piece_at(&king_to).is_some() {
                return Err(MoveError::DestinationOccupied(king_to));
            }
            if let Some(p) = position.piece_at(&rook_to) {
                if p.id != king.id {
                    return Err(MoveError::DestinationOccupied(rook_to));
                }
            }
            if attacks::is_square_attacked(position, &king_sq, opponent) {
                return Err(MoveError::SquareAttacked(king_sq));
            }
            if attacks::is_square_attacked(position, &king_to, opponent) {
                return Err(MoveError::SquareAttacked(king_to));
            }
            Ok(CastlePlan {
                king: PieceRelocation {
                    piece: king.id,
                    to: king_to,
                },
                rook: PieceRelocation {
                    piece: rook.id,
                    to: rook_to,
                },
            })
        }
    }
}
