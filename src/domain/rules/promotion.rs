use crate::domain::coordinate::{file_letter, AttackBoardId, PinId, SquareId, Track};
use crate::domain::models::{Piece, PieceId, PieceType, Player};
use crate::domain::rules::{MoveError, Position};
use crate::domain::world::BoardStates;
use serde::{Deserialize, Serialize};

/// What a pawn arriving at (or sitting on) a rank is entitled to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionCheck {
    pub should_promote: bool,
    pub can_promote: bool,
    pub is_deferred: bool,
    pub overhang_board: Option<AttackBoardId>,
}

impl PromotionCheck {
    fn nothing() -> Self {
        Self {
            should_promote: false,
            can_promote: false,
            is_deferred: false,
            overhang_board: None,
        }
    }

    fn immediate() -> Self {
        Self {
            should_promote: true,
            can_promote: true,
            is_deferred: false,
            overhang_board: None,
        }
    }
}

fn matching_track(file: u8) -> Option<Track> {
    match file {
        0 | 1 => Some(Track::Queen),
        4 | 5 => Some(Track::King),
        _ => None,
    }
}

fn is_corner_file(file: u8) -> bool {
    file == 1 || file == 4
}

fn is_outer_file(file: u8) -> bool {
    file == 0 || file == 5
}

/// The rank a pawn of `color` promotes on when nothing dynamic interferes.
fn base_rank(color: Player) -> u8 {
    match color {
        Player::White => 8,
        Player::Black => 1,
    }
}

/// The overhang rank that only exists while a board docks at the far pin.
fn far_rank(color: Player) -> u8 {
    match color {
        Player::White => 9,
        Player::Black => 0,
    }
}

fn far_pin(color: Player) -> u8 {
    match color {
        Player::White => 6,
        Player::Black => 1,
    }
}

/// The opponent board overhanging `color`'s far rank on the track matching
/// `file`, if any. Boards may migrate tracks, so this keys on owner and pin
/// rather than base id.
pub fn overhang_board(boards: &BoardStates, file: u8, color: Player) -> Option<AttackBoardId> {
    let track = matching_track(file)?;
    let pin = PinId::new(track, far_pin(color));
    boards
        .board_at(pin)
        .filter(|board| board.owner() == color.opponent())
}

/// The furthest rank a pawn of `color` can promote on for a file, or `None`
/// when no promotion plane currently exists there (outer files with the far
/// pin vacant).
pub fn furthest_rank(position: &Position, file: u8, color: Player) -> Option<u8> {
    if file == 2 || file == 3 {
        return Some(base_rank(color));
    }
    let overhang = overhang_board(position.boards, file, color);
    if is_outer_file(file) {
        return overhang.map(|_| far_rank(color));
    }
    if is_corner_file(file) {
        return Some(if overhang.is_some() {
            far_rank(color)
        } else {
            base_rank(color)
        });
    }
    None
}

pub fn check_promotion(position: &Position, piece: &Piece, at_rank: u8) -> PromotionCheck {
    if piece.piece_type != PieceType::Pawn {
        return PromotionCheck::nothing();
    }
    let color = piece.owner;
    let file = piece.file;

    if file == 2 || file == 3 {
        if at_rank == base_rank(color) {
            return PromotionCheck::immediate();
        }
        return PromotionCheck::nothing();
    }

    if is_outer_file(file) {
        match furthest_rank(position, file, color) {
            Some(rank) if at_rank == rank => return PromotionCheck::immediate(),
            _ => return PromotionCheck::nothing(),
        }
    }

    if is_corner_file(file) {
        match overhang_board(position.boards, file, color) {
            Some(board) => {
                if at_rank == base_rank(color) {
                    // Due, but the opponent's board hangs over the corner:
                    // the pawn waits where it stands.
                    return PromotionCheck {
                        should_promote: true,
                        can_promote: false,
                        is_deferred: true,
                        overhang_board: Some(board),
                    };
                }
                if at_rank == far_rank(color) {
                    // Standing on the overhanging board itself.
                    return PromotionCheck::immediate();
                }
            }
            None => {
                if at_rank == base_rank(color) {
                    return PromotionCheck::immediate();
                }
            }
        }
    }
    PromotionCheck::nothing()
}

/// Reject pawn moves onto the far rank when its promotion plane is absent
/// (outer files) or owed to a deferral (corner files under overhang).
/// Failing here keeps the error at the move, not later at promotion time.
pub fn gate_pawn_advance(
    position: &Position,
    piece: &Piece,
    to: &SquareId,
) -> Result<(), MoveError> {
    if to.rank != far_rank(piece.owner) {
        return Ok(());
    }
    if is_outer_file(to.file) {
        if furthest_rank(position, to.file, piece.owner).is_none() {
            return Err(MoveError::NonexistentTarget(file_letter(to.file)));
        }
        return Ok(());
    }
    if is_corner_file(to.file) {
        return match overhang_board(position.boards, to.file, piece.owner) {
            Some(board) => Err(MoveError::PromotionDeferred(board)),
            None => Err(MoveError::NonexistentTarget(file_letter(to.file))),
        };
    }
    Ok(())
}

/// Recompute every pawn's deferral flag against the current board geometry.
/// Runs after each attack-board move, when the overhangs may have appeared
/// or vanished without any pawn moving.
pub fn refresh_deferred_flags(mut pieces: Vec<Piece>, boards: &BoardStates) -> Vec<Piece> {
    for piece in pieces.iter_mut() {
        piece.deferred_promotion = if piece.piece_type == PieceType::Pawn
            && is_corner_file(piece.file)
            && piece.rank == base_rank(piece.owner)
        {
            overhang_board(boards, piece.file, piece.owner)
        } else {
            None
        };
    }
    pieces
}

/// Pawns that must promote right now: corner-file pawns sitting on their
/// base promotion rank with no overhang left above them.
pub fn detect_forced_promotions(position: &Position) -> Vec<PieceId> {
    position
        .pieces
        .iter()
        .filter(|p| {
            p.piece_type == PieceType::Pawn
                && is_corner_file(p.file)
                && p.rank == base_rank(p.owner)
                && overhang_board(position.boards, p.file, p.owner).is_none()
        })
        .map(|p| p.id)
        .collect()
}
