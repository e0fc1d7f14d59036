use crate::domain::coordinate::{ColumnRef, SquareId};
use crate::domain::models::{Piece, PieceType, Player};
use crate::domain::rules::{promotion, MoveError, MoveList, Position};

/// Every square the piece can legally reach in this snapshot, king safety
/// excluded (the caller simulates for that).
pub fn legal_moves(position: &Position, piece: &Piece) -> MoveList {
    let mut out = MoveList::new();
    for to in position.active_squares() {
        if validate_move(position, piece, &to).is_ok() {
            out.push(to);
        }
    }
    out
}

pub fn validate_move(position: &Position, piece: &Piece, to: &SquareId) -> Result<(), MoveError> {
    // The destination must be a live square: part of the world and on a
    // main board or a currently docked attack-board instance.
    if position.world.try_square(to).is_none() || !position.is_active(&to.level) {
        return Err(MoveError::NoConnectivity(to.column()));
    }

    let from = position.square_of(piece);
    if from == *to {
        return Err(MoveError::IllegalPattern);
    }
    if let Some(occupant) = position.piece_at(to) {
        if occupant.owner == piece.owner {
            return Err(MoveError::FriendlyPiece);
        }
    }

    let df = to.file as i8 - from.file as i8;
    let dr = to.rank as i8 - from.rank as i8;
    if df == 0 && dr == 0 {
        // Same column, different level. Nothing moves straight up.
        return Err(MoveError::PureVertical);
    }
    let dl = position.level_index(&to.level) - position.level_index(&from.level);

    match piece.piece_type {
        PieceType::Pawn => validate_pawn(position, piece, &from, to, df, dr),
        PieceType::Knight => validate_knight(df, dr, dl),
        PieceType::Rook => {
            if !is_straight(df, dr) {
                return Err(MoveError::IllegalPattern);
            }
            trace_path(position, piece, &from, to, df, dr)?;
            check_landing(position, piece, to)
        }
        PieceType::Bishop => {
            if !is_diagonal(df, dr) && !is_level_diagonal(df, dr, dl) {
                return Err(MoveError::IllegalPattern);
            }
            trace_path(position, piece, &from, to, df, dr)?;
            check_landing(position, piece, to)
        }
        PieceType::Queen => {
            if !is_straight(df, dr) && !is_diagonal(df, dr) {
                return Err(MoveError::IllegalPattern);
            }
            trace_path(position, piece, &from, to, df, dr)?;
            check_landing(position, piece, to)
        }
        PieceType::King => {
            if df.abs() > 1 || dr.abs() > 1 {
                return Err(MoveError::IllegalPattern);
            }
            check_landing(position, piece, to)
        }
    }
}

fn is_straight(df: i8, dr: i8) -> bool {
    (df == 0) != (dr == 0)
}

fn is_diagonal(df: i8, dr: i8) -> bool {
    df != 0 && df.abs() == dr.abs()
}

/// The 3D bishop extension: travel along a single file or rank axis with a
/// matching climb through the levels.
fn is_level_diagonal(df: i8, dr: i8, dl: i8) -> bool {
    is_straight(df, dr) && (df + dr).abs() == dl.abs()
}

fn validate_knight(df: i8, dr: i8, dl: i8) -> Result<(), MoveError> {
    let (adf, adr) = (df.abs(), dr.abs());
    let flat_l = matches!((adf, adr), (1, 2) | (2, 1));
    // The L can also stand up: two squares along one axis plus one level.
    let level_l = matches!((adf, adr), (0, 2) | (2, 0)) && dl.abs() == 1;
    if flat_l || level_l {
        Ok(())
    } else {
        Err(MoveError::IllegalPattern)
    }
}

fn validate_pawn(
    position: &Position,
    piece: &Piece,
    from: &SquareId,
    to: &SquareId,
    df: i8,
    dr: i8,
) -> Result<(), MoveError> {
    let dir = piece.owner.forward();
    if df == 0 {
        // Straight ahead never captures.
        if position.piece_at(to).is_some() {
            return Err(MoveError::Blocked(to.column()));
        }
        if dr == dir {
            // single step
        } else if dr == 2 * dir {
            if piece.has_moved || piece.moved_as_passenger || !on_double_step_rank(piece) {
                return Err(MoveError::IllegalPattern);
            }
            let mid = ColumnRef {
                file: from.file,
                rank: (from.rank as i8 + dir) as u8,
            };
            if !position.column_exists(mid.file, mid.rank) {
                return Err(MoveError::NoConnectivity(mid));
            }
            check_column_clear(position, piece, mid, from, to)?;
        } else {
            return Err(MoveError::IllegalPattern);
        }
        promotion::gate_pawn_advance(position, piece, to)?;
        check_landing(position, piece, to)
    } else if df.abs() == 1 && dr == dir {
        // Diagonal only onto an occupied square; the friendly case was
        // already rejected, so any occupant here is capturable.
        if position.piece_at(to).is_none() {
            return Err(MoveError::IllegalPattern);
        }
        promotion::gate_pawn_advance(position, piece, to)?;
        check_landing(position, piece, to)
    } else {
        Err(MoveError::IllegalPattern)
    }
}

fn on_double_step_rank(piece: &Piece) -> bool {
    match piece.owner {
        Player::White => piece.rank == 1 || piece.rank == 2,
        Player::Black => piece.rank == 7 || piece.rank == 8,
    }
}

/// Walk the intermediate columns of a sliding move. Each column must exist
/// on some active level and be free of blockers under the shadow rule.
fn trace_path(
    position: &Position,
    piece: &Piece,
    from: &SquareId,
    to: &SquareId,
    df: i8,
    dr: i8,
) -> Result<(), MoveError> {
    let steps = df.abs().max(dr.abs());
    let step = (df.signum(), dr.signum());
    for i in 1..steps {
        let col = ColumnRef {
            file: (from.file as i8 + step.0 * i) as u8,
            rank: (from.rank as i8 + step.1 * i) as u8,
        };
        if !position.column_exists(col.file, col.rank) {
            return Err(MoveError::NoConnectivity(col));
        }
        check_column_clear(position, piece, col, from, to)?;
    }
    Ok(())
}

/// Shadow semantics for a traversed column: any piece there blocks, except
/// a knight, which casts no shadow and only blocks when it physically sits
/// on the origin or destination board.
fn check_column_clear(
    position: &Position,
    piece: &Piece,
    col: ColumnRef,
    from: &SquareId,
    to: &SquareId,
) -> Result<(), MoveError> {
    for other in position.pieces_in_column(col.file, col.rank) {
        if other.id == piece.id {
            continue;
        }
        if other.piece_type != PieceType::Knight {
            return Err(MoveError::Blocked(col));
        }
        let level = position.resolve_level(other.level);
        if level == from.level || level == to.level {
            return Err(MoveError::Blocked(col));
        }
    }
    Ok(())
}

/// Landing under the shadow rule: a non-knight piece anywhere else in the
/// destination column forbids the landing. The occupant of the destination
/// square itself is a capture, not a shadow.
fn check_landing(position: &Position, piece: &Piece, to: &SquareId) -> Result<(), MoveError> {
    for other in position.pieces_in_column(to.file, to.rank) {
        if other.id == piece.id || other.piece_type == PieceType::Knight {
            continue;
        }
        if position.resolve_level(other.level) != to.level {
            return Err(MoveError::Shadow(to.column()));
        }
    }
    Ok(())
}
