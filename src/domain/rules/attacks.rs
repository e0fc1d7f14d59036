use crate::domain::coordinate::SquareId;
use crate::domain::models::{Piece, PieceId, Player};
use crate::domain::rules::{moves, Position};
use rayon::prelude::*;

/// True when any piece of `by` has the square in its legal-move set.
/// Own-king safety is deliberately ignored here; this is the primitive the
/// safety simulation itself is built on.
pub fn is_square_attacked(position: &Position, square: &SquareId, by: Player) -> bool {
    position
        .pieces
        .iter()
        .filter(|p| p.owner == by)
        .any(|p| moves::validate_move(position, p, square).is_ok())
}

pub fn is_in_check(position: &Position, color: Player) -> bool {
    match position.king(color) {
        Some(king) => {
            let square = position.square_of(king);
            is_square_attacked(position, &square, color.opponent())
        }
        None => false,
    }
}

pub fn is_checkmate(position: &Position, color: Player) -> bool {
    is_in_check(position, color) && !has_safe_move(position, color)
}

pub fn is_stalemate(position: &Position, color: Player) -> bool {
    !is_in_check(position, color) && !has_safe_move(position, color)
}

/// Apply one piece move to a snapshot, returning the next piece list: the
/// destination occupant (if any) is captured, the mover lands with
/// `has_moved` set. Promotion and deferral bookkeeping belong to the caller.
pub fn apply_piece_move(position: &Position, piece: PieceId, to: &SquareId) -> Vec<Piece> {
    let level = match position.level_for(&to.level) {
        Some(level) => level,
        None => panic!("move target {} is not on an active board", to),
    };
    let mut next: Vec<Piece> = Vec::with_capacity(position.pieces.len());
    for p in position.pieces {
        if p.id == piece {
            let mut moved = *p;
            moved.file = to.file;
            moved.rank = to.rank;
            moved.level = level;
            moved.has_moved = true;
            next.push(moved);
        } else if p.file == to.file
            && p.rank == to.rank
            && position.resolve_level(p.level) == to.level
        {
            // captured
        } else {
            next.push(*p);
        }
    }
    next
}

/// Does `color` have any move that does not leave its own king attacked?
/// Each candidate is simulated on a copied snapshot; the scan is
/// data-parallel since every simulation is independent and read-only over
/// the shared world.
fn has_safe_move(position: &Position, color: Player) -> bool {
    position
        .pieces
        .par_iter()
        .filter(|p| p.owner == color)
        .any(|p| {
            moves::legal_moves(position, p).iter().any(|to| {
                let next = apply_piece_move(position, p.id, to);
                let simulated = Position::new(position.world, &next, position.boards);
                !is_in_check(&simulated, color)
            })
        })
}
