use crate::domain::coordinate::{AttackBoardId, Level, PinId, SquareId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opponent(&self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Rank direction of travel for pawns and for attack-board "forward".
    pub fn forward(&self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }

    /// The pin an attack board of this color starts on, and the pin the
    /// opponent must reach to overhang this color's promotion corner.
    pub fn home_pin_number(&self) -> u8 {
        match self {
            Player::White => 1,
            Player::Black => 6,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => f.write_str("White"),
            Player::Black => f.write_str("Black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Rook => 'R',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'R' => Some(PieceType::Rook),
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }
}

pub type PieceId = u32;

/// A piece snapshot. The engine never mutates these in place; every
/// operation that changes the position returns a fresh piece list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub piece_type: PieceType,
    pub owner: Player,
    pub file: u8,
    pub rank: u8,
    pub level: Level,
    pub has_moved: bool,
    /// Set when the piece was carried by an attack board; pawns lose the
    /// double-step privilege once this is set.
    pub moved_as_passenger: bool,
    /// Present while the piece is a corner-file pawn stuck under an opponent
    /// overhang; names the overhanging board.
    pub deferred_promotion: Option<AttackBoardId>,
}

impl Piece {
    pub fn new(id: PieceId, piece_type: PieceType, owner: Player, file: u8, rank: u8, level: Level) -> Self {
        Self {
            id,
            piece_type,
            owner,
            file,
            rank,
            level,
            has_moved: false,
            moved_as_passenger: false,
            deferred_promotion: None,
        }
    }
}

/// Identity keeps the passenger's local frame; Rot180 mirrors it within the
/// 2x2 footprint and flips the board's rotation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrivalChoice {
    Identity,
    Rot180,
}

/// An attack-board translation and/or rotation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMove {
    pub board: AttackBoardId,
    pub to: PinId,
    pub arrival: Option<ArrivalChoice>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastleSide {
    King,
    Queen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceMove {
    pub from: SquareId,
    pub to: SquareId,
    pub promotion: Option<PieceType>,
}

/// One player action per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move(PieceMove),
    Board(BoardMove),
    Castle(CastleSide),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Checkmate(Player),
    Stalemate,
    Draw,
    InProgress,
}
