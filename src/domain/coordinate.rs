use crate::domain::models::Player;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const FILE_COUNT: u8 = 6;
pub const RANK_COUNT: u8 = 10;

const FILE_LETTERS: [char; FILE_COUNT as usize] = ['z', 'a', 'b', 'c', 'd', 'e'];

pub fn file_letter(file: u8) -> char {
    FILE_LETTERS[file as usize]
}

pub fn file_from_letter(c: char) -> Option<u8> {
    FILE_LETTERS
        .iter()
        .position(|&l| l == c.to_ascii_lowercase())
        .map(|i| i as u8)
}

/// The three fixed 4x4 platforms, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MainBoard {
    White,
    Neutral,
    Black,
}

impl MainBoard {
    pub const ALL: [MainBoard; 3] = [MainBoard::White, MainBoard::Neutral, MainBoard::Black];

    /// Inclusive rank span. The platforms overlap by two ranks so every
    /// file-rank column between them stays continuous.
    pub fn rank_span(self) -> (u8, u8) {
        match self {
            MainBoard::White => (1, 4),
            MainBoard::Neutral => (3, 6),
            MainBoard::Black => (5, 8),
        }
    }

    pub fn level_index(self) -> i8 {
        match self {
            MainBoard::White => 0,
            MainBoard::Neutral => 2,
            MainBoard::Black => 4,
        }
    }

    pub fn letter(self) -> char {
        match self {
            MainBoard::White => 'W',
            MainBoard::Neutral => 'N',
            MainBoard::Black => 'B',
        }
    }

    pub fn covers_rank(self, rank: u8) -> bool {
        let (lo, hi) = self.rank_span();
        rank >= lo && rank <= hi
    }
}

/// The two vertical tracks the attack boards ride on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    Queen,
    King,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Queen, Track::King];

    pub fn file_offset(self) -> u8 {
        match self {
            Track::Queen => 0,
            Track::King => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Track::Queen => "QL",
            Track::King => "KL",
        }
    }

    pub fn opposite(self) -> Track {
        match self {
            Track::Queen => Track::King,
            Track::King => Track::Queen,
        }
    }
}

/// One of the 12 fixed docking positions, `QL1`..`KL6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId {
    pub track: Track,
    pub number: u8,
}

impl PinId {
    pub fn new(track: Track, number: u8) -> Self {
        debug_assert!((1..=6).contains(&number));
        Self { track, number }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.track.label(), self.number)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    R0,
    R180,
}

impl Rotation {
    pub fn flipped(self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R180,
            Rotation::R180 => Rotation::R0,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R180 => 180,
        }
    }
}

/// A concrete docked placement of an attack board. 24 of these exist in the
/// world (2 tracks x 6 pins x 2 rotations); exactly four are active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackInstance {
    pub pin: PinId,
    pub rotation: Rotation,
}

impl fmt::Display for AttackInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pin, self.rotation.degrees())
    }
}

/// The four mobile boards by original owner and home track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackBoardId {
    WhiteQueen,
    WhiteKing,
    BlackQueen,
    BlackKing,
}

impl AttackBoardId {
    pub const ALL: [AttackBoardId; 4] = [
        AttackBoardId::WhiteQueen,
        AttackBoardId::WhiteKing,
        AttackBoardId::BlackQueen,
        AttackBoardId::BlackKing,
    ];

    pub fn owner(self) -> Player {
        match self {
            AttackBoardId::WhiteQueen | AttackBoardId::WhiteKing => Player::White,
            AttackBoardId::BlackQueen | AttackBoardId::BlackKing => Player::Black,
        }
    }

    pub fn home_track(self) -> Track {
        match self {
            AttackBoardId::WhiteQueen | AttackBoardId::BlackQueen => Track::Queen,
            AttackBoardId::WhiteKing | AttackBoardId::BlackKing => Track::King,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttackBoardId::WhiteQueen => "WQL",
            AttackBoardId::WhiteKing => "WKL",
            AttackBoardId::BlackQueen => "BQL",
            AttackBoardId::BlackKing => "BKL",
        }
    }

    pub fn index(self) -> usize {
        match self {
            AttackBoardId::WhiteQueen => 0,
            AttackBoardId::WhiteKing => 1,
            AttackBoardId::BlackQueen => 2,
            AttackBoardId::BlackKing => 3,
        }
    }
}

impl fmt::Display for AttackBoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttackBoardId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WQL" => Ok(AttackBoardId::WhiteQueen),
            "WKL" => Ok(AttackBoardId::WhiteKing),
            "BQL" => Ok(AttackBoardId::BlackQueen),
            "BKL" => Ok(AttackBoardId::BlackKing),
            _ => Err(ParseIdError::BadLevel(s.to_string())),
        }
    }
}

/// Where a piece lives: a fixed platform, or a mobile board by base id.
/// The base id is resolved to the board's current instance through
/// `BoardStates`, so pieces stay put when their board moves under them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Main(MainBoard),
    Attack(AttackBoardId),
}

/// Which board a *square* belongs to. Squares on mobile boards belong to a
/// concrete instance, never to a base id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    Main(MainBoard),
    Instance(AttackInstance),
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelId::Main(b) => write!(f, "{}", b.letter()),
            LevelId::Instance(i) => write!(f, "{}", i),
        }
    }
}

/// A file-rank column, independent of level. Handy for shadow diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub file: u8,
    pub rank: u8,
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", file_letter(self.file), self.rank)
    }
}

impl fmt::Debug for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Full square identity, e.g. `a2W` or `z0QL1:0`. Formatting and parsing
/// happen at this boundary and only here; everything behind it works on the
/// typed fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SquareId {
    pub file: u8,
    pub rank: u8,
    pub level: LevelId,
}

impl SquareId {
    pub fn new(file: u8, rank: u8, level: LevelId) -> Self {
        Self { file, rank, level }
    }

    pub fn main(file: u8, rank: u8, board: MainBoard) -> Self {
        Self::new(file, rank, LevelId::Main(board))
    }

    pub fn column(&self) -> ColumnRef {
        ColumnRef {
            file: self.file,
            rank: self.rank,
        }
    }
}

impl fmt::Display for SquareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", file_letter(self.file), self.rank, self.level)
    }
}

impl fmt::Debug for SquareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("'{0}' is not a square id")]
    BadSquare(String),
    #[error("'{0}' is not a board id")]
    BadLevel(String),
    #[error("'{0}' is not a pin id")]
    BadPin(String),
}

impl FromStr for PinId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError::BadPin(s.to_string());
        let track = match s.get(..2) {
            Some("QL") | Some("ql") => Track::Queen,
            Some("KL") | Some("kl") => Track::King,
            _ => return Err(err()),
        };
        let number: u8 = s[2..].parse().map_err(|_| err())?;
        if !(1..=6).contains(&number) {
            return Err(err());
        }
        Ok(PinId { track, number })
    }
}

impl FromStr for LevelId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError::BadLevel(s.to_string());
        match s {
            "W" | "w" => return Ok(LevelId::Main(MainBoard::White)),
            "N" | "n" => return Ok(LevelId::Main(MainBoard::Neutral)),
            "B" | "b" => return Ok(LevelId::Main(MainBoard::Black)),
            _ => {}
        }
        let (pin_part, rot_part) = s.split_once(':').ok_or_else(err)?;
        let pin: PinId = pin_part.parse().map_err(|_| err())?;
        let rotation = match rot_part {
            "0" => Rotation::R0,
            "180" => Rotation::R180,
            _ => return Err(err()),
        };
        Ok(LevelId::Instance(AttackInstance { pin, rotation }))
    }
}

impl FromStr for SquareId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError::BadSquare(s.to_string());
        let mut chars = s.chars();
        let file = chars.next().and_then(file_from_letter).ok_or_else(err)?;
        let rank_char = chars.next().ok_or_else(err)?;
        let rank = rank_char.to_digit(10).ok_or_else(err)? as u8;
        let level: LevelId = chars.as_str().parse().map_err(|_| err())?;
        Ok(SquareId { file, rank, level })
    }
}
