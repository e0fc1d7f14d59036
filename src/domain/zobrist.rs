use crate::domain::coordinate::{AttackBoardId, Level, MainBoard, Track};
use crate::domain::models::{Piece, PieceType, Player};
use crate::domain::world::BoardStates;
use rand::Rng;

const LEVEL_SLOTS: usize = 7; // three mains + four mobile boards
const COLUMN_SLOTS: usize = 60; // 6 files x 10 ranks
const PIECE_SLOTS: usize = 12; // 6 types x 2 owners
const PLACEMENT_SLOTS: usize = 24; // 2 tracks x 6 pins x 2 rotations

/// Random keys for hashing a full snapshot: piece placements, mobile-board
/// placements, and the side to move. Fresh keys per game; hashes are only
/// ever compared within one history.
#[derive(Debug, Clone)]
pub struct ZobristKeys {
    piece_keys: Vec<u64>,
    board_keys: Vec<u64>,
    black_to_move: u64,
}

fn level_slot(level: Level) -> usize {
    match level {
        Level::Main(MainBoard::White) => 0,
        Level::Main(MainBoard::Neutral) => 1,
        Level::Main(MainBoard::Black) => 2,
        Level::Attack(board) => 3 + board.index(),
    }
}

fn piece_slot(piece_type: PieceType, owner: Player) -> usize {
    let t = match piece_type {
        PieceType::Pawn => 0,
        PieceType::Rook => 1,
        PieceType::Knight => 2,
        PieceType::Bishop => 3,
        PieceType::Queen => 4,
        PieceType::King => 5,
    };
    match owner {
        Player::White => t,
        Player::Black => 6 + t,
    }
}

impl ZobristKeys {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let piece_count = PIECE_SLOTS * LEVEL_SLOTS * COLUMN_SLOTS;
        let mut piece_keys = Vec::with_capacity(piece_count);
        for _ in 0..piece_count {
            piece_keys.push(rng.r#gen());
        }
        let board_count = 4 * PLACEMENT_SLOTS;
        let mut board_keys = Vec::with_capacity(board_count);
        for _ in 0..board_count {
            board_keys.push(rng.r#gen());
        }
        Self {
            piece_keys,
            board_keys,
            black_to_move: rng.r#gen(),
        }
    }

    pub fn get_hash(&self, pieces: &[Piece], boards: &BoardStates, to_move: Player) -> u64 {
        let mut hash = 0;
        if to_move == Player::Black {
            hash ^= self.black_to_move;
        }
        for piece in pieces {
            let column = piece.rank as usize * 6 + piece.file as usize;
            let index = (piece_slot(piece.piece_type, piece.owner) * LEVEL_SLOTS
                + level_slot(piece.level))
                * COLUMN_SLOTS
                + column;
            hash ^= self.piece_keys[index];
        }
        for board in AttackBoardId::ALL {
            let pos = boards.position(board);
            let track = match pos.pin.track {
                Track::Queen => 0,
                Track::King => 1,
            };
            let rotation = match pos.rotation.degrees() {
                0 => 0,
                _ => 1,
            };
            let placement = (track * 6 + (pos.pin.number - 1) as usize) * 2 + rotation;
            hash ^= self.board_keys[board.index() * PLACEMENT_SLOTS + placement];
        }
        hash
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}
