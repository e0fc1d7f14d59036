pub mod attacks;
pub mod boards;
pub mod castling;
pub mod moves;
pub mod promotion;

use crate::domain::coordinate::{
    AttackBoardId, ColumnRef, Level, LevelId, MainBoard, PinId, SquareId,
};
use crate::domain::models::{BoardMove, CastleSide, Piece, PieceId, PieceType, Player};
use crate::domain::world::{BoardStates, World};
use smallvec::SmallVec;
use thiserror::Error;

pub type MoveList = SmallVec<[SquareId; 32]>;

/// Every way a request can be rejected. Illegality is an expected outcome;
/// none of these abort anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no movement pattern of the piece reaches the target square")]
    IllegalPattern,
    #[error("purely vertical moves are not allowed")]
    PureVertical,
    #[error("path is blocked at {0}")]
    Blocked(ColumnRef),
    #[error("vertical shadow over {0} blocks the move")]
    Shadow(ColumnRef),
    #[error("no connectivity to {0}")]
    NoConnectivity(ColumnRef),
    #[error("destination is occupied by a friendly piece")]
    FriendlyPiece,
    #[error("pins {0} and {1} are not adjacent")]
    NotAdjacent(PinId, PinId),
    #[error("pin {0} is already occupied by {1}")]
    PinOccupied(PinId, AttackBoardId),
    #[error("{0} carries more than one piece and cannot move")]
    BoardImmovable(AttackBoardId),
    #[error("{0} is not controlled by {1}")]
    NotController(AttackBoardId, Player),
    #[error("occupied boards may not move backward")]
    BackwardWhileOccupied,
    #[error("no promotion square exists on file {0} while the far pin is vacant")]
    NonexistentTarget(char),
    #[error("promotion is deferred while {0} overhangs the corner")]
    PromotionDeferred(AttackBoardId),
    #[error("arrival orientation is ambiguous; choose identity or rot180")]
    ArrivalChoiceRequired { identity: SquareId, rot180: SquareId },
    #[error("move would leave the king in check")]
    SelfCheck,
    #[error("the king has already moved")]
    KingMoved,
    #[error("the rook has already moved")]
    RookMoved,
    #[error("{0} is not docked at its starting pin")]
    BoardNotAtStart(AttackBoardId),
    #[error("queenside castling requires the king and rook on opposite tracks")]
    SameSidePlacement,
    #[error("square {0} is attacked")]
    SquareAttacked(SquareId),
    #[error("destination square {0} is occupied")]
    DestinationOccupied(SquareId),
    #[error("castling is unavailable after an attack board activation this turn")]
    CastlingAfterActivation,
}

/// A read-only view over one immutable snapshot of the game: the world plus
/// caller-owned pieces and board placements. Everything in `rules` is a pure
/// function of one of these.
#[derive(Clone, Copy)]
pub struct Position<'a> {
    pub world: &'a World,
    pub pieces: &'a [Piece],
    pub boards: &'a BoardStates,
}

impl<'a> Position<'a> {
    pub fn new(world: &'a World, pieces: &'a [Piece], boards: &'a BoardStates) -> Self {
        Self {
            world,
            pieces,
            boards,
        }
    }

    pub fn resolve_level(&self, level: Level) -> LevelId {
        match level {
            Level::Main(b) => LevelId::Main(b),
            Level::Attack(b) => LevelId::Instance(self.boards.instance(b)),
        }
    }

    /// The base-board view of a square's level, if the square sits on an
    /// active board at all.
    pub fn level_for(&self, id: &LevelId) -> Option<Level> {
        match id {
            LevelId::Main(b) => Some(Level::Main(*b)),
            LevelId::Instance(inst) => self
                .boards
                .active_instances()
                .iter()
                .find(|(_, i)| i == inst)
                .map(|(b, _)| Level::Attack(*b)),
        }
    }

    pub fn is_active(&self, id: &LevelId) -> bool {
        match id {
            LevelId::Main(_) => true,
            LevelId::Instance(inst) => self.boards.is_active(inst),
        }
    }

    pub fn square_of(&self, piece: &Piece) -> SquareId {
        SquareId::new(piece.file, piece.rank, self.resolve_level(piece.level))
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn piece_at(&self, square: &SquareId) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.file == square.file && p.rank == square.rank && self.resolve_level(p.level) == square.level)
    }

    pub fn pieces_in_column(&self, file: u8, rank: u8) -> impl Iterator<Item = &Piece> {
        self.pieces
            .iter()
            .filter(move |p| p.file == file && p.rank == rank)
    }

    /// Whether any active square exists at the column. Sliding paths need
    /// this on every intermediate step; a column with no live square means
    /// no connectivity.
    pub fn column_exists(&self, file: u8, rank: u8) -> bool {
        self.world
            .column_levels(file, rank)
            .iter()
            .any(|l| self.is_active(l))
    }

    pub fn level_index(&self, id: &LevelId) -> i8 {
        self.world.level_index(id)
    }

    pub fn passengers(&self, board: AttackBoardId) -> SmallVec<[&Piece; 4]> {
        self.pieces
            .iter()
            .filter(|p| p.level == Level::Attack(board))
            .collect()
    }

    pub fn king(&self, color: Player) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.piece_type == PieceType::King && p.owner == color)
    }

    /// Every active square, mains first, then the four live attack boards.
    pub fn active_squares(&self) -> Vec<SquareId> {
        let mut out = Vec::with_capacity(64);
        for board in MainBoard::ALL {
            let (lo, hi) = board.rank_span();
            for rank in lo..=hi {
                for file in 1..=4u8 {
                    out.push(SquareId::main(file, rank, board));
                }
            }
        }
        for (_, inst) in self.boards.active_instances() {
            let pin = self.world.pin(inst.pin);
            for (file, rank) in pin.footprint() {
                out.push(SquareId::new(file, rank, LevelId::Instance(inst)));
            }
        }
        out
    }
}

/// Facade over the rules submodules, mirroring the engine's public query
/// surface one-to-one.
pub struct Rules;

impl Rules {
    pub fn legal_moves(position: &Position, piece: &Piece) -> MoveList {
        moves::legal_moves(position, piece)
    }

    pub fn validate_move(position: &Position, piece: &Piece, to: &SquareId) -> Result<(), MoveError> {
        moves::validate_move(position, piece, to)
    }

    pub fn is_square_attacked(position: &Position, square: &SquareId, by: Player) -> bool {
        attacks::is_square_attacked(position, square, by)
    }

    pub fn is_in_check(position: &Position, color: Player) -> bool {
        attacks::is_in_check(position, color)
    }

    pub fn is_checkmate(position: &Position, color: Player) -> bool {
        attacks::is_checkmate(position, color)
    }

    pub fn is_stalemate(position: &Position, color: Player) -> bool {
        attacks::is_stalemate(position, color)
    }

    pub fn apply_piece_move(position: &Position, piece: PieceId, to: &SquareId) -> Vec<Piece> {
        attacks::apply_piece_move(position, piece, to)
    }

    pub fn controller(position: &Position, board: AttackBoardId) -> Option<Player> {
        boards::controller(position, board)
    }

    pub fn validate_board_move(
        position: &Position,
        request: &BoardMove,
        by: Player,
    ) -> Result<(), MoveError> {
        boards::validate_board_move(position, request, by)
    }

    pub fn execute_board_move(
        position: &Position,
        request: &BoardMove,
        by: Player,
    ) -> Result<boards::BoardMoveOutcome, MoveError> {
        boards::execute_board_move(position, request, by)
    }

    pub fn furthest_rank(
        position: &Position,
        file: u8,
        color: Player,
    ) -> Option<u8> {
        promotion::furthest_rank(position, file, color)
    }

    pub fn check_promotion(
        position: &Position,
        piece: &Piece,
        at_rank: u8,
    ) -> promotion::PromotionCheck {
        promotion::check_promotion(position, piece, at_rank)
    }

    pub fn detect_forced_promotions(position: &Position) -> Vec<PieceId> {
        promotion::detect_forced_promotions(position)
    }

    pub fn validate_castle(
        position: &Position,
        color: Player,
        side: CastleSide,
        board_activated_this_turn: bool,
    ) -> Result<(), MoveError> {
        castling::validate_castle(position, color, side, board_activated_this_turn)
    }

    pub fn castling_options(
        position: &Position,
        color: Player,
        board_activated_this_turn: bool,
    ) -> castling::CastlingOptions {
        castling::castling_options(position, color, board_activated_this_turn)
    }
}
