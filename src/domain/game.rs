use crate::domain::coordinate::{AttackBoardId, Level, MainBoard, SquareId};
use crate::domain::models::{
    Action, BoardMove, CastleSide, GameResult, Piece, PieceId, PieceMove, PieceType, Player,
};
use crate::domain::rules::{castling, MoveError, MoveList, Position, Rules};
use crate::domain::world::{BoardStates, World};
use crate::domain::zobrist::ZobristKeys;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is already over")]
    GameOver,
    #[error("no piece at {0}")]
    NoPieceAt(SquareId),
    #[error("the piece at {0} is not yours to move")]
    NotYourPiece(SquareId),
    #[error("a promotion piece must be chosen")]
    PromotionRequired,
    #[error("pawns cannot promote to {0:?}")]
    InvalidPromotion(PieceType),
    #[error(transparent)]
    Rule(#[from] MoveError),
}

/// The Game Aggregate Root: owns the immutable world plus the mutable
/// snapshot (pieces, board placements), applies one action per turn through
/// the rules, and tracks status and repetition history.
pub struct Game {
    world: World,
    pieces: Vec<Piece>,
    boards: BoardStates,
    turn: Player,
    status: GameResult,
    board_activated_this_turn: bool,
    zobrist: ZobristKeys,
    history: Vec<u64>,
    move_history: Vec<(Player, Action)>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_setup(initial_pieces(), BoardStates::initial())
    }

    /// A game from an arbitrary snapshot. Used by tests and by anything
    /// replaying a stored position.
    pub fn with_setup(pieces: Vec<Piece>, boards: BoardStates) -> Self {
        let zobrist = ZobristKeys::new();
        let hash = zobrist.get_hash(&pieces, &boards, Player::White);
        Game {
            world: World::new(),
            pieces,
            boards,
            turn: Player::White,
            status: GameResult::InProgress,
            board_activated_this_turn: false,
            zobrist,
            history: vec![hash],
            move_history: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn boards(&self) -> &BoardStates {
        &self.boards
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn status(&self) -> GameResult {
        self.status
    }

    pub fn board_activated_this_turn(&self) -> bool {
        self.board_activated_this_turn
    }

    pub fn move_history(&self) -> &[(Player, Action)] {
        &self.move_history
    }

    pub fn legal_moves_from(&self, from: &SquareId) -> Option<MoveList> {
        let position = Position::new(&self.world, &self.pieces, &self.boards);
        let piece = *position.piece_at(from)?;
        Some(Rules::legal_moves(&position, &piece))
    }

    pub fn castling_options(&self) -> castling::CastlingOptions {
        let position = Position::new(&self.world, &self.pieces, &self.boards);
        Rules::castling_options(&position, self.turn, self.board_activated_this_turn)
    }

    pub fn play(&mut self, action: Action) -> Result<GameResult, GameError> {
        if self.status != GameResult::InProgress {
            return Err(GameError::GameOver);
        }
        self.board_activated_this_turn = false;

        match action {
            Action::Move(mv) => self.play_piece_move(&mv)?,
            Action::Board(request) => self.play_board_move(&request)?,
            Action::Castle(side) => self.play_castle(side)?,
        }

        self.move_history.push((self.turn, action));
        let hash = self
            .zobrist
            .get_hash(&self.pieces, &self.boards, self.turn.opponent());
        self.history.push(hash);
        self.status = self.evaluate_status(hash);
        tracing::info!(player = %self.turn, ?action, status = ?self.status, "turn played");

        if self.status == GameResult::InProgress {
            self.turn = self.turn.opponent();
        }
        Ok(self.status)
    }

    fn play_piece_move(&mut self, mv: &PieceMove) -> Result<(), GameError> {
        let position = Position::new(&self.world, &self.pieces, &self.boards);
        let piece = match position.piece_at(&mv.from) {
            Some(piece) => *piece,
            None => return Err(GameError::NoPieceAt(mv.from)),
        };
        if piece.owner != self.turn {
            return Err(GameError::NotYourPiece(mv.from));
        }
        Rules::validate_move(&position, &piece, &mv.to)?;

        let mut next = Rules::apply_piece_move(&position, piece.id, &mv.to);
        let check = {
            let simulated = Position::new(&self.world, &next, &self.boards);
            if Rules::is_in_check(&simulated, self.turn) {
                return Err(GameError::Rule(MoveError::SelfCheck));
            }
            let moved = simulated
                .piece(piece.id)
                .copied()
                .unwrap_or_else(|| panic!("piece {} vanished during move", piece.id));
            Rules::check_promotion(&simulated, &moved, moved.rank)
        };

        if let Some(moved) = next.iter_mut().find(|p| p.id == piece.id) {
            if check.should_promote && check.can_promote {
                let promoted = mv.promotion.ok_or(GameError::PromotionRequired)?;
                if matches!(promoted, PieceType::Pawn | PieceType::King) {
                    return Err(GameError::InvalidPromotion(promoted));
                }
                moved.piece_type = promoted;
                moved.deferred_promotion = None;
                tracing::info!(piece = moved.id, ?promoted, "pawn promoted");
            } else if check.is_deferred {
                moved.deferred_promotion = check.overhang_board;
                tracing::info!(
                    piece = moved.id,
                    overhang = ?check.overhang_board,
                    "promotion deferred under overhang"
                );
            }
        }

        self.pieces = next;
        Ok(())
    }

    fn play_board_move(&mut self, request: &BoardMove) -> Result<(), GameError> {
        let outcome = {
            let position = Position::new(&self.world, &self.pieces, &self.boards);
            Rules::execute_board_move(&position, request, self.turn)?
        };
        {
            let simulated = Position::new(&self.world, &outcome.pieces, &outcome.boards);
            if Rules::is_in_check(&simulated, self.turn) {
                return Err(GameError::Rule(MoveError::SelfCheck));
            }
        }
        self.pieces = outcome.pieces;
        self.boards = outcome.boards;
        self.board_activated_this_turn = true;
        for id in outcome.forced_promotions {
            self.force_promotion(id);
        }
        Ok(())
    }

    /// A pawn whose overhang vanished promotes on the spot. Queen is the
    /// only sensible default here; underpromotion needs the pawn to move.
    fn force_promotion(&mut self, id: PieceId) {
        if let Some(piece) = self.pieces.iter_mut().find(|p| p.id == id) {
            if piece.piece_type == PieceType::Pawn {
                piece.piece_type = PieceType::Queen;
                piece.deferred_promotion = None;
                tracing::info!(piece = id, "forced promotion");
            }
        }
    }

    fn play_castle(&mut self, side: CastleSide) -> Result<(), GameError> {
        let (plan, king_level, rook_level) = {
            let position = Position::new(&self.world, &self.pieces, &self.boards);
            let plan = castling::plan_castle(
                &position,
                self.turn,
                side,
                self.board_activated_this_turn,
            )?;
            let king_level = position
                .level_for(&plan.king.to.level)
                .unwrap_or_else(|| panic!("castle destination {} not active", plan.king.to));
            let rook_level = position
                .level_for(&plan.rook.to.level)
                .unwrap_or_else(|| panic!("castle destination {} not active", plan.rook.to));
            (plan, king_level, rook_level)
        };

        for piece in self.pieces.iter_mut() {
            let (to, level) = if piece.id == plan.king.piece {
                (plan.king.to, king_level)
            } else if piece.id == plan.rook.piece {
                (plan.rook.to, rook_level)
            } else {
                continue;
            };
            piece.file = to.file;
            piece.rank = to.rank;
            piece.level = level;
            piece.has_moved = true;
        }
        tracing::info!(player = %self.turn, ?side, "castled");
        Ok(())
    }

    fn evaluate_status(&self, hash: u64) -> GameResult {
        let position = Position::new(&self.world, &self.pieces, &self.boards);
        let opponent = self.turn.opponent();
        if Rules::is_checkmate(&position, opponent) {
            return GameResult::Checkmate(self.turn);
        }
        if Rules::is_stalemate(&position, opponent) {
            return GameResult::Stalemate;
        }
        if self.history.iter().filter(|&&h| h == hash).count() >= 3 {
            return GameResult::Draw;
        }
        GameResult::InProgress
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard array: each side's queen-line board carries rook, queen and
/// two pawns, the king-line board king, rook and two pawns; the main back
/// rank is knight-bishop-bishop-knight with four pawns ahead of it.
pub fn initial_pieces() -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(32);
    let mut id: PieceId = 0;
    let mut push = |pieces: &mut Vec<Piece>, t: PieceType, owner: Player, file: u8, rank: u8, level: Level| {
        pieces.push(Piece::new(id, t, owner, file, rank, level));
        id += 1;
    };

    use PieceType::*;
    for owner in [Player::White, Player::Black] {
        let (back, pawn_rank, main_back, main_pawn, ql, kl) = match owner {
            Player::White => (
                0,
                1,
                1,
                2,
                AttackBoardId::WhiteQueen,
                AttackBoardId::WhiteKing,
            ),
            Player::Black => (
                9,
                8,
                8,
                7,
                AttackBoardId::BlackQueen,
                AttackBoardId::BlackKing,
            ),
        };
        let main = match owner {
            Player::White => MainBoard::White,
            Player::Black => MainBoard::Black,
        };

        push(&mut pieces, Rook, owner, 0, back, Level::Attack(ql));
        push(&mut pieces, Queen, owner, 1, back, Level::Attack(ql));
        push(&mut pieces, Pawn, owner, 0, pawn_rank, Level::Attack(ql));
        push(&mut pieces, Pawn, owner, 1, pawn_rank, Level::Attack(ql));

        push(&mut pieces, King, owner, 4, back, Level::Attack(kl));
        push(&mut pieces, Rook, owner, 5, back, Level::Attack(kl));
        push(&mut pieces, Pawn, owner, 4, pawn_rank, Level::Attack(kl));
        push(&mut pieces, Pawn, owner, 5, pawn_rank, Level::Attack(kl));

        for (file, t) in [(1, Knight), (2, Bishop), (3, Bishop), (4, Knight)] {
            push(&mut pieces, t, owner, file, main_back, Level::Main(main));
        }
        for file in 1..=4 {
            push(&mut pieces, Pawn, owner, file, main_pawn, Level::Main(main));
        }
    }
    pieces
}
