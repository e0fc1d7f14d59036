use crate::domain::coordinate::{file_letter, AttackBoardId, LevelId, MainBoard, SquareId};
use crate::domain::game::Game;
use crate::domain::models::{Piece, Player};
use crate::domain::rules::Position;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_WHITE: &str = "\x1b[37m";
const COLOR_BLACK: &str = "\x1b[31m";
const COLOR_DIM: &str = "\x1b[90m";

fn piece_glyph(piece: &Piece, colored: bool) -> String {
    let mut c = piece.piece_type.letter();
    if piece.owner == Player::Black {
        c = c.to_ascii_lowercase();
    }
    if colored {
        let color = match piece.owner {
            Player::White => COLOR_WHITE,
            Player::Black => COLOR_BLACK,
        };
        format!("{}{}{}", color, c, COLOR_RESET)
    } else {
        c.to_string()
    }
}

fn empty_glyph(colored: bool) -> String {
    if colored {
        format!("{}.{}", COLOR_DIM, COLOR_RESET)
    } else {
        ".".to_string()
    }
}

fn render_level(
    out: &mut String,
    position: &Position,
    title: &str,
    level: LevelId,
    file_lo: u8,
    file_hi: u8,
    rank_lo: u8,
    rank_hi: u8,
    colored: bool,
) {
    out.push_str(title);
    out.push('\n');
    for rank in (rank_lo..=rank_hi).rev() {
        out.push_str(&format!(" {} ", rank));
        for file in file_lo..=file_hi {
            let square = SquareId::new(file, rank, level);
            let glyph = match position.piece_at(&square) {
                Some(piece) => piece_glyph(piece, colored),
                None => empty_glyph(colored),
            };
            out.push(' ');
            out.push_str(&glyph);
        }
        out.push('\n');
    }
    out.push_str("   ");
    for file in file_lo..=file_hi {
        out.push(' ');
        out.push(file_letter(file));
    }
    out.push_str("\n\n");
}

/// All seven live levels, black's end first so the printout reads like the
/// physical set seen from white's side of the table.
pub fn render_game(game: &Game, colored: bool) -> String {
    let position = Position::new(game.world(), game.pieces(), game.boards());
    let mut out = String::new();

    let mut attack_order: Vec<AttackBoardId> = AttackBoardId::ALL.to_vec();
    attack_order.sort_by_key(|b| std::cmp::Reverse(game.boards().position(*b).pin.number));

    for board in &attack_order {
        let instance = game.boards().instance(*board);
        let pin = game.world().pin(instance.pin);
        render_level(
            &mut out,
            &position,
            &format!("{} @ {}", board, instance),
            LevelId::Instance(instance),
            pin.file_offset,
            pin.file_offset + 1,
            pin.rank_offset,
            pin.rank_offset + 1,
            colored,
        );
    }

    for main in [MainBoard::Black, MainBoard::Neutral, MainBoard::White] {
        let (lo, hi) = main.rank_span();
        render_level(
            &mut out,
            &position,
            &format!("Level {}", main.letter()),
            LevelId::Main(main),
            1,
            4,
            lo,
            hi,
            colored,
        );
    }

    out
}
