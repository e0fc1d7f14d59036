use crate::domain::coordinate::{AttackBoardId, PinId, SquareId};
use crate::domain::game::Game;
use crate::domain::models::{
    Action, ArrivalChoice, BoardMove, CastleSide, PieceMove, PieceType,
};
use crate::domain::services::PlayerStrategy;
use std::io::{self, Write};

pub struct HumanConsolePlayer;

impl HumanConsolePlayer {
    pub fn new() -> Self {
        Self
    }

    fn parse_action(input: &str) -> Result<Option<Action>, String> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            [] => Err("empty input".to_string()),
            ["quit"] | ["resign"] => Ok(None),
            ["castle", side] => {
                let side = match *side {
                    "k" | "K" | "kingside" => CastleSide::King,
                    "q" | "Q" | "queenside" => CastleSide::Queen,
                    other => return Err(format!("unknown castle side '{}'", other)),
                };
                Ok(Some(Action::Castle(side)))
            }
            ["board", board, pin, rest @ ..] => {
                let board: AttackBoardId = board.parse().map_err(|e| format!("{}", e))?;
                let to: PinId = pin.parse().map_err(|e| format!("{}", e))?;
                let arrival = match rest {
                    [] => None,
                    ["rot"] | ["rot180"] => Some(ArrivalChoice::Rot180),
                    ["keep"] | ["identity"] => Some(ArrivalChoice::Identity),
                    other => return Err(format!("unknown arrival '{}'", other.join(" "))),
                };
                Ok(Some(Action::Board(BoardMove { board, to, arrival })))
            }
            [only] => Err(format!("incomplete input '{}'", only)),
            [from, to, rest @ ..] => {
                let from: SquareId = from.parse().map_err(|e| format!("{}", e))?;
                let to: SquareId = to.parse().map_err(|e| format!("{}", e))?;
                let promotion = match rest {
                    [] => None,
                    [p] if p.len() == 1 => {
                        let c = p.chars().next().unwrap_or('?');
                        match PieceType::from_letter(c) {
                            Some(t) if !matches!(t, PieceType::Pawn | PieceType::King) => Some(t),
                            _ => return Err(format!("'{}' is not a promotion piece", p)),
                        }
                    }
                    other => return Err(format!("unknown promotion '{}'", other.join(" "))),
                };
                Ok(Some(Action::Move(PieceMove {
                    from,
                    to,
                    promotion,
                })))
            }
        }
    }
}

impl Default for HumanConsolePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStrategy for HumanConsolePlayer {
    fn get_action(&mut self, _game: &Game) -> Option<Action> {
        loop {
            println!(
                "Enter a move: 'a2W a3W [Q]', 'board WQL QL2 [rot|keep]', 'castle k|q', or 'quit'"
            );
            print!("> ");
            let _ = io::stdout().flush();

            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_err() {
                return None;
            }
            match Self::parse_action(input.trim()) {
                Ok(action) => return action,
                Err(reason) => println!("Invalid input: {}", reason),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coordinate::Track;

    #[test]
    fn parses_piece_move_with_promotion() {
        let action = HumanConsolePlayer::parse_action("b7B b8B Q").unwrap();
        match action {
            Some(Action::Move(mv)) => {
                assert_eq!(mv.promotion, Some(PieceType::Queen));
                assert_eq!(mv.from.to_string(), "b7B");
                assert_eq!(mv.to.to_string(), "b8B");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn parses_board_move() {
        let action = HumanConsolePlayer::parse_action("board WQL QL2 rot").unwrap();
        match action {
            Some(Action::Board(mv)) => {
                assert_eq!(mv.board, AttackBoardId::WhiteQueen);
                assert_eq!(mv.to, PinId::new(Track::Queen, 2));
                assert_eq!(mv.arrival, Some(ArrivalChoice::Rot180));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(HumanConsolePlayer::parse_action("xyzzy").is_err());
        assert!(HumanConsolePlayer::parse_action("a2W k9Q").is_err());
    }
}
