use crate::domain::game::Game;
use crate::domain::models::{GameResult, Player};
use crate::domain::services::PlayerStrategy;

/// Drives a full game between two strategies, one action per turn.
pub struct GameService<'a> {
    game: Game,
    player_white: Box<dyn PlayerStrategy + 'a>,
    player_black: Box<dyn PlayerStrategy + 'a>,
}

impl<'a> GameService<'a> {
    pub fn new(
        game: Game,
        player_white: Box<dyn PlayerStrategy + 'a>,
        player_black: Box<dyn PlayerStrategy + 'a>,
    ) -> Self {
        GameService {
            game,
            player_white,
            player_black,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn turn(&self) -> Player {
        self.game.turn()
    }

    pub fn is_game_over(&self) -> Option<GameResult> {
        match self.game.status() {
            GameResult::InProgress => None,
            result => Some(result),
        }
    }

    pub fn perform_next_move(&mut self) -> Result<GameResult, String> {
        if self.is_game_over().is_some() {
            return Err("Game is over".to_string());
        }

        let strategy = match self.game.turn() {
            Player::White => &mut self.player_white,
            Player::Black => &mut self.player_black,
        };

        if let Some(action) = strategy.get_action(&self.game) {
            self.game.play(action).map_err(|e| e.to_string())
        } else {
            Err("No move available".to_string())
        }
    }
}
