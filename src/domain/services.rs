use crate::domain::game::Game;
use crate::domain::models::Action;

pub trait PlayerStrategy {
    fn get_action(&mut self, game: &Game) -> Option<Action>;
}
