use crate::application::game_service::GameService;
use crate::domain::models::GameResult;
use crate::infrastructure::display::render_game;

pub struct ConsoleInterface;

impl ConsoleInterface {
    pub fn run(mut game_service: GameService, colored: bool) {
        println!("Starting Game...");
        println!("{}", render_game(game_service.game(), colored));

        loop {
            if let Some(result) = game_service.is_game_over() {
                match result {
                    GameResult::Checkmate(p) => println!("Checkmate! {} wins!", p),
                    GameResult::Stalemate => println!("Stalemate! It's a draw!"),
                    GameResult::Draw => println!("Draw by repetition!"),
                    _ => {}
                }
                break;
            }

            println!("{} to move", game_service.turn());

            match game_service.perform_next_move() {
                Ok(_) => {
                    println!("{}", render_game(game_service.game(), colored));
                }
                Err(e) => {
                    println!("Error: {}", e);
                    if e == "No move available" {
                        break;
                    }
                }
            }
        }
    }
}
