use trichess::application::game_service::GameService;
use trichess::config::AppConfig;
use trichess::domain::game::Game;
use trichess::domain::services::PlayerStrategy;
use trichess::infrastructure::console::HumanConsolePlayer;
use trichess::interface::console::ConsoleInterface;

use tracing_subscriber::EnvFilter;

fn main() {
    let config = AppConfig::load();

    let filter = EnvFilter::try_new(&config.log.filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let player_white: Box<dyn PlayerStrategy> = Box::new(HumanConsolePlayer::new());
    let player_black: Box<dyn PlayerStrategy> = Box::new(HumanConsolePlayer::new());

    let game = Game::new();
    let service = GameService::new(game, player_white, player_black);
    ConsoleInterface::run(service, config.display.colored);
}
