pub mod coordinate;
pub mod game;
pub mod models;
pub mod rules;
pub mod services;
pub mod world;
pub mod zobrist;
