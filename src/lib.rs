pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

pub mod config;
