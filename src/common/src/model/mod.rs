pub mod game;
pub mod history;
