pub mod engine;
pub mod history_sink;
