pub mod cli;
pub mod entrypoint;
pub mod service;
