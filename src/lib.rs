pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod gate;
pub mod git;
pub mod guard;
pub mod lifecycle;
pub mod models;
pub mod parser;
pub mod validation;
