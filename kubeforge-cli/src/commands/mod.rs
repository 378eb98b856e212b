//! Subcommand handlers

pub mod config;
pub mod project;
pub mod render;
