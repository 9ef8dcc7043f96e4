//! CLI entry points

pub mod commands;
