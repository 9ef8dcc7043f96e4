//! Memescout library
//!
//! Polls DexScreener for fresh Solana token listings, vets each candidate
//! through a fail-closed screening pipeline, and alerts a Telegram chat about
//! the ones that pass every gate.

pub mod alert;
pub mod chain;
pub mod cli;
pub mod config;
pub mod dexscreener;
pub mod error;
pub mod scheduler;
pub mod screen;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
