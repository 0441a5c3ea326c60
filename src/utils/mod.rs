// utils/mod.rs
pub mod config;
pub mod helpers;

// Ré-exports pour faciliter l'import
pub use config::Config;
pub use helpers::{elapsed_ms, parse_flag, round_to};
