//! Shared infrastructure-agnostic helpers (configuration).

pub mod config;
