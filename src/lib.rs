//! # Cricket Stats
//!
//! A player and match-performance tracker with leaderboard analytics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, batting and bowling performances)
//! - **analytics**: Leaderboard metrics and the summary engine
//! - **storage**: JSONL-backed record store
//! - **auth**: Bearer-token access control
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
