//! # Game Implementations
//!
//! Implementations of the [`Game`](crate::game_trait::Game) trait.
//!
//! Each game has its own submodule with:
//! - Board state and move representation
//! - Game rules implementation
//! - Action id catalog
//! - Canonicalization and symmetries
//! - Position hashing
//!
//! ## Available Games
//!
//! - **Blooms**: hex placement game with group captures (see `blooms/` module)

pub mod blooms;

pub use blooms::{BloomsConfig, BloomsGame, Position};
