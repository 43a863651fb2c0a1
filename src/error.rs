//! Engine error type
//!
//! Only static-configuration bugs surface here. Game over is regular control
//! flow and never travels through this type.

use thiserror::Error;

use crate::games::GameId;

#[derive(Debug, Error)]
pub enum ArcadeError {
    /// A chunk library with no patterns reached the selector
    #[error("chunk library for `{game}` is empty")]
    EmptyLibrary { game: GameId },
    /// A game id string that is not in the game table
    #[error("no game spec for id `{0}`")]
    UnknownGame(String),
    /// Settings JSON could not be parsed
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}
