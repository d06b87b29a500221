//! Error types for rejected player actions.

use thiserror::Error;

use crate::game::Tile;

/// Reason a player action was rejected.
///
/// Every variant is recoverable: the controller turns it into a transient
/// on-screen message and the game carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The tile under the player does not accept buildings.
    #[error("you can't build here")]
    InvalidPlacement,
    /// Wood or stone do not cover the cost.
    #[error("not enough materials")]
    InsufficientResources,
    /// Target tile is a wall or water.
    #[error("{0} blocks the way")]
    Blocked(Tile),
    /// No NPC stands next to the player.
    #[error("there's nobody to talk to here")]
    NoTarget,
    /// An orb was needed but the player has none.
    #[error("you have no orbs")]
    NoResource,
    /// The save block is missing, truncated or carries the wrong signature.
    #[error("no save found")]
    CorruptOrAbsentSave,
}

/// Result type for game actions.
pub type ActionResult<T> = Result<T, ActionError>;
