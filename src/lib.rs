// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Fauna: the simulation core of a tile-based exploration game.
//!
//! A session holds a persistent world of biome and structure tiles, a player
//! who gathers resources and builds, villagers with one-time gifts, wild
//! creatures that can be fought and captured, and a fixed-size save block.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Host (terminal UI / script run)   │
//! ├─────────────────────────────────────┤
//! │   Controller: InputFrame → Frame    │
//! ├─────────────────────────────────────┤
//! │   Game rules (world, battle, save)  │
//! └─────────────────────────────────────┘
//! ```
//!
//! The core is deterministic: a seed plus a sequence of input frames
//! always yields the same frames.
//!
//! ```
//! use fauna::{Button, Game, InputFrame, Mode};
//!
//! let mut game = Game::new(7);
//! let frame = game.tick(InputFrame::press(Button::Menu));
//! assert_eq!(frame.mode, Mode::Menu);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod input;
pub mod render;
pub mod rng;
pub mod save;

pub use config::{ConfigError, GameConfig};
pub use controller::{Game, Message, Mode};
pub use error::{ActionError, ActionResult};
pub use input::{Button, ButtonSet, InputFrame, InputParseError, MAX_REPEAT, parse_script};
pub use render::{Frame, Screen, WorldView};
pub use rng::GameRng;
pub use save::{SAVE_SIZE, SaveBlock, SaveData};

// Re-export key game types at crate root for convenience
pub use game::{Battle, Coord, Creature, Element, GameState, Player, Resources, Tile};
