//! Game layer for Fauna.
//!
//! Implements the rules of a session:
//! - World map with biome and structure tiles
//! - Player movement, gathering and the day/night cycle
//! - Villagers with dialogue and one-time gifts
//! - Buildings and quick crafting
//! - Wild creatures, type effectiveness and battles
//! - Mission flags

mod battle;
mod build;
mod creature;
mod invariants;
mod map;
mod mission;
mod npc;
mod player;
mod state;

pub use battle::{
    Battle, BattleAction, BattleEvent, BattleOutcome, BattlePhase, EVENT_LOG_LEN, capture_chance,
    quick_attack_damage, special_move_damage, special_move_element,
};
pub use build::{BUILD_CATALOG, BuildDef, BuildSelection, CraftOutcome, quick_craft, try_build};
pub use creature::{Ability, Creature, Element, SPECIES, Species, effectiveness};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use map::{Coord, Direction, MAP_HEIGHT, MAP_WIDTH, Tile, WorldMap};
pub use mission::{MISSION_COUNT, MISSIONS, Mission, MissionTracker};
pub use npc::{Npc, NpcRegistry};
pub use player::{
    COUNTER_MAX, DAY_LENGTH, MAX_COMPANIONS, NIGHT_START, Player, Resources, SPAWN, is_night,
};
pub use state::{GameState, MOVE_COOLDOWN, WorldEvent};
