//! Game invariants - sanity checks that detect bugs.
//!
//! No sequence of inputs should ever trigger these. If one does, a rule
//! somewhere let the session drift into a state the rest of the code does not
//! expect (a player inside a wall, an overfull roster, a creature with more
//! hit points than its maximum).

use std::fmt;

use crate::game::{COUNTER_MAX, GameState, MAX_COMPANIONS, Tile};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all session invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Border ring
    for (coord, tile) in state.map.iter() {
        if state.map.is_border(coord) && tile != Tile::Wall {
            violations.push(violation(format!(
                "Border cell {coord:?} is {tile:?}, expected Wall"
            )));
        }
    }

    // Player placement
    let position = state.player.position;
    if !state.map.is_interior(position) {
        violations.push(violation(format!(
            "Player at {position:?} is outside the interior"
        )));
    } else if state.tile_under_player().is_blocking() {
        violations.push(violation(format!(
            "Player at {position:?} stands on {}",
            state.tile_under_player()
        )));
    }

    // Counters fit the save record
    let player = &state.player;
    let counters = [
        ("steps", player.steps),
        ("wood", player.resources.wood),
        ("stone", player.resources.stone),
        ("orbs", player.resources.orbs),
    ];
    for (name, value) in counters {
        if value > COUNTER_MAX {
            violations.push(violation(format!(
                "Counter {name} is {value} > max {COUNTER_MAX}"
            )));
        }
    }

    // Roster
    let companions = state.player.companions();
    if companions.len() > MAX_COMPANIONS {
        violations.push(violation(format!(
            "Roster holds {} creatures > max {MAX_COMPANIONS}",
            companions.len()
        )));
    }
    for (slot, creature) in companions.iter().enumerate() {
        if creature.hp > creature.max_hp {
            violations.push(violation(format!(
                "Companion {slot} ({}) has hp {} > max {}",
                creature.name, creature.hp, creature.max_hp
            )));
        }
        if !creature.caught {
            violations.push(violation(format!(
                "Companion {slot} ({}) is not marked caught",
                creature.name
            )));
        }
    }

    // NPC placement
    for npc in state.npcs.as_slice() {
        if !state.map.in_bounds(npc.position) {
            violations.push(violation(format!(
                "NPC {} at {:?} is off the map",
                npc.name, npc.position
            )));
        }
    }

    violations
}

/// Assert that all invariants hold (panics on violation).
///
/// Only active in debug builds. Use this after each tick during development.
///
/// # Panics
///
/// Panics listing every violation if any invariant fails.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
        panic!("Game invariants violated:\n{}", messages.join("\n"));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub const fn assert_invariants(_state: &GameState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, Creature};

    #[test]
    fn test_new_session_is_sound() {
        let state = GameState::new(7);
        assert!(check_invariants(&state).is_empty());
        assert_invariants(&state);
    }

    #[test]
    fn test_detects_player_in_water() {
        let mut state = GameState::new(7);
        state.player.position = Coord::new(60, 10);
        let violations = check_invariants(&state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("water"));
    }

    #[test]
    fn test_detects_broken_border() {
        let mut state = GameState::new(7);
        state.map.set(Coord::new(0, 5), Tile::Grass);
        assert_eq!(check_invariants(&state).len(), 1);
    }

    #[test]
    fn test_detects_bad_companion() {
        let mut state = GameState::new(7);
        let mut creature = Creature::of_species(0, 24).unwrap();
        creature.hp = 30;
        state.player.add_companion(creature);
        // hp above max and not caught
        assert_eq!(check_invariants(&state).len(), 2);
    }

    #[test]
    fn test_detects_oversized_counter() {
        let mut state = GameState::new(7);
        state.player.resources.orbs = COUNTER_MAX + 1;
        let violations = check_invariants(&state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("orbs"));
    }

    #[test]
    #[should_panic(expected = "Game invariants violated")]
    #[cfg(debug_assertions)]
    fn test_assert_panics() {
        let mut state = GameState::new(7);
        state.player.position = Coord::new(0, 0);
        assert_invariants(&state);
    }
}
