//! Player state management.

use crate::game::{Coord, Creature};

/// Roster capacity.
pub const MAX_COMPANIONS: usize = 3;

/// Length of a full day/night cycle, in steps.
pub const DAY_LENGTH: u32 = 40;
/// First step of the cycle that counts as night.
pub const NIGHT_START: u32 = 30;

/// Ceiling for step and resource counters; saves store them as `i32`.
pub const COUNTER_MAX: u32 = 0x7FFF_FFFF;

/// Where a new game begins.
pub const SPAWN: Coord = Coord::new(4, 4);

/// Whether the given step count falls into the night part of the cycle.
#[must_use]
pub const fn is_night(steps: u32) -> bool {
    steps % DAY_LENGTH >= NIGHT_START
}

/// Resource counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resources {
    /// Wood.
    pub wood: u32,
    /// Stone.
    pub stone: u32,
    /// Capture orbs.
    pub orbs: u32,
}

impl Resources {
    /// Create a resource bundle.
    #[must_use]
    pub const fn new(wood: u32, stone: u32, orbs: u32) -> Self {
        Self { wood, stone, orbs }
    }

    /// Whether wood and stone cover the given cost.
    #[must_use]
    pub const fn covers(&self, wood: u32, stone: u32) -> bool {
        self.wood >= wood && self.stone >= stone
    }

    /// Deduct wood and stone. Returns `false` (and deducts nothing) if they don't cover it.
    pub fn spend(&mut self, wood: u32, stone: u32) -> bool {
        if !self.covers(wood, stone) {
            return false;
        }
        self.wood -= wood;
        self.stone -= stone;
        true
    }

    /// Add another bundle, saturating at [`COUNTER_MAX`].
    pub fn add(&mut self, other: Resources) {
        self.wood = self.wood.saturating_add(other.wood).min(COUNTER_MAX);
        self.stone = self.stone.saturating_add(other.stone).min(COUNTER_MAX);
        self.orbs = self.orbs.saturating_add(other.orbs).min(COUNTER_MAX);
    }
}

/// State for the player character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Current position.
    pub position: Coord,
    /// Committed moves so far; drives the day/night cycle.
    pub steps: u32,
    /// Wood, stone and orbs.
    pub resources: Resources,
    /// Captured creatures, in capture order.
    companions: Vec<Creature>,
}

impl Player {
    /// Create a player at `position` with the starting kit (8 wood, 5 stone, 1 orb).
    #[must_use]
    pub fn new(position: Coord) -> Self {
        Self {
            position,
            steps: 0,
            resources: Resources::new(8, 5, 1),
            companions: Vec::with_capacity(MAX_COMPANIONS),
        }
    }

    /// Whether it is currently night.
    #[must_use]
    pub const fn is_night(&self) -> bool {
        is_night(self.steps)
    }

    /// Commit a move to `to`, advancing the step counter up to [`COUNTER_MAX`].
    pub fn step_to(&mut self, to: Coord) {
        self.position = to;
        self.steps = self.steps.saturating_add(1).min(COUNTER_MAX);
    }

    /// Companions in roster order.
    #[must_use]
    pub fn companions(&self) -> &[Creature] {
        &self.companions
    }

    /// Mutable companions in roster order.
    pub fn companions_mut(&mut self) -> &mut [Creature] {
        &mut self.companions
    }

    /// First companion, if any.
    #[must_use]
    pub fn lead_companion(&self) -> Option<&Creature> {
        self.companions.first()
    }

    /// Add a creature to the roster.
    ///
    /// Returns `false` and drops the creature when the roster is full.
    pub fn add_companion(&mut self, creature: Creature) -> bool {
        if self.companions.len() >= MAX_COMPANIONS {
            return false;
        }
        self.companions.push(creature);
        true
    }

    /// Replace the roster, keeping at most [`MAX_COMPANIONS`] creatures.
    pub fn replace_companions(&mut self, creatures: impl IntoIterator<Item = Creature>) {
        self.companions.clear();
        self.companions
            .extend(creatures.into_iter().take(MAX_COMPANIONS));
    }

    /// Heal every companion by `amount`, each capped at its max hp.
    pub fn heal_companions(&mut self, amount: u32) {
        for creature in &mut self.companions {
            creature.heal(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(SPAWN);
        assert_eq!(player.position, Coord::new(4, 4));
        assert_eq!(player.steps, 0);
        assert_eq!(player.resources, Resources::new(8, 5, 1));
        assert!(player.companions().is_empty());
    }

    #[test]
    fn test_day_night_cycle() {
        assert!(!is_night(0));
        assert!(!is_night(29));
        assert!(is_night(30));
        assert!(is_night(39));
        assert!(!is_night(40));
        assert!(is_night(70));
    }

    #[test]
    fn test_step_to_counts() {
        let mut player = Player::new(SPAWN);
        player.step_to(Coord::new(5, 4));
        player.step_to(Coord::new(5, 5));
        assert_eq!(player.steps, 2);
        assert_eq!(player.position, Coord::new(5, 5));
    }

    #[test]
    fn test_roster_cap() {
        let mut player = Player::new(SPAWN);
        let c = Creature::of_species(0, 24).unwrap();
        for _ in 0..MAX_COMPANIONS {
            assert!(player.add_companion(c));
        }
        assert!(!player.add_companion(c));
        assert_eq!(player.companions().len(), MAX_COMPANIONS);

        player.replace_companions(vec![c; 5]);
        assert_eq!(player.companions().len(), MAX_COMPANIONS);
    }

    #[test]
    fn test_counters_stop_at_ceiling() {
        let mut res = Resources::new(COUNTER_MAX - 1, 0, u32::MAX);
        res.add(Resources::new(5, u32::MAX, 1));
        assert_eq!(res, Resources::new(COUNTER_MAX, COUNTER_MAX, COUNTER_MAX));

        let mut player = Player::new(SPAWN);
        player.steps = COUNTER_MAX - 1;
        player.step_to(Coord::new(5, 4));
        player.step_to(Coord::new(6, 4));
        assert_eq!(player.steps, COUNTER_MAX);
    }

    #[test]
    fn test_spend_is_all_or_nothing() {
        let mut res = Resources::new(4, 2, 0);
        assert!(!res.spend(10, 6));
        assert_eq!(res, Resources::new(4, 2, 0));
        assert!(res.spend(4, 2));
        assert_eq!(res, Resources::new(0, 0, 0));
    }

    #[test]
    fn test_heal_companions_caps() {
        let mut player = Player::new(SPAWN);
        let mut hurt = Creature::of_species(1, 30).unwrap();
        hurt.hp = 28;
        let mut low = Creature::of_species(2, 26).unwrap();
        low.hp = 10;
        player.add_companion(hurt);
        player.add_companion(low);
        player.heal_companions(4);
        assert_eq!(player.companions()[0].hp, 30);
        assert_eq!(player.companions()[1].hp, 14);
    }
}
