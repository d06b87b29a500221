//! Game state management.
//!
//! [`GameState`] owns everything a session needs: the map, the player, the
//! villagers, mission flags, the build cursor and the session RNG. World
//! actions are methods on it; the controller decides which ones run on a
//! given frame.

use log::{debug, trace};

use crate::error::{ActionError, ActionResult};
use crate::game::{
    BuildSelection, Coord, CraftOutcome, Creature, Direction, MissionTracker, NpcRegistry, Player,
    Resources, SPAWN, Tile, WorldMap, build,
};
use crate::rng::GameRng;

/// Frames between two steps while a direction is held.
pub const MOVE_COOLDOWN: u8 = 3;

/// Chance (percent) that a tree yields wood.
const TREE_YIELD_CHANCE: u32 = 70;
/// Chance (percent) that searching grass or sand flushes out a creature.
const ENCOUNTER_CHANCE: u32 = 18;
/// Chance (percent) that a thrown orb lures a creature out instead of being lost.
const ORB_LURE_CHANCE: u32 = 12;
/// Chance (percent), per night frame in the boss area, of finding boss traces.
const BOSS_TRACE_CHANCE: u32 = 5;
/// Orbs found with boss traces.
const BOSS_TRACE_ORBS: u32 = 2;
/// Hit points restored to each companion at a campfire.
const CAMPFIRE_HEAL: u32 = 4;

/// Outcome of a successful world action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    /// Resources were collected.
    Gathered(Resources),
    /// The tree gave nothing this time.
    TreeResisted,
    /// Searched grass or sand without finding anything.
    Rustling,
    /// A wild creature appeared.
    Encounter(Creature),
    /// Companions rested at a campfire.
    Rested,
    /// Spoke with an NPC.
    Talked {
        /// Registry index of the NPC.
        npc: usize,
        /// Gift received, on the first conversation only.
        gift: Option<Resources>,
    },
    /// A structure was placed.
    Built(Tile),
    /// Quick craft produced something.
    Crafted(CraftOutcome),
    /// An orb was thrown and lost.
    OrbLost,
    /// Boss traces turned up some orbs.
    BossTraces(u32),
}

/// Complete game state.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The world map.
    pub map: WorldMap,
    /// The player.
    pub player: Player,
    /// Villagers.
    pub npcs: NpcRegistry,
    /// Mission flags.
    pub missions: MissionTracker,
    /// Building picked for the next build.
    pub selection: BuildSelection,
    rng: GameRng,
    move_cooldown: u8,
}

impl GameState {
    /// Start a new session: generate the world from `seed` and spawn the player.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let map = WorldMap::generate(&mut rng);
        debug!("new session with seed {seed}");
        Self {
            map,
            player: Player::new(SPAWN),
            npcs: NpcRegistry::standard(),
            missions: MissionTracker::new(),
            selection: BuildSelection::default(),
            rng,
            move_cooldown: 0,
        }
    }

    /// Seed the session was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// The player and the session RNG, borrowed together for battle resolution.
    pub fn player_and_rng(&mut self) -> (&mut Player, &mut GameRng) {
        (&mut self.player, &mut self.rng)
    }

    /// Frames left before the next step may be taken.
    #[must_use]
    pub const fn move_cooldown(&self) -> u8 {
        self.move_cooldown
    }

    /// Whether it is currently night.
    #[must_use]
    pub const fn is_night(&self) -> bool {
        self.player.is_night()
    }

    /// Tile the player is standing on.
    #[must_use]
    pub fn tile_under_player(&self) -> Tile {
        // The player is always on the map; fall back to the border tile.
        self.map.tile_at(self.player.position).unwrap_or(Tile::Wall)
    }

    /// Whether the player is inside the boss hunting grounds.
    #[must_use]
    pub const fn in_boss_area(&self) -> bool {
        let Coord { x, y } = self.player.position;
        x > 55 && x < 75 && y > 6 && y < 20
    }

    /// Run one frame of walking.
    ///
    /// Ticks the movement cooldown down, then, if it has run out and a
    /// direction is held, restarts it and tries the step. Returns `None` when
    /// no step was attempted.
    pub fn walk(&mut self, held: Option<Direction>) -> Option<ActionResult<Coord>> {
        self.move_cooldown = self.move_cooldown.saturating_sub(1);
        if self.move_cooldown > 0 {
            return None;
        }
        let direction = held?;
        self.move_cooldown = MOVE_COOLDOWN;
        Some(self.try_move(direction))
    }

    /// Step one cell in `direction`.
    ///
    /// # Errors
    ///
    /// [`ActionError::Blocked`] when the target is a wall, water or outside
    /// the interior. The player stays put.
    pub fn try_move(&mut self, direction: Direction) -> ActionResult<Coord> {
        let target = self.player.position.step(direction);
        match target {
            Some(to) if self.map.is_walkable(to) => {
                self.player.step_to(to);
                Ok(to)
            }
            _ => {
                let tile = target
                    .and_then(|to| self.map.tile_at(to))
                    .unwrap_or(Tile::Wall);
                Err(ActionError::Blocked(tile))
            }
        }
    }

    /// Interact with the tile under the player.
    ///
    /// # Errors
    ///
    /// [`ActionError::Blocked`] on wall or water, [`ActionError::NoTarget`]
    /// when the tile offers nothing and no NPC is adjacent.
    pub fn gather(&mut self) -> ActionResult<WorldEvent> {
        let tile = self.tile_under_player();
        match tile {
            Tile::Wall | Tile::Water => Err(ActionError::Blocked(tile)),
            Tile::Tree => {
                if self.rng.chance(TREE_YIELD_CHANCE) {
                    Ok(self.collect(Resources::new(1, 0, 0)))
                } else {
                    Ok(WorldEvent::TreeResisted)
                }
            }
            hiding if hiding.hides_creatures() => {
                if self.rng.chance(ENCOUNTER_CHANCE) {
                    Ok(self.encounter())
                } else {
                    Ok(WorldEvent::Rustling)
                }
            }
            Tile::WorkPost => {
                let amount = if self.player.companions().is_empty() { 1 } else { 2 };
                let found = if self.rng.chance(50) {
                    Resources::new(amount, 0, 0)
                } else {
                    Resources::new(0, amount, 0)
                };
                Ok(self.collect(found))
            }
            Tile::Farm => Ok(self.collect(Resources::new(1, 0, 0))),
            Tile::Fire => {
                self.player.heal_companions(CAMPFIRE_HEAL);
                Ok(WorldEvent::Rested)
            }
            _ => self.talk(),
        }
    }

    /// Talk to the first NPC adjacent to the player.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoTarget`] when nobody is adjacent.
    pub fn talk(&mut self) -> ActionResult<WorldEvent> {
        let npc = self
            .npcs
            .adjacent_to(self.player.position)
            .ok_or(ActionError::NoTarget)?;
        let gift = self.npcs.talk(npc);
        if let Some(gift) = gift {
            self.player.resources.add(gift);
        }
        debug!("talked to npc {npc}, gift {gift:?}");
        Ok(WorldEvent::Talked { npc, gift })
    }

    /// Build the selected structure on the tile under the player.
    ///
    /// # Errors
    ///
    /// See [`build::try_build`].
    pub fn build(&mut self) -> ActionResult<WorldEvent> {
        let def = self.selection.current();
        let at = self.player.position;
        let tile = build::try_build(&mut self.map, &mut self.player, at, def)?;
        debug!("built {} at {at:?}", def.name);
        Ok(WorldEvent::Built(tile))
    }

    /// Quick craft on the tile under the player.
    ///
    /// # Errors
    ///
    /// See [`build::quick_craft`].
    pub fn quick_craft(&mut self) -> ActionResult<WorldEvent> {
        let at = self.player.position;
        let outcome = build::quick_craft(&mut self.map, &mut self.player, at)?;
        debug!("quick craft: {outcome:?}");
        Ok(WorldEvent::Crafted(outcome))
    }

    /// Throw an orb into the wild.
    ///
    /// Sometimes lures a creature out (the orb is kept), otherwise the orb is lost.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoResource`] without orbs.
    pub fn throw_orb(&mut self) -> ActionResult<WorldEvent> {
        if self.player.resources.orbs == 0 {
            return Err(ActionError::NoResource);
        }
        if self.rng.chance(ORB_LURE_CHANCE) {
            return Ok(self.encounter());
        }
        self.player.resources.orbs -= 1;
        Ok(WorldEvent::OrbLost)
    }

    /// Per-frame roll for boss traces while at night in the boss area.
    pub fn roll_boss_traces(&mut self) -> Option<WorldEvent> {
        if !(self.is_night() && self.in_boss_area()) {
            return None;
        }
        if !self.rng.chance(BOSS_TRACE_CHANCE) {
            return None;
        }
        self.player.resources.orbs = self.player.resources.orbs.saturating_add(BOSS_TRACE_ORBS);
        debug!("boss traces at {:?}", self.player.position);
        Some(WorldEvent::BossTraces(BOSS_TRACE_ORBS))
    }

    fn collect(&mut self, found: Resources) -> WorldEvent {
        self.player.resources.add(found);
        trace!("collected {found:?}");
        WorldEvent::Gathered(found)
    }

    fn encounter(&mut self) -> WorldEvent {
        WorldEvent::Encounter(Creature::random_wild(&mut self.rng))
    }
}
