//! Building catalog, placement and quick crafting.

use crate::error::{ActionError, ActionResult};
use crate::game::{Coord, Player, Tile, WorldMap};

/// A structure the player can place in front of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildDef {
    /// Display name.
    pub name: &'static str,
    /// Wood cost.
    pub wood: u32,
    /// Stone cost.
    pub stone: u32,
    /// Tile written on success.
    pub tile: Tile,
}

/// Everything that can be built, in selection order.
pub static BUILD_CATALOG: [BuildDef; 4] = [
    BuildDef {
        name: "Work Post",
        wood: 10,
        stone: 6,
        tile: Tile::WorkPost,
    },
    BuildDef {
        name: "Tower",
        wood: 14,
        stone: 10,
        tile: Tile::Tower,
    },
    BuildDef {
        name: "Farm",
        wood: 8,
        stone: 8,
        tile: Tile::Farm,
    },
    BuildDef {
        name: "Campfire",
        wood: 6,
        stone: 4,
        tile: Tile::Fire,
    },
];

/// Wood and stone traded for one orb.
const ORB_RECIPE: (u32, u32) = (5, 3);

/// Cursor into [`BUILD_CATALOG`]; always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildSelection(usize);

impl BuildSelection {
    /// Selected catalog index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Selected building.
    #[must_use]
    pub fn current(self) -> &'static BuildDef {
        &BUILD_CATALOG[self.0]
    }

    /// Advance, wrapping to the first entry.
    pub fn next(&mut self) {
        self.0 = (self.0 + 1) % BUILD_CATALOG.len();
    }

    /// Step back, wrapping to the last entry.
    pub fn previous(&mut self) {
        self.0 = (self.0 + BUILD_CATALOG.len() - 1) % BUILD_CATALOG.len();
    }
}

/// What [`quick_craft`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftOutcome {
    /// Traded 5 wood and 3 stone for an orb.
    Orb,
    /// Placed a work post on the target cell.
    WorkPost,
}

fn check_site(map: &WorldMap, target: Coord) -> ActionResult<()> {
    if !map.is_interior(target) {
        return Err(ActionError::InvalidPlacement);
    }
    match map.tile_at(target) {
        Some(tile) if tile.is_buildable() => Ok(()),
        _ => Err(ActionError::InvalidPlacement),
    }
}

/// Place `def` at `target`, paying its cost.
///
/// # Errors
///
/// [`ActionError::InvalidPlacement`] if `target` is not an interior buildable
/// cell, else [`ActionError::InsufficientResources`] if the player can't pay.
/// Nothing changes on error.
pub fn try_build(
    map: &mut WorldMap,
    player: &mut Player,
    target: Coord,
    def: &BuildDef,
) -> ActionResult<Tile> {
    check_site(map, target)?;
    if !player.resources.spend(def.wood, def.stone) {
        return Err(ActionError::InsufficientResources);
    }
    map.set(target, def.tile);
    Ok(def.tile)
}

/// Craft whatever the player can currently afford.
///
/// An orb takes priority; otherwise a work post goes onto `target` when it is
/// buildable.
///
/// # Errors
///
/// [`ActionError::InsufficientResources`] when neither recipe applies.
pub fn quick_craft(
    map: &mut WorldMap,
    player: &mut Player,
    target: Coord,
) -> ActionResult<CraftOutcome> {
    let (wood, stone) = ORB_RECIPE;
    if player.resources.spend(wood, stone) {
        player.resources.orbs = player.resources.orbs.saturating_add(1);
        return Ok(CraftOutcome::Orb);
    }

    let post = &BUILD_CATALOG[0];
    if player.resources.covers(post.wood, post.stone) && check_site(map, target).is_ok() {
        try_build(map, player, target, post)?;
        return Ok(CraftOutcome::WorkPost);
    }

    Err(ActionError::InsufficientResources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Resources;

    fn setup() -> (WorldMap, Player) {
        (WorldMap::new(12, 12).unwrap(), Player::new(Coord::new(4, 4)))
    }

    #[test]
    fn test_selection_wraps() {
        let mut sel = BuildSelection::default();
        assert_eq!(sel.current().name, "Work Post");
        sel.previous();
        assert_eq!(sel.index(), 3);
        assert_eq!(sel.current().tile, Tile::Fire);
        sel.next();
        assert_eq!(sel.index(), 0);
        assert_eq!(sel.current().tile, Tile::WorkPost);
        sel.next();
        assert_eq!(sel.current().tile, Tile::Tower);
    }

    #[test]
    fn test_build_spends_and_places() {
        let (mut map, mut player) = setup();
        player.resources = Resources::new(10, 6, 0);
        let target = Coord::new(5, 4);
        assert_eq!(
            try_build(&mut map, &mut player, target, &BUILD_CATALOG[0]),
            Ok(Tile::WorkPost)
        );
        assert_eq!(map.tile_at(target), Some(Tile::WorkPost));
        assert_eq!(player.resources, Resources::new(0, 0, 0));
    }

    #[test]
    fn test_build_insufficient_leaves_state() {
        let (mut map, mut player) = setup();
        let before = player.resources;
        let target = Coord::new(5, 4);
        assert_eq!(
            try_build(&mut map, &mut player, target, &BUILD_CATALOG[1]),
            Err(ActionError::InsufficientResources)
        );
        assert_eq!(player.resources, before);
        assert_eq!(map.tile_at(target), Some(Tile::Grass));
    }

    #[test]
    fn test_build_rejects_bad_sites() {
        let (mut map, mut player) = setup();
        player.resources = Resources::new(100, 100, 0);
        map.set(Coord::new(5, 4), Tile::Tree);
        for target in [Coord::new(5, 4), Coord::new(0, 4), Coord::new(11, 4)] {
            assert_eq!(
                try_build(&mut map, &mut player, target, &BUILD_CATALOG[3]),
                Err(ActionError::InvalidPlacement)
            );
        }
        assert_eq!(player.resources, Resources::new(100, 100, 0));
    }

    #[test]
    fn test_quick_craft_prefers_orb() {
        let (mut map, mut player) = setup();
        player.resources = Resources::new(12, 7, 0);
        let target = Coord::new(5, 4);
        assert_eq!(quick_craft(&mut map, &mut player, target), Ok(CraftOutcome::Orb));
        assert_eq!(player.resources, Resources::new(7, 4, 1));
        assert_eq!(map.tile_at(target), Some(Tile::Grass));
    }

    #[test]
    fn test_quick_craft_insufficient() {
        let (mut map, mut player) = setup();
        player.resources = Resources::new(4, 2, 0);
        assert_eq!(
            quick_craft(&mut map, &mut player, Coord::new(5, 4)),
            Err(ActionError::InsufficientResources)
        );
        assert_eq!(player.resources, Resources::new(4, 2, 0));
    }
}
