//! Non-player characters: dialogue and one-shot gifts.

use crate::game::{Coord, Resources};

/// A villager with a few lines of dialogue and a gift for the first visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npc {
    /// Where the NPC stands.
    pub position: Coord,
    /// Display name.
    pub name: &'static str,
    /// Dialogue, spoken in order.
    pub lines: &'static [&'static str],
    /// Gift handed over on the first conversation.
    pub gift: Resources,
    /// Whether the gift has already been handed over.
    pub gave_gift: bool,
}

impl Npc {
    /// Take the gift if it hasn't been given yet.
    pub fn claim_gift(&mut self) -> Option<Resources> {
        if self.gave_gift {
            return None;
        }
        self.gave_gift = true;
        Some(self.gift)
    }
}

/// The fixed set of NPCs in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcRegistry {
    npcs: Vec<Npc>,
}

impl NpcRegistry {
    /// The standard villagers of a new game.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            npcs: vec![
                Npc {
                    position: Coord::new(6, 6),
                    name: "Sage",
                    lines: &[
                        "Welcome, builder.",
                        "Gather wood and stone.",
                        "Press SELECT to craft.",
                    ],
                    gift: Resources::new(3, 2, 0),
                    gave_gift: false,
                },
                Npc {
                    position: Coord::new(22, 26),
                    name: "Huntress",
                    lines: &[
                        "Enemies come out at night.",
                        "A tower helps a lot.",
                        "Mind your energy.",
                    ],
                    gift: Resources::new(0, 2, 1),
                    gave_gift: false,
                },
                Npc {
                    position: Coord::new(60, 12),
                    name: "Warden",
                    lines: &[
                        "In the north-east woods",
                        "a night boss lies hidden.",
                        "Prepare well.",
                    ],
                    gift: Resources::new(0, 0, 2),
                    gave_gift: false,
                },
            ],
        }
    }

    /// All NPCs in registry order.
    #[must_use]
    pub fn as_slice(&self) -> &[Npc] {
        &self.npcs
    }

    /// NPC by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Npc> {
        self.npcs.get(index)
    }

    /// Whether any NPC stands on `coord`.
    #[must_use]
    pub fn occupies(&self, coord: Coord) -> bool {
        self.npcs.iter().any(|npc| npc.position == coord)
    }

    /// Index of the first NPC (in registry order) adjacent to `coord`.
    #[must_use]
    pub fn adjacent_to(&self, coord: Coord) -> Option<usize> {
        self.npcs
            .iter()
            .position(|npc| npc.position.is_adjacent(coord))
    }

    /// Talk to NPC `index`, returning its gift on the first conversation only.
    pub fn talk(&mut self, index: usize) -> Option<Resources> {
        self.npcs.get_mut(index).and_then(Npc::claim_gift)
    }
}

impl Default for NpcRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_exactly_one() {
        let registry = NpcRegistry::standard();
        assert_eq!(registry.adjacent_to(Coord::new(6, 5)), Some(0));
        assert_eq!(registry.adjacent_to(Coord::new(5, 6)), Some(0));
        // Standing on the NPC does not count.
        assert_eq!(registry.adjacent_to(Coord::new(6, 6)), None);
        // Diagonal does not count.
        assert_eq!(registry.adjacent_to(Coord::new(7, 7)), None);
        assert_eq!(registry.adjacent_to(Coord::new(22, 27)), Some(1));
    }

    #[test]
    fn test_gift_only_once() {
        let mut registry = NpcRegistry::standard();
        assert_eq!(registry.talk(0), Some(Resources::new(3, 2, 0)));
        assert_eq!(registry.talk(0), None);
        assert!(registry.get(0).unwrap().gave_gift);
        assert!(!registry.get(1).unwrap().gave_gift);
    }

    #[test]
    fn test_lines_bounded() {
        for npc in NpcRegistry::standard().as_slice() {
            assert!(!npc.lines.is_empty() && npc.lines.len() <= 3);
        }
    }

    #[test]
    fn test_unknown_index() {
        let mut registry = NpcRegistry::standard();
        assert_eq!(registry.talk(9), None);
        assert!(registry.occupies(Coord::new(60, 12)));
        assert!(!registry.occupies(Coord::new(61, 12)));
    }
}
