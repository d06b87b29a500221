//! Creature catalog, elemental types and abilities.

use std::fmt;

use crate::rng::GameRng;

/// Chance (percent) that a healing creature recovers on a resolution tick.
const HEAL_CHANCE: u32 = 30;
/// Hit points recovered by the heal ability.
const HEAL_AMOUNT: u32 = 2;
/// Random bonus added on top of a species' base hit points.
const HP_SPREAD: u32 = 6;

/// Elemental type of a creature or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Element {
    /// No elemental affinity.
    Neutral = 0,
    /// Fire.
    Fire = 1,
    /// Water.
    Water = 2,
    /// Grass.
    Grass = 3,
    /// Electric.
    Electric = 4,
}

impl Element {
    /// All elements in tag order.
    pub const ALL: [Element; 5] = [
        Element::Neutral,
        Element::Fire,
        Element::Water,
        Element::Grass,
        Element::Electric,
    ];

    /// Decode a persisted tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Element::Neutral),
            1 => Some(Element::Fire),
            2 => Some(Element::Water),
            3 => Some(Element::Grass),
            4 => Some(Element::Electric),
            _ => None,
        }
    }

    /// Persisted tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Element::Neutral => "Neutral",
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Grass => "Grass",
            Element::Electric => "Electric",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Damage multiplier for an attack of type `attacker` against a `defender`.
///
/// Exactly four ordered pairings are super effective (×2); everything else,
/// including same-type and Neutral matchups, is ×1.
#[must_use]
pub const fn effectiveness(attacker: Element, defender: Element) -> u32 {
    match (attacker, defender) {
        (Element::Fire, Element::Grass)
        | (Element::Water, Element::Fire)
        | (Element::Grass, Element::Water)
        | (Element::Electric, Element::Water) => 2,
        _ => 1,
    }
}

/// Passive ability carried by a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ability {
    /// Quick on its feet. No battle effect yet.
    Swift = 0,
    /// Regenerates a little on resolution ticks.
    Heal = 1,
    /// Hard to put down. No battle effect yet.
    Sturdy = 2,
}

impl Ability {
    /// Decode a persisted tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Ability::Swift),
            1 => Some(Ability::Heal),
            2 => Some(Ability::Sturdy),
            _ => None,
        }
    }

    /// Persisted tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Ability::Swift => "Swift",
            Ability::Heal => "Heal",
            Ability::Sturdy => "Sturdy",
        }
    }
}

/// Template for a wild species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Species {
    /// Species name.
    pub name: &'static str,
    /// Elemental type.
    pub element: Element,
    /// Lowest possible max hit points.
    pub base_hp: u32,
    /// Attack stat.
    pub attack: u32,
    /// Speed stat.
    pub speed: u32,
    /// Passive ability.
    pub ability: Ability,
}

/// The wild species, indexed by species id.
pub static SPECIES: [Species; 4] = [
    Species {
        name: "Flarepup",
        element: Element::Fire,
        base_hp: 24,
        attack: 6,
        speed: 6,
        ability: Ability::Swift,
    },
    Species {
        name: "Aquadine",
        element: Element::Water,
        base_hp: 28,
        attack: 5,
        speed: 5,
        ability: Ability::Heal,
    },
    Species {
        name: "Sproutle",
        element: Element::Grass,
        base_hp: 26,
        attack: 5,
        speed: 5,
        ability: Ability::Sturdy,
    },
    Species {
        name: "Voltbit",
        element: Element::Electric,
        base_hp: 22,
        attack: 7,
        speed: 7,
        ability: Ability::Swift,
    },
];

/// A creature instance, wild or companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Creature {
    /// Index into [`SPECIES`].
    pub species: u8,
    /// Species name.
    pub name: &'static str,
    /// Elemental type.
    pub element: Element,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current hit points, `0..=max_hp`.
    pub hp: u32,
    /// Attack stat.
    pub attack: u32,
    /// Speed stat.
    pub speed: u32,
    /// Passive ability.
    pub ability: Ability,
    /// Set once the creature joins a roster.
    pub caught: bool,
}

impl Creature {
    /// Instantiate species `species` at full health with `max_hp` hit points.
    ///
    /// Returns `None` for an unknown species id.
    #[must_use]
    pub fn of_species(species: u8, max_hp: u32) -> Option<Self> {
        let template = SPECIES.get(usize::from(species))?;
        Some(Self::from_template(species, template, max_hp))
    }

    /// Roll a random wild creature: uniform species, hp in `base..=base+6`.
    #[must_use]
    pub fn random_wild(rng: &mut GameRng) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let species = rng.range(0, SPECIES.len() as u32 - 1) as u8;
        let template = &SPECIES[usize::from(species)];
        let max_hp = template.base_hp + rng.range(0, HP_SPREAD);
        Self::from_template(species, template, max_hp)
    }

    fn from_template(species: u8, template: &Species, max_hp: u32) -> Self {
        Self {
            species,
            name: template.name,
            element: template.element,
            max_hp,
            hp: max_hp,
            attack: template.attack,
            speed: template.speed,
            ability: template.ability,
            caught: false,
        }
    }

    /// Apply damage, flooring hit points at zero. Returns the damage actually dealt.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Restore hit points, capped at `max_hp`. Returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += restored;
        restored
    }

    /// Whether the creature has no hit points left.
    #[must_use]
    pub const fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Resolve the passive ability once. Returns hit points regained, if any.
    pub fn ability_tick(&mut self, rng: &mut GameRng) -> Option<u32> {
        match self.ability {
            Ability::Heal if rng.chance(HEAL_CHANCE) => Some(self.heal(HEAL_AMOUNT)),
            Ability::Heal | Ability::Swift | Ability::Sturdy => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effectiveness_table() {
        let strong = [
            (Element::Fire, Element::Grass),
            (Element::Water, Element::Fire),
            (Element::Grass, Element::Water),
            (Element::Electric, Element::Water),
        ];
        let mut doubled = 0;
        for a in Element::ALL {
            for d in Element::ALL {
                let expected = if strong.contains(&(a, d)) { 2 } else { 1 };
                assert_eq!(effectiveness(a, d), expected, "{a} vs {d}");
                if expected == 2 {
                    doubled += 1;
                }
            }
        }
        assert_eq!(doubled, 4);
        // Not symmetric.
        assert_eq!(effectiveness(Element::Grass, Element::Fire), 1);
    }

    #[test]
    fn test_tags_roundtrip() {
        for e in Element::ALL {
            assert_eq!(Element::from_tag(e.tag()), Some(e));
        }
        assert_eq!(Element::from_tag(5), None);
        assert_eq!(Ability::from_tag(Ability::Heal.tag()), Some(Ability::Heal));
        assert_eq!(Ability::from_tag(3), None);
    }

    #[test]
    fn test_random_wild_within_bands() {
        let mut rng = GameRng::new(5);
        for _ in 0..500 {
            let c = Creature::random_wild(&mut rng);
            let template = &SPECIES[usize::from(c.species)];
            assert_eq!(c.name, template.name);
            assert!(c.max_hp >= template.base_hp && c.max_hp <= template.base_hp + HP_SPREAD);
            assert_eq!(c.hp, c.max_hp);
            assert!(!c.caught);
        }
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut c = Creature::of_species(2, 30).unwrap();
        c.hp = 3;
        assert_eq!(c.take_damage(8), 3);
        assert_eq!(c.hp, 0);
        assert!(c.is_fainted());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut c = Creature::of_species(0, 24).unwrap();
        c.hp = 22;
        assert_eq!(c.heal(4), 2);
        assert_eq!(c.hp, 24);
    }

    #[test]
    fn test_only_heal_ability_regenerates() {
        let mut rng = GameRng::new(11);
        let mut sturdy = Creature::of_species(2, 26).unwrap();
        sturdy.hp = 1;
        let mut healer = Creature::of_species(1, 28).unwrap();
        healer.hp = 1;
        let mut healed = false;
        for _ in 0..100 {
            assert_eq!(sturdy.ability_tick(&mut rng), None);
            if healer.ability_tick(&mut rng).is_some() {
                healed = true;
            }
        }
        assert_eq!(sturdy.hp, 1);
        assert!(healed);
        assert!(healer.hp <= healer.max_hp);
    }

    #[test]
    fn test_unknown_species() {
        assert!(Creature::of_species(4, 10).is_none());
    }
}
