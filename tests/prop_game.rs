//! Property-based tests for game rules.
//!
//! These tests verify building, battle arithmetic, saves and the session
//! invariants under arbitrary input.
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use fauna::game::{
    BUILD_CATALOG, COUNTER_MAX, Creature, Element, MAX_COMPANIONS, Resources, SPECIES, Tile,
    capture_chance, check_invariants, effectiveness, quick_attack_damage, try_build,
};
use fauna::{ActionError, ButtonSet, Coord, Game, GameState, InputFrame, SaveData};

const TILES: [Tile; 11] = [
    Tile::Empty,
    Tile::Grass,
    Tile::Tree,
    Tile::Wall,
    Tile::Water,
    Tile::Sand,
    Tile::Base,
    Tile::Tower,
    Tile::Farm,
    Tile::Fire,
    Tile::WorkPost,
];

fn input_frame() -> impl Strategy<Value = InputFrame> {
    (any::<u16>(), any::<u16>()).prop_map(|(pressed, held)| {
        let pressed = ButtonSet::from_bits(pressed);
        InputFrame {
            pressed,
            held: ButtonSet::from_bits(held).union(pressed),
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Session invariants survive any sequence of input frames.
    #[test]
    fn prop_invariants_hold_under_input(
        seed in any::<u64>(),
        frames in prop::collection::vec(input_frame(), 1..400),
    ) {
        let mut game = Game::new(seed);
        for input in frames {
            game.tick(input);
            let violations = check_invariants(game.state());
            prop_assert!(violations.is_empty(), "{violations:?}");
        }
    }

    /// Building succeeds exactly when the site is buildable and the player can pay.
    #[test]
    fn prop_build_iff_affordable_and_buildable(
        wood in 0u32..30,
        stone in 0u32..30,
        tile_index in 0usize..TILES.len(),
        def_index in 0usize..BUILD_CATALOG.len(),
    ) {
        let mut state = GameState::new(5);
        let site = Coord::new(12, 12);
        let tile = TILES[tile_index];
        let def = &BUILD_CATALOG[def_index];
        state.map.set(site, tile);
        state.player.resources = Resources::new(wood, stone, 0);

        let result = try_build(&mut state.map, &mut state.player, site, def);

        if !tile.is_buildable() {
            prop_assert_eq!(result, Err(ActionError::InvalidPlacement));
        } else if wood < def.wood || stone < def.stone {
            prop_assert_eq!(result, Err(ActionError::InsufficientResources));
        } else {
            prop_assert_eq!(result, Ok(def.tile));
        }

        match result {
            Ok(_) => {
                prop_assert_eq!(state.map.tile_at(site), Some(def.tile));
                prop_assert_eq!(state.player.resources.wood, wood - def.wood);
                prop_assert_eq!(state.player.resources.stone, stone - def.stone);
            }
            Err(_) => {
                prop_assert_eq!(state.map.tile_at(site), Some(tile));
                prop_assert_eq!(state.player.resources, Resources::new(wood, stone, 0));
            }
        }
    }

    /// Capture chance is 10 at full health and certain once a sturdy creature is down.
    #[test]
    fn prop_capture_chance_bounds(max_hp in 1u32..10_000, hp_seed in any::<u32>()) {
        let hp = hp_seed % (max_hp + 1);
        let chance = capture_chance(max_hp, hp);
        prop_assert!((10..110).contains(&chance));
        prop_assert_eq!(capture_chance(max_hp, max_hp), 10);
        if max_hp >= 9 {
            prop_assert!(capture_chance(max_hp, 0) >= 100);
        }
        prop_assert!(capture_chance(max_hp, hp) >= capture_chance(max_hp, max_hp));
    }

    /// Night adds exactly one point to the quick attack.
    #[test]
    fn prop_night_bonus(defender_tag in 0u8..5) {
        let defender = Element::from_tag(defender_tag).unwrap();
        prop_assert_eq!(
            quick_attack_damage(defender, true),
            quick_attack_damage(defender, false) + 1
        );
        prop_assert!(effectiveness(Element::Neutral, defender) == 1);
    }

    /// Saves restore player fields, the first three companions and mission flags.
    #[test]
    fn prop_save_restores_player(
        x in 10u16..40,
        y in 10u16..20,
        steps in 0..=COUNTER_MAX,
        wood in 0..=COUNTER_MAX,
        stone in 0..=COUNTER_MAX,
        orbs in 0..=COUNTER_MAX,
        roster in prop::collection::vec((0u8..4, 1u32..200, 0u32..1000), 0..6),
        flags in any::<[bool; 5]>(),
    ) {
        let mut state = GameState::new(9);
        let position = Coord::new(x, y);
        state.map.set(position, Tile::Grass);
        state.player.position = position;
        state.player.steps = steps;
        state.player.resources = Resources::new(wood, stone, orbs);
        state.player.replace_companions(roster.iter().map(|&(species, max_hp, hp)| {
            let mut pal = Creature::of_species(species, max_hp).unwrap();
            pal.hp = hp % (max_hp + 1);
            pal.caught = true;
            pal
        }));
        for (index, done) in flags.iter().enumerate() {
            if *done {
                state.missions.complete(index);
            }
        }

        let block = SaveData::capture(&state).encode();
        let decoded = SaveData::decode(&block).unwrap();

        prop_assert_eq!(decoded.position, position);
        prop_assert_eq!(decoded.steps, steps);
        prop_assert_eq!(decoded.resources, Resources::new(wood, stone, orbs));
        prop_assert_eq!(decoded.missions, flags);
        prop_assert_eq!(decoded.companions.len(), roster.len().min(MAX_COMPANIONS));
        for (pal, &(species, max_hp, hp)) in decoded.companions.iter().zip(&roster) {
            prop_assert_eq!(pal.species, species);
            prop_assert_eq!(pal.name, SPECIES[usize::from(species)].name);
            prop_assert_eq!(pal.max_hp, max_hp);
            prop_assert_eq!(pal.hp, hp % (max_hp + 1));
        }
    }

    /// Arbitrary bytes never decode into a state that breaks the invariants.
    #[test]
    fn prop_decode_garbage_is_safe(bytes in prop::collection::vec(any::<u8>(), 0..160)) {
        let mut game = Game::new(2);
        let before = game.save();
        if game.load(&bytes) {
            prop_assert!(check_invariants(game.state()).is_empty());
        } else {
            prop_assert_eq!(game.save(), before);
        }
    }
}
