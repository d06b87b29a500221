//! Top-level game controller.
//!
//! [`Game`] is the mode state machine: it reads one [`InputFrame`] per tick,
//! routes it to the overworld, the running battle, a dialogue or the menu,
//! and returns the [`Frame`] to show. Modal screens are plain states here,
//! resumed on the next tick; the world does not advance while one is open.

use log::{debug, trace};
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::{ActionError, ActionResult};
use crate::game::{
    Battle, BattleAction, BattleOutcome, BattlePhase, CraftOutcome, Creature, GameState,
    Resources, WorldEvent, assert_invariants,
};
use crate::input::{Button, InputFrame};
use crate::render::{self, Frame, Screen};
use crate::save::{self, SAVE_SIZE, SaveBlock};

/// Frames a short notice stays up.
const MESSAGE_SHORT: u32 = 20;
/// Frames a regular notice stays up.
const MESSAGE_NORMAL: u32 = 30;
/// Frames an error or a rare find stays up.
const MESSAGE_LONG: u32 = 40;

/// What the controller is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Walking around the overworld.
    World,
    /// Fighting a wild creature.
    Battle,
    /// Talking to a villager.
    Dialogue,
    /// The pause menu.
    Menu,
    /// The mission list, opened from the menu.
    Missions,
}

/// A transient notice with a frame countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Text to show.
    pub text: String,
    /// Frames left before it disappears.
    pub frames_left: u32,
}

/// A running game session.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    state: GameState,
    mode: Mode,
    battle: Option<Battle>,
    /// NPC index and whether this visit paid out a gift.
    dialogue: Option<(usize, bool)>,
    message: Option<Message>,
    save_slot: SaveBlock,
}

impl Game {
    /// Start a new game with default settings and the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(GameConfig {
            seed,
            ..GameConfig::default()
        })
    }

    /// Start a new game with `config`.
    #[must_use]
    pub fn with_config(config: GameConfig) -> Self {
        Self {
            config,
            state: GameState::new(config.seed),
            mode: Mode::World,
            battle: None,
            dialogue: None,
            message: None,
            save_slot: [0; SAVE_SIZE],
        }
    }

    /// Session settings.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Session state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable session state.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The running battle, if any.
    #[must_use]
    pub const fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    /// The notice currently showing, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Contents of the in-game save slot.
    #[must_use]
    pub const fn save_slot(&self) -> &SaveBlock {
        &self.save_slot
    }

    /// Replace the in-game save slot, e.g. with a block read from disk.
    pub fn set_save_slot(&mut self, block: SaveBlock) {
        self.save_slot = block;
    }

    /// Encode the session into a save block.
    #[must_use]
    pub fn save(&self) -> SaveBlock {
        save::encode(&self.state)
    }

    /// Load a save block into the session.
    ///
    /// Returns `false`, leaving the session untouched, when the block is
    /// absent, corrupt or describes an impossible state.
    pub fn load(&mut self, bytes: &[u8]) -> bool {
        match save::decode_into(bytes, &mut self.state) {
            Ok(()) => {
                debug!("session loaded");
                true
            }
            Err(err) => {
                debug!("load rejected: {err}");
                false
            }
        }
    }

    /// Throw the player into a battle against `wild`.
    pub fn start_battle(&mut self, wild: Creature) {
        self.battle = Some(Battle::new(wild));
        self.set_mode(Mode::Battle);
    }

    /// Advance one frame.
    pub fn tick(&mut self, input: InputFrame) -> Frame {
        self.age_message();

        match self.mode {
            Mode::World => self.world_tick(input),
            Mode::Battle => self.battle_tick(input),
            Mode::Dialogue => {
                if input.was_pressed(Button::Confirm) || input.was_pressed(Button::Cancel) {
                    self.dialogue = None;
                    self.set_mode(Mode::World);
                }
            }
            Mode::Menu => self.menu_tick(input),
            Mode::Missions => {
                if input.was_pressed(Button::Cancel) || input.was_pressed(Button::Menu) {
                    self.set_mode(Mode::Menu);
                }
            }
        }

        assert_invariants(&self.state);
        self.render()
    }

    /// Describe the current screen.
    #[must_use]
    pub fn render(&self) -> Frame {
        let screen = match self.mode {
            Mode::World => Screen::World(render::world_view(
                &self.state,
                self.config.viewport_width,
                self.config.viewport_height,
            )),
            Mode::Battle => match &self.battle {
                Some(battle) => render::battle_screen(battle),
                None => render::menu_screen(),
            },
            Mode::Dialogue => {
                let npc = self
                    .dialogue
                    .and_then(|(index, gift)| Some((self.state.npcs.get(index)?, gift)));
                match npc {
                    Some((npc, gift)) => render::dialogue_screen(npc, gift),
                    None => render::menu_screen(),
                }
            }
            Mode::Menu => render::menu_screen(),
            Mode::Missions => render::missions_screen(self.state.missions),
        };
        Frame {
            mode: self.mode,
            screen,
            message: self.message.as_ref().map(|m| m.text.clone()),
        }
    }

    fn world_tick(&mut self, input: InputFrame) {
        if input.was_pressed(Button::Menu) {
            self.set_mode(Mode::Menu);
            return;
        }

        if input.was_pressed(Button::Select) {
            let result = self.state.quick_craft();
            self.report(result);
        }
        if input.was_pressed(Button::LeftModifier) {
            self.state.selection.previous();
        }
        if input.was_pressed(Button::RightModifier) {
            self.state.selection.next();
        }

        let confirm = input.was_pressed(Button::Confirm);
        let left = input.is_held(Button::LeftModifier);
        let right = input.is_held(Button::RightModifier);

        if confirm && right {
            let result = self.state.throw_orb();
            self.report(result);
            if self.mode != Mode::World {
                return;
            }
        }
        if confirm && left {
            let result = self.state.build();
            self.report(result);
        }

        if let Some(Err(err)) = self.state.walk(input.held_direction()) {
            trace!("move rejected: {err}");
        }

        if confirm && !left && !right {
            let result = self.state.gather();
            self.report(result);
            if self.mode != Mode::World {
                return;
            }
        }

        if let Some(event) = self.state.roll_boss_traces() {
            self.report(Ok(event));
        }
    }

    fn battle_tick(&mut self, input: InputFrame) {
        let night = self.state.is_night();
        let Some(battle) = self.battle.as_mut() else {
            self.set_mode(Mode::World);
            return;
        };
        let (player, rng) = self.state.player_and_rng();

        // The press that ends a battle is not also its acknowledgement.
        let was_concluded = matches!(battle.phase(), BattlePhase::Concluded(_));
        let mut failure = None;
        match battle.phase() {
            BattlePhase::Intro => battle.open_menu(),
            BattlePhase::MenuSelect => {
                if input.was_pressed(Button::Up) {
                    battle.cursor_up();
                }
                if input.was_pressed(Button::Down) {
                    battle.cursor_down();
                }
                let action = if input.was_pressed(Button::Cancel) {
                    Some(BattleAction::Flee)
                } else if input.was_pressed(Button::Confirm) {
                    Some(battle.cursor())
                } else {
                    None
                };
                failure =
                    action.and_then(|action| battle.resolve(action, player, night, rng).err());
            }
            BattlePhase::Concluded(_) => {}
        }

        let phase = battle.phase();
        if let Some(err) = failure {
            self.notify_error(err);
        }
        match phase {
            BattlePhase::Concluded(BattleOutcome::Fled) => {
                self.end_battle();
                self.notify("You got away.", MESSAGE_NORMAL);
            }
            BattlePhase::Concluded(_)
                if was_concluded
                    && (input.was_pressed(Button::Confirm) || input.was_pressed(Button::Cancel)) =>
            {
                self.end_battle();
            }
            _ => {}
        }
    }

    fn end_battle(&mut self) {
        if let Some(battle) = self.battle.take() {
            debug!("battle over: {:?}", battle.phase());
        }
        self.set_mode(Mode::World);
    }

    fn menu_tick(&mut self, input: InputFrame) {
        if input.was_pressed(Button::Cancel) || input.was_pressed(Button::Menu) {
            self.set_mode(Mode::World);
            return;
        }
        if input.was_pressed(Button::Confirm) {
            self.set_mode(Mode::Missions);
            return;
        }
        if input.was_pressed(Button::Select) {
            self.save_slot = self.save();
            debug!("saved to slot");
            self.notify("Saved!", MESSAGE_NORMAL);
        }
        if input.was_pressed(Button::RightModifier) {
            let slot = self.save_slot;
            if self.load(&slot) {
                self.notify("Loaded!", MESSAGE_NORMAL);
            } else {
                self.notify_error(ActionError::CorruptOrAbsentSave);
            }
        }
    }

    /// Turn the outcome of a world action into a mode change or a notice.
    fn report(&mut self, result: ActionResult<WorldEvent>) {
        let event = match result {
            Ok(event) => event,
            Err(err) => {
                trace!("action rejected: {err}");
                self.notify_error(err);
                return;
            }
        };

        match event {
            WorldEvent::Encounter(wild) => self.start_battle(wild),
            WorldEvent::Talked { npc, gift } => {
                self.dialogue = Some((npc, gift.is_some()));
                self.set_mode(Mode::Dialogue);
            }
            WorldEvent::Gathered(found) => {
                self.notify(&format!("{}.", describe_gain(found)), MESSAGE_NORMAL);
            }
            WorldEvent::TreeResisted => self.notify("The tree resists.", MESSAGE_NORMAL),
            WorldEvent::Rustling => self.notify("Rustling... no encounter.", MESSAGE_SHORT),
            WorldEvent::Rested => {
                self.notify("Your companions rest by the fire.", MESSAGE_NORMAL);
            }
            WorldEvent::Built(tile) => self.notify(&format!("Built: {tile}."), MESSAGE_NORMAL),
            WorldEvent::Crafted(CraftOutcome::Orb) => {
                let total = self.state.player.resources.orbs;
                self.notify(&format!("Crafted an orb (total {total})."), MESSAGE_NORMAL);
            }
            WorldEvent::Crafted(CraftOutcome::WorkPost) => {
                self.notify("Work post placed.", MESSAGE_NORMAL);
            }
            WorldEvent::OrbLost => self.notify("The orb flies off into nothing.", MESSAGE_NORMAL),
            WorldEvent::BossTraces(orbs) => self.notify(
                &format!("You found traces of the boss. +{orbs} orbs!"),
                MESSAGE_LONG,
            ),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("mode {:?} -> {mode:?}", self.mode);
            self.mode = mode;
        }
    }

    fn notify(&mut self, text: &str, frames: u32) {
        self.message = Some(Message {
            text: text.to_string(),
            frames_left: frames,
        });
    }

    fn notify_error(&mut self, err: ActionError) {
        let text = err.to_string();
        let mut chars = text.chars();
        let sentence = match chars.next() {
            Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
            None => text,
        };
        self.notify(&sentence, MESSAGE_LONG);
    }

    fn age_message(&mut self) {
        if let Some(message) = &mut self.message {
            message.frames_left = message.frames_left.saturating_sub(1);
            if message.frames_left == 0 {
                self.message = None;
            }
        }
    }
}

fn describe_gain(found: Resources) -> String {
    let parts: Vec<String> = [
        (found.wood, "wood"),
        (found.stone, "stone"),
        (found.orbs, "orbs"),
    ]
    .into_iter()
    .filter(|(amount, _)| *amount > 0)
    .map(|(amount, name)| format!("+{amount} {name}"))
    .collect();
    if parts.is_empty() {
        "Nothing found".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, Tile};

    fn press(game: &mut Game, button: Button) -> Frame {
        game.tick(InputFrame::press(button))
    }

    #[test]
    fn test_starts_in_world() {
        let game = Game::new(1);
        assert_eq!(game.mode(), Mode::World);
        assert_eq!(game.save_slot(), &[0; SAVE_SIZE]);
        assert!(matches!(game.render().screen, Screen::World(_)));
    }

    #[test]
    fn test_menu_roundtrip() {
        let mut game = Game::new(1);
        press(&mut game, Button::Menu);
        assert_eq!(game.mode(), Mode::Menu);
        press(&mut game, Button::Confirm);
        assert_eq!(game.mode(), Mode::Missions);
        press(&mut game, Button::Cancel);
        assert_eq!(game.mode(), Mode::Menu);
        press(&mut game, Button::Menu);
        assert_eq!(game.mode(), Mode::World);
    }

    #[test]
    fn test_load_empty_slot_fails() {
        let mut game = Game::new(1);
        press(&mut game, Button::Menu);
        let frame = press(&mut game, Button::RightModifier);
        assert_eq!(frame.message.as_deref(), Some("No save found."));
        assert_eq!(game.state().player.position, Coord::new(4, 4));
    }

    #[test]
    fn test_menu_save_then_load() {
        let mut game = Game::new(1);
        press(&mut game, Button::Menu);
        press(&mut game, Button::Select);
        assert_eq!(&game.save_slot()[..5], b"FFGE1");

        game.state_mut().player.resources.wood = 99;
        let frame = press(&mut game, Button::RightModifier);
        assert_eq!(frame.message.as_deref(), Some("Loaded!"));
        assert_eq!(game.state().player.resources.wood, 8);
    }

    #[test]
    fn test_dialogue_opens_and_closes() {
        let mut game = Game::new(1);
        game.state_mut().player.position = Coord::new(6, 5);
        let frame = press(&mut game, Button::Confirm);
        assert_eq!(game.mode(), Mode::Dialogue);
        let Screen::Panel { title, lines } = frame.screen else {
            panic!("expected a panel");
        };
        assert_eq!(title, "Sage");
        assert!(lines.iter().any(|l| l.contains("+3 wood")));
        assert_eq!(game.state().player.resources.wood, 11);

        press(&mut game, Button::Cancel);
        assert_eq!(game.mode(), Mode::World);
    }

    #[test]
    fn test_no_target_message() {
        let mut game = Game::new(1);
        let frame = press(&mut game, Button::Confirm);
        assert_eq!(frame.message.as_deref(), Some("There's nobody to talk to here."));
        assert_eq!(game.message().map(|m| m.frames_left), Some(MESSAGE_LONG));
    }

    #[test]
    fn test_message_expires() {
        let mut game = Game::new(1);
        press(&mut game, Button::Confirm);
        for _ in 0..MESSAGE_LONG - 1 {
            assert!(game.tick(InputFrame::IDLE).message.is_some());
        }
        assert!(game.tick(InputFrame::IDLE).message.is_none());
    }

    #[test]
    fn test_build_chord() {
        let mut game = Game::new(1);
        game.state_mut().player.resources = Resources::new(20, 20, 0);
        // Pressing L moves the cursor back to the campfire and builds it.
        game.tick(InputFrame::press(Button::LeftModifier).and_press(Button::Confirm));
        assert_eq!(game.state().tile_under_player(), Tile::Fire);
        assert_eq!(game.mode(), Mode::World);
    }

    #[test]
    fn test_battle_flow_flee() {
        let mut game = Game::new(1);
        game.start_battle(Creature::of_species(0, 24).unwrap());
        assert_eq!(game.mode(), Mode::Battle);
        game.tick(InputFrame::IDLE);
        assert_eq!(game.battle().unwrap().phase(), BattlePhase::MenuSelect);
        press(&mut game, Button::Cancel);
        assert_eq!(game.mode(), Mode::World);
        assert!(game.battle().is_none());
    }

    #[test]
    fn test_battle_victory_waits_for_confirm() {
        let mut game = Game::new(1);
        let mut wild = Creature::of_species(2, 26).unwrap();
        wild.hp = 2;
        game.start_battle(wild);
        game.tick(InputFrame::IDLE);
        let frame = press(&mut game, Button::Confirm);
        assert_eq!(
            game.battle().unwrap().phase(),
            BattlePhase::Concluded(BattleOutcome::Victory)
        );
        let Screen::Panel { lines, .. } = frame.screen else {
            panic!("expected the battle panel");
        };
        assert!(lines.iter().any(|l| l == "Defeated! Press A..."));
        assert_eq!(game.mode(), Mode::Battle);
        game.tick(InputFrame::IDLE);
        assert_eq!(game.mode(), Mode::Battle);
        press(&mut game, Button::Confirm);
        assert_eq!(game.mode(), Mode::World);
    }

    #[test]
    fn test_battle_capture_without_orbs() {
        let mut game = Game::new(1);
        game.state_mut().player.resources.orbs = 0;
        game.start_battle(Creature::of_species(0, 24).unwrap());
        game.tick(InputFrame::IDLE);
        press(&mut game, Button::Down);
        press(&mut game, Button::Down);
        assert_eq!(game.battle().unwrap().cursor(), BattleAction::Capture);
        let frame = press(&mut game, Button::Confirm);
        assert_eq!(frame.message.as_deref(), Some("You have no orbs."));
        assert_eq!(game.mode(), Mode::Battle);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut game = Game::new(1);
        assert!(!game.load(&[1, 2, 3]));
        let block = game.save();
        assert!(game.load(&block));
    }
}
