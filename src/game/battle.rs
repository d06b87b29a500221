//! Battle resolution against a wild creature.
//!
//! A battle is a small state machine driven one action at a time by the
//! controller. The wild creature never strikes back: the player's own
//! actions are the only source of damage, and the wild side's only move is its
//! passive ability, resolved after every action that doesn't end the battle.

use log::{debug, trace};

use crate::error::{ActionError, ActionResult};
use crate::game::{Creature, Element, Player, effectiveness};
use crate::rng::GameRng;

/// Base damage of the quick attack before type effectiveness.
const QUICK_ATTACK_POWER: u32 = 4;
/// Base damage of the special move before type effectiveness.
const SPECIAL_MOVE_POWER: u32 = 6;
/// Flat capture chance (percent) added on top of the damage bonus.
const CAPTURE_BASE_CHANCE: u32 = 10;
/// How many battle events are kept; older ones are dropped.
pub const EVENT_LOG_LEN: usize = 3;

/// An entry of the battle menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleAction {
    /// Neutral hit; stronger at night.
    QuickAttack,
    /// Hit typed after the lead companion.
    SpecialMove,
    /// Throw an orb.
    Capture,
    /// Leave the battle.
    Flee,
}

impl BattleAction {
    /// Menu entries in display order.
    pub const ALL: [BattleAction; 4] = [
        BattleAction::QuickAttack,
        BattleAction::SpecialMove,
        BattleAction::Capture,
        BattleAction::Flee,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BattleAction::QuickAttack => "Quick attack",
            BattleAction::SpecialMove => "Special move",
            BattleAction::Capture => "Capture",
            BattleAction::Flee => "Flee",
        }
    }

    /// Entry below this one, wrapping to the top.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            BattleAction::QuickAttack => BattleAction::SpecialMove,
            BattleAction::SpecialMove => BattleAction::Capture,
            BattleAction::Capture => BattleAction::Flee,
            BattleAction::Flee => BattleAction::QuickAttack,
        }
    }

    /// Entry above this one, wrapping to the bottom.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            BattleAction::QuickAttack => BattleAction::Flee,
            BattleAction::SpecialMove => BattleAction::QuickAttack,
            BattleAction::Capture => BattleAction::SpecialMove,
            BattleAction::Flee => BattleAction::Capture,
        }
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    /// The wild creature dropped to zero hit points.
    Victory,
    /// The wild creature was caught.
    CaptureSuccess,
    /// The player ran away.
    Fled,
}

/// Where the battle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Encounter banner; the menu opens on the next tick.
    Intro,
    /// Waiting for the player to pick an action.
    MenuSelect,
    /// Over. The controller leaves the battle once the player acknowledges.
    Concluded(BattleOutcome),
}

/// Something that happened during the battle, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleEvent {
    /// A hit landed.
    Hit {
        /// Attack element.
        element: Element,
        /// Damage actually dealt.
        damage: u32,
    },
    /// Capture attempted without orbs.
    NoOrbs,
    /// An orb was thrown.
    CaptureRoll {
        /// Roll in `0..=99`.
        roll: u32,
        /// Success threshold.
        chance: u32,
        /// Whether `roll <= chance`.
        success: bool,
    },
    /// The wild creature's ability restored hit points.
    Regenerated(u32),
}

/// Capture chance in percent for a creature at `hp` out of `max_hp`.
///
/// Grows with the damage taken: `(max - hp) * 100 / (max + 1) + 10`.
#[must_use]
pub fn capture_chance(max_hp: u32, hp: u32) -> u32 {
    let missing = u64::from(max_hp.saturating_sub(hp));
    let bonus = missing * 100 / (u64::from(max_hp) + 1);
    u32::try_from(bonus)
        .unwrap_or(u32::MAX)
        .saturating_add(CAPTURE_BASE_CHANCE)
}

/// Damage of the quick attack against a defender of element `defender`.
#[must_use]
pub fn quick_attack_damage(defender: Element, night: bool) -> u32 {
    QUICK_ATTACK_POWER * effectiveness(Element::Neutral, defender) + u32::from(night)
}

/// Element of the special move: the lead companion's, or Grass without one.
#[must_use]
pub fn special_move_element(player: &Player) -> Element {
    player
        .lead_companion()
        .map_or(Element::Grass, |lead| lead.element)
}

/// Damage of the special move of element `element` against `defender`.
#[must_use]
pub const fn special_move_damage(element: Element, defender: Element) -> u32 {
    SPECIAL_MOVE_POWER * effectiveness(element, defender)
}

/// A battle in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    wild: Creature,
    phase: BattlePhase,
    cursor: BattleAction,
    events: Vec<BattleEvent>,
}

impl Battle {
    /// Start a battle against `wild`.
    #[must_use]
    pub fn new(wild: Creature) -> Self {
        debug!("battle: wild {} ({}) hp {}", wild.name, wild.element, wild.hp);
        Self {
            wild,
            phase: BattlePhase::Intro,
            cursor: BattleAction::QuickAttack,
            events: Vec::with_capacity(EVENT_LOG_LEN),
        }
    }

    /// The wild creature.
    #[must_use]
    pub const fn wild(&self) -> &Creature {
        &self.wild
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Highlighted menu entry.
    #[must_use]
    pub const fn cursor(&self) -> BattleAction {
        self.cursor
    }

    /// The most recent events, oldest first, at most [`EVENT_LOG_LEN`].
    #[must_use]
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Leave the intro banner for the action menu.
    pub fn open_menu(&mut self) {
        if self.phase == BattlePhase::Intro {
            self.phase = BattlePhase::MenuSelect;
        }
    }

    /// Move the cursor down, wrapping.
    pub fn cursor_down(&mut self) {
        self.cursor = self.cursor.next();
    }

    /// Move the cursor up, wrapping.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.previous();
    }

    /// Run the highlighted action.
    ///
    /// # Errors
    ///
    /// See [`Battle::resolve`].
    pub fn confirm(
        &mut self,
        player: &mut Player,
        night: bool,
        rng: &mut GameRng,
    ) -> ActionResult<BattlePhase> {
        self.resolve(self.cursor, player, night, rng)
    }

    /// Run `action` and return the resulting phase.
    ///
    /// Actions are ignored (the phase is returned unchanged) unless the menu
    /// is open.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoResource`] when capturing without orbs. The battle
    /// continues and nothing else changes.
    pub fn resolve(
        &mut self,
        action: BattleAction,
        player: &mut Player,
        night: bool,
        rng: &mut GameRng,
    ) -> ActionResult<BattlePhase> {
        if self.phase != BattlePhase::MenuSelect {
            return Ok(self.phase);
        }

        match action {
            BattleAction::Flee => {
                debug!("battle: fled from {}", self.wild.name);
                return Ok(self.conclude(BattleOutcome::Fled));
            }
            BattleAction::QuickAttack => {
                let damage = quick_attack_damage(self.wild.element, night);
                self.hit(Element::Neutral, damage);
            }
            BattleAction::SpecialMove => {
                let element = special_move_element(player);
                let damage = special_move_damage(element, self.wild.element);
                self.hit(element, damage);
            }
            BattleAction::Capture => {
                if player.resources.orbs == 0 {
                    trace!("battle: capture without orbs");
                    self.log(BattleEvent::NoOrbs);
                    return Err(ActionError::NoResource);
                }
                player.resources.orbs -= 1;

                let chance = capture_chance(self.wild.max_hp, self.wild.hp);
                let roll = rng.percent();
                let success = roll <= chance;
                self.log(BattleEvent::CaptureRoll {
                    roll,
                    chance,
                    success,
                });
                if success {
                    self.wild.caught = true;
                    let joined = player.add_companion(self.wild);
                    debug!(
                        "battle: caught {} (roll {roll} vs {chance}, joined roster: {joined})",
                        self.wild.name
                    );
                    return Ok(self.conclude(BattleOutcome::CaptureSuccess));
                }
            }
        }

        if self.wild.is_fainted() {
            debug!("battle: {} defeated", self.wild.name);
            return Ok(self.conclude(BattleOutcome::Victory));
        }

        if let Some(restored) = self.wild.ability_tick(rng).filter(|r| *r > 0) {
            self.log(BattleEvent::Regenerated(restored));
        }
        Ok(self.phase)
    }

    fn hit(&mut self, element: Element, damage: u32) {
        let dealt = self.wild.take_damage(damage);
        self.log(BattleEvent::Hit {
            element,
            damage: dealt,
        });
    }

    fn log(&mut self, event: BattleEvent) {
        if self.events.len() == EVENT_LOG_LEN {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    fn conclude(&mut self, outcome: BattleOutcome) -> BattlePhase {
        self.phase = BattlePhase::Concluded(outcome);
        self.phase
    }
}

/// Kani proofs for battle arithmetic.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Capture chance stays within `[10, 109]` for any valid hit points.
    #[kani::proof]
    fn prove_capture_chance_bounded() {
        let max_hp: u32 = kani::any();
        let hp: u32 = kani::any();
        kani::assume(hp <= max_hp);

        let chance = capture_chance(max_hp, hp);
        assert!(chance >= CAPTURE_BASE_CHANCE);
        assert!(chance < 100 + CAPTURE_BASE_CHANCE);
    }

    /// Damage floors hit points at zero and never exceeds them.
    #[kani::proof]
    fn prove_damage_floors_at_zero() {
        let max_hp: u32 = kani::any();
        let Some(mut creature) = Creature::of_species(0, max_hp) else {
            return;
        };
        let hp: u32 = kani::any();
        kani::assume(hp <= max_hp);
        creature.hp = hp;
        let damage: u32 = kani::any();

        let dealt = creature.take_damage(damage);
        assert!(dealt <= damage);
        assert_eq!(creature.hp, hp - dealt);
        assert!(creature.hp == 0 || dealt == damage);
    }
}
