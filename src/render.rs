//! Render descriptions.
//!
//! The core does not draw. Each tick produces a [`Frame`]: a small,
//! serializable description of what the current screen shows. Hosts draw it
//! however they like; [`Frame`]'s `Display` impl gives a plain-text rendering.

use std::fmt;

use serde::Serialize;

use crate::controller::Mode;
use crate::game::{
    Battle, BattleAction, BattleEvent, BattleOutcome, BattlePhase, Coord, GameState,
    MISSION_COUNT, MissionTracker, Npc, Player, WorldMap,
};

/// Side of the square minimap.
pub const MINIMAP_SIZE: u16 = 12;

const PLAYER_GLYPH: char = 'P';
const PLAYER_MINIMAP_GLYPH: char = '@';
const NPC_GLYPH: char = '@';

/// One rendered frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Controller mode that produced the frame.
    pub mode: Mode,
    /// Screen content.
    pub screen: Screen,
    /// Transient message, if one is showing.
    pub message: Option<String>,
}

/// Screen content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Screen {
    /// The overworld.
    World(WorldView),
    /// A text panel: battle, dialogue, menu or mission list.
    Panel {
        /// Heading.
        title: String,
        /// Body lines.
        lines: Vec<String>,
    },
}

/// Overworld screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldView {
    /// Top-left map cell of the viewport.
    pub origin: (u16, u16),
    /// Viewport rows.
    pub viewport: Vec<String>,
    /// Minimap rows.
    pub minimap: Vec<String>,
    /// Resources, time of day and selected building.
    pub status: String,
    /// Companion roster.
    pub companions: String,
    /// Mission progress and key hints.
    pub hud: String,
}

/// First visible cell along one axis: centered on `focus`, clamped to the map.
#[must_use]
pub fn camera_origin(focus: u16, view: u16, extent: u16) -> u16 {
    let view = view.min(extent);
    focus.saturating_sub(view / 2).min(extent - view)
}

fn glyph_at(state: &GameState, coord: Coord) -> char {
    if coord == state.player.position {
        PLAYER_GLYPH
    } else if state.npcs.occupies(coord) {
        NPC_GLYPH
    } else {
        state.map.tile_at(coord).map_or(' ', |tile| tile.glyph())
    }
}

/// Rows of the `width × height` window at `origin`, drawn by `glyph`.
fn window(
    map: &WorldMap,
    origin: (u16, u16),
    width: u16,
    height: u16,
    glyph: impl Fn(Coord) -> char,
) -> Vec<String> {
    let width = width.min(map.width());
    let height = height.min(map.height());
    (origin.1..origin.1 + height)
        .map(|y| {
            (origin.0..origin.0 + width)
                .map(|x| glyph(Coord::new(x, y)))
                .collect()
        })
        .collect()
}

/// Build the overworld screen with a `width × height` viewport.
#[must_use]
pub fn world_view(state: &GameState, width: u16, height: u16) -> WorldView {
    let map = &state.map;
    let at = state.player.position;
    let origin = (
        camera_origin(at.x, width, map.width()),
        camera_origin(at.y, height, map.height()),
    );
    let viewport = window(map, origin, width, height, |c| glyph_at(state, c));

    let mini_origin = (
        camera_origin(at.x, MINIMAP_SIZE, map.width()),
        camera_origin(at.y, MINIMAP_SIZE, map.height()),
    );
    let minimap = window(map, mini_origin, MINIMAP_SIZE, MINIMAP_SIZE, |c| {
        if c == at {
            PLAYER_MINIMAP_GLYPH
        } else {
            map.tile_at(c).map_or(' ', |tile| tile.minimap_glyph())
        }
    });

    WorldView {
        origin,
        viewport,
        minimap,
        status: status_line(state),
        companions: companion_line(&state.player),
        hud: hud_line(state.missions),
    }
}

/// Resources, time of day and the selected building.
#[must_use]
pub fn status_line(state: &GameState) -> String {
    let res = state.player.resources;
    let def = state.selection.current();
    format!(
        "Wood:{} Stone:{} Orbs:{}  {}  Build:{} ({}w/{}s)",
        res.wood,
        res.stone,
        res.orbs,
        if state.is_night() { "Night" } else { "Day" },
        def.name,
        def.wood,
        def.stone,
    )
}

/// Roster summary.
#[must_use]
pub fn companion_line(player: &Player) -> String {
    if player.companions().is_empty() {
        return "Companions: none".to_string();
    }
    let names: Vec<String> = player
        .companions()
        .iter()
        .map(|c| format!("{} {}/{}", c.name, c.hp, c.max_hp))
        .collect();
    format!("Companions: {}", names.join(", "))
}

/// Mission counter and key hints.
#[must_use]
pub fn hud_line(missions: MissionTracker) -> String {
    format!(
        "Missions: {}/{MISSION_COUNT}  MENU: menu  SELECT: craft  L+A: build  R+A: throw orb",
        missions.completed_count()
    )
}

/// Battle screen.
#[must_use]
pub fn battle_screen(battle: &Battle) -> Screen {
    let wild = battle.wild();
    let mut lines = vec![
        format!("A wild {} ({}) appears!", wild.name, wild.element),
        format!(
            "HP: {}/{}  Ability: {}",
            wild.hp,
            wild.max_hp,
            wild.ability.name()
        ),
        String::new(),
    ];

    for action in BattleAction::ALL {
        let marker = if action == battle.cursor() { '>' } else { ' ' };
        lines.push(format!("{marker} {}", action.label()));
    }

    if !battle.events().is_empty() {
        lines.push(String::new());
    }
    for event in battle.events() {
        lines.push(describe_event(*event));
    }

    match battle.phase() {
        BattlePhase::Intro | BattlePhase::MenuSelect => {}
        BattlePhase::Concluded(BattleOutcome::Victory) => {
            lines.push(String::new());
            lines.push("Defeated! Press A...".to_string());
        }
        BattlePhase::Concluded(BattleOutcome::CaptureSuccess) => {
            lines.push(String::new());
            lines.push(format!("Caught {}! Press A...", wild.name));
        }
        BattlePhase::Concluded(BattleOutcome::Fled) => {
            lines.push(String::new());
            lines.push("Got away safely.".to_string());
        }
    }

    Screen::Panel {
        title: "Battle".to_string(),
        lines,
    }
}

fn describe_event(event: BattleEvent) -> String {
    match event {
        BattleEvent::Hit { element, damage } => format!("{element} hit for {damage}."),
        BattleEvent::NoOrbs => "No orbs!".to_string(),
        BattleEvent::CaptureRoll {
            roll,
            chance,
            success,
        } => format!(
            "Throw... ({roll} vs {chance}) {}",
            if success { "caught!" } else { "it broke free!" }
        ),
        BattleEvent::Regenerated(hp) => format!("The wild creature recovers {hp} HP."),
    }
}

/// Dialogue screen for `npc`. `gift_received` says whether this visit paid out.
#[must_use]
pub fn dialogue_screen(npc: &Npc, gift_received: bool) -> Screen {
    let mut lines: Vec<String> = npc.lines.iter().map(|line| format!("  {line}")).collect();
    lines.push(String::new());
    if gift_received {
        lines.push(format!(
            "You received: +{} wood, +{} stone, +{} orbs.",
            npc.gift.wood, npc.gift.stone, npc.gift.orbs
        ));
        lines.push(String::new());
    }
    lines.push("Press A to continue.".to_string());
    Screen::Panel {
        title: npc.name.to_string(),
        lines,
    }
}

/// Main menu.
#[must_use]
pub fn menu_screen() -> Screen {
    Screen::Panel {
        title: "Menu".to_string(),
        lines: vec![
            "A) Missions & help".to_string(),
            "SELECT) Save   R) Load".to_string(),
            "B/MENU) Back".to_string(),
        ],
    }
}

/// Mission list with help text.
#[must_use]
pub fn missions_screen(missions: MissionTracker) -> Screen {
    let mut lines: Vec<String> = missions
        .iter()
        .map(|(mission, done)| {
            format!(
                "[{}] {} - {}",
                if done { 'X' } else { ' ' },
                mission.title,
                mission.description
            )
        })
        .collect();
    lines.extend(
        [
            "",
            "- Move around, gather wood and stone.",
            "- SELECT: quick craft (orbs, work post).",
            "- L/R: pick a building; L+A builds it.",
            "- R+A throws an orb.",
            "- Villagers give hints and gifts.",
            "",
            "B/MENU to go back.",
        ]
        .map(String::from),
    );
    Screen::Panel {
        title: "Missions".to_string(),
        lines,
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.screen {
            Screen::World(view) => {
                for (row, line) in view.viewport.iter().enumerate() {
                    match view.minimap.get(row) {
                        Some(mini) => writeln!(f, "{line}  {mini}")?,
                        None => writeln!(f, "{line}")?,
                    }
                }
                writeln!(f, "{}", view.status)?;
                writeln!(f, "{}", view.companions)?;
                writeln!(f, "{}", view.hud)?;
            }
            Screen::Panel { title, lines } => {
                writeln!(f, "{title}")?;
                writeln!(f, "{}", "-".repeat(title.chars().count().max(8)))?;
                for line in lines {
                    writeln!(f, "{line}")?;
                }
            }
        }
        if let Some(message) = &self.message {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}
