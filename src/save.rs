//! Save block encoding.
//!
//! A save is a fixed 116-byte little-endian record:
//!
//! | offset | size   | field                                              |
//! |-------:|-------:|----------------------------------------------------|
//! | 0      | 8      | signature `FFGE1`, NUL padded                      |
//! | 8      | 6 × 4  | x, y, steps, orbs, wood, stone (`i32`)             |
//! | 32     | 4      | companion count (`i32`)                            |
//! | 36     | 3 × 20 | companions: species, element, ability, caught (`u8`), then max hp, hp, attack, speed (`i32`) |
//! | 96     | 5 × 4  | mission flags (`i32`, nonzero = complete)          |
//!
//! There is no version field or checksum. Decoding trusts the signature,
//! clamps counters into range and rejects anything that would put the
//! session in an impossible state.

use log::{debug, trace};

use crate::error::{ActionError, ActionResult};
use crate::game::{
    Ability, Coord, Creature, Element, GameState, MAX_COMPANIONS, MISSION_COUNT, MissionTracker,
    Resources, SPECIES,
};

/// Size of a save block in bytes.
pub const SAVE_SIZE: usize = 116;

/// A raw save block.
pub type SaveBlock = [u8; SAVE_SIZE];

/// Signature at the start of every save.
pub const SIGNATURE: &[u8; 5] = b"FFGE1";

const SIGNATURE_FIELD: usize = 8;
const COMPANION_RECORD: usize = 20;

/// The persisted part of a session.
///
/// The map, NPC gifts and the build cursor are not saved; loading keeps
/// whatever the running session has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveData {
    /// Player position.
    pub position: Coord,
    /// Step counter.
    pub steps: u32,
    /// Wood, stone and orbs.
    pub resources: Resources,
    /// Roster, at most [`MAX_COMPANIONS`] long.
    pub companions: Vec<Creature>,
    /// Mission completion flags.
    pub missions: [bool; MISSION_COUNT],
}

impl SaveData {
    /// Snapshot the persisted part of `state`.
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        Self {
            position: state.player.position,
            steps: state.player.steps,
            resources: state.player.resources,
            companions: state.player.companions().to_vec(),
            missions: state.missions.flags(),
        }
    }

    /// Encode into a full block; unused companion slots are zeroed.
    #[must_use]
    pub fn encode(&self) -> SaveBlock {
        let mut out = Writer::new();
        out.bytes(SIGNATURE);
        out.pos = SIGNATURE_FIELD;

        out.u32(u32::from(self.position.x));
        out.u32(u32::from(self.position.y));
        out.u32(self.steps);
        out.u32(self.resources.orbs);
        out.u32(self.resources.wood);
        out.u32(self.resources.stone);

        let companions = &self.companions[..self.companions.len().min(MAX_COMPANIONS)];
        out.usize(companions.len());
        for creature in companions {
            out.bytes(&[
                creature.species,
                creature.element.tag(),
                creature.ability.tag(),
                u8::from(creature.caught),
            ]);
            out.u32(creature.max_hp);
            out.u32(creature.hp);
            out.u32(creature.attack);
            out.u32(creature.speed);
        }
        out.pos = SIGNATURE_FIELD + 28 + MAX_COMPANIONS * COMPANION_RECORD;

        for done in self.missions {
            out.u32(u32::from(done));
        }
        out.buf
    }

    /// Decode a block.
    ///
    /// Only the first [`SAVE_SIZE`] bytes are read.
    ///
    /// # Errors
    ///
    /// [`ActionError::CorruptOrAbsentSave`] if the block is short, the
    /// signature doesn't match, a coordinate is negative or a companion
    /// carries an unknown species, element or ability or isn't flagged caught.
    pub fn decode(bytes: &[u8]) -> ActionResult<Self> {
        let block: &SaveBlock = bytes
            .get(..SAVE_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(ActionError::CorruptOrAbsentSave)?;
        if !block.starts_with(SIGNATURE) {
            trace!("save: signature mismatch");
            return Err(ActionError::CorruptOrAbsentSave);
        }

        let mut input = Reader::new(block);
        input.pos = SIGNATURE_FIELD;

        let x = u16::try_from(input.i32()).map_err(|_| ActionError::CorruptOrAbsentSave)?;
        let y = u16::try_from(input.i32()).map_err(|_| ActionError::CorruptOrAbsentSave)?;
        let steps = input.clamped();
        let orbs = input.clamped();
        let wood = input.clamped();
        let stone = input.clamped();

        let count = usize::try_from(input.i32())
            .unwrap_or(0)
            .min(MAX_COMPANIONS);
        let mut companions = Vec::with_capacity(count);
        for _ in 0..count {
            companions.push(input.creature()?);
        }
        input.pos = SIGNATURE_FIELD + 28 + MAX_COMPANIONS * COMPANION_RECORD;

        let mut missions = [false; MISSION_COUNT];
        for done in &mut missions {
            *done = input.i32() != 0;
        }

        Ok(Self {
            position: Coord::new(x, y),
            steps,
            resources: Resources::new(wood, stone, orbs),
            companions,
            missions,
        })
    }

    /// Write into `state`.
    ///
    /// # Errors
    ///
    /// [`ActionError::CorruptOrAbsentSave`] if the position is not walkable
    /// on the session's map. `state` is untouched in that case.
    pub fn apply(self, state: &mut GameState) -> ActionResult<()> {
        if !state.map.is_walkable(self.position) {
            trace!("save: position {:?} not walkable", self.position);
            return Err(ActionError::CorruptOrAbsentSave);
        }
        state.player.position = self.position;
        state.player.steps = self.steps;
        state.player.resources = self.resources;
        state.player.replace_companions(self.companions);
        state.missions = MissionTracker::from_flags(self.missions);
        debug!("save applied at {:?}", self.position);
        Ok(())
    }
}

/// Serialize the persisted part of `state`.
#[must_use]
pub fn encode(state: &GameState) -> SaveBlock {
    SaveData::capture(state).encode()
}

/// Validate `bytes` and load them into `state`, all or nothing.
///
/// # Errors
///
/// See [`SaveData::decode`] and [`SaveData::apply`].
pub fn decode_into(bytes: &[u8], state: &mut GameState) -> ActionResult<()> {
    SaveData::decode(bytes)?.apply(state)
}

struct Writer {
    buf: SaveBlock,
    pos: usize,
}

impl Writer {
    const fn new() -> Self {
        Self {
            buf: [0; SAVE_SIZE],
            pos: 0,
        }
    }

    fn bytes(&mut self, data: &[u8]) {
        self.buf[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
    }

    /// Values beyond `i32::MAX` saturate; session counters never get there.
    fn u32(&mut self, value: u32) {
        let value = i32::try_from(value).unwrap_or(i32::MAX);
        self.bytes(&value.to_le_bytes());
    }

    fn usize(&mut self, value: usize) {
        let value = i32::try_from(value).unwrap_or(i32::MAX);
        self.bytes(&value.to_le_bytes());
    }
}

struct Reader<'a> {
    buf: &'a SaveBlock,
    pos: usize,
}

impl<'a> Reader<'a> {
    const fn new(buf: &'a SaveBlock) -> Self {
        Self { buf, pos: 0 }
    }

    fn u8(&mut self) -> u8 {
        let value = self.buf[self.pos];
        self.pos += 1;
        value
    }

    fn i32(&mut self) -> i32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        i32::from_le_bytes(bytes)
    }

    /// Counter field; negative values read as zero.
    fn clamped(&mut self) -> u32 {
        u32::try_from(self.i32()).unwrap_or(0)
    }

    fn creature(&mut self) -> ActionResult<Creature> {
        let species = self.u8();
        let element = self.u8();
        let ability = self.u8();
        if self.u8() == 0 {
            trace!("save: companion not flagged as caught");
            return Err(ActionError::CorruptOrAbsentSave);
        }
        let max_hp = self.clamped();
        let hp = self.clamped().min(max_hp);
        let attack = self.clamped();
        let speed = self.clamped();

        let template = SPECIES
            .get(usize::from(species))
            .ok_or(ActionError::CorruptOrAbsentSave)?;
        Ok(Creature {
            species,
            name: template.name,
            element: Element::from_tag(element).ok_or(ActionError::CorruptOrAbsentSave)?,
            max_hp,
            hp,
            attack,
            speed,
            ability: Ability::from_tag(ability).ok_or(ActionError::CorruptOrAbsentSave)?,
            caught: true,
        })
    }
}
