//! Buttons and per-frame input snapshots.
//!
//! The game never polls a device. Each tick it receives an [`InputFrame`]
//! listing which buttons went down this frame (`pressed`) and which are down
//! at all (`held`). Hosts build frames from whatever they read; tests and the
//! headless runner build them from a small script language, see
//! [`parse_script`].

use std::fmt;

use thiserror::Error;

use crate::game::Direction;

/// A button on the virtual pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    /// D-pad up.
    Up = 0,
    /// D-pad down.
    Down = 1,
    /// D-pad left.
    Left = 2,
    /// D-pad right.
    Right = 3,
    /// Primary action.
    Confirm = 4,
    /// Back out.
    Cancel = 5,
    /// Open the menu.
    Menu = 6,
    /// Quick craft; save from the menu.
    Select = 7,
    /// Left shoulder: previous building, build chord.
    LeftModifier = 8,
    /// Right shoulder: next building, orb chord, load from the menu.
    RightModifier = 9,
}

impl Button {
    /// Every button, in bit order.
    pub const ALL: [Button; 10] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Confirm,
        Button::Cancel,
        Button::Menu,
        Button::Select,
        Button::LeftModifier,
        Button::RightModifier,
    ];

    /// Bit of this button inside a [`ButtonSet`].
    #[must_use]
    pub const fn bit(self) -> u16 {
        1 << (self as u8)
    }

    /// Script name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::Confirm => "confirm",
            Button::Cancel => "cancel",
            Button::Menu => "menu",
            Button::Select => "select",
            Button::LeftModifier => "lmod",
            Button::RightModifier => "rmod",
        }
    }

    /// Look up a button by script name or its short alias.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let button = match name.to_ascii_lowercase().as_str() {
            "up" | "u" => Button::Up,
            "down" | "d" => Button::Down,
            "left" => Button::Left,
            "right" => Button::Right,
            "confirm" | "a" => Button::Confirm,
            "cancel" | "b" => Button::Cancel,
            "menu" | "start" => Button::Menu,
            "select" => Button::Select,
            "lmod" | "l" => Button::LeftModifier,
            "rmod" | "r" => Button::RightModifier,
            _ => return None,
        };
        Some(button)
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of buttons, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonSet(u16);

impl ButtonSet {
    /// No buttons.
    pub const EMPTY: ButtonSet = ButtonSet(0);

    const MASK: u16 = 0b11_1111_1111;

    /// Build from raw bits; unknown bits are dropped.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether `button` is in the set.
    #[must_use]
    pub const fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// This set plus `button`.
    #[must_use]
    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.bit())
    }

    /// Add `button`.
    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    /// Buttons in this set but not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Buttons in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Iterate over the buttons in bit order.
    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for button in iter {
            set.insert(button);
        }
        set
    }
}

/// Input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    /// Buttons that went down this frame.
    pub pressed: ButtonSet,
    /// Buttons that are down this frame, including the newly pressed ones.
    pub held: ButtonSet,
}

impl InputFrame {
    /// Nothing pressed or held.
    pub const IDLE: InputFrame = InputFrame {
        pressed: ButtonSet::EMPTY,
        held: ButtonSet::EMPTY,
    };

    /// A frame where `button` goes down.
    #[must_use]
    pub const fn press(button: Button) -> Self {
        let set = ButtonSet::EMPTY.with(button);
        Self {
            pressed: set,
            held: set,
        }
    }

    /// A frame where `button` is held down from an earlier frame.
    #[must_use]
    pub const fn hold(button: Button) -> Self {
        Self {
            pressed: ButtonSet::EMPTY,
            held: ButtonSet::EMPTY.with(button),
        }
    }

    /// Derive a frame from the held buttons of the previous and current poll.
    #[must_use]
    pub const fn from_transition(previous: ButtonSet, current: ButtonSet) -> Self {
        Self {
            pressed: current.difference(previous),
            held: current,
        }
    }

    /// Same frame with `button` also pressed.
    #[must_use]
    pub const fn and_press(self, button: Button) -> Self {
        Self {
            pressed: self.pressed.with(button),
            held: self.held.with(button),
        }
    }

    /// Same frame with `button` also held.
    #[must_use]
    pub const fn and_hold(self, button: Button) -> Self {
        Self {
            pressed: self.pressed,
            held: self.held.with(button),
        }
    }

    /// Whether `button` went down this frame.
    #[must_use]
    pub const fn was_pressed(self, button: Button) -> bool {
        self.pressed.contains(button)
    }

    /// Whether `button` is down this frame.
    #[must_use]
    pub const fn is_held(self, button: Button) -> bool {
        self.held.contains(button) || self.pressed.contains(button)
    }

    /// Held direction with the highest priority (up, down, left, right).
    #[must_use]
    pub const fn held_direction(self) -> Option<Direction> {
        if self.is_held(Button::Up) {
            Some(Direction::Up)
        } else if self.is_held(Button::Down) {
            Some(Direction::Down)
        } else if self.is_held(Button::Left) {
            Some(Direction::Left)
        } else if self.is_held(Button::Right) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// Error parsing an input script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    /// A token named a button that doesn't exist.
    #[error("unknown button '{0}'")]
    UnknownButton(String),
    /// The `*N` repeat count is not a number in `1..=MAX_REPEAT`.
    #[error("bad repeat count in '{0}'")]
    BadRepeat(String),
}

/// Largest `*N` repeat count a script may use.
pub const MAX_REPEAT: usize = 100_000;

/// Parse an input script into frames.
///
/// Tokens are separated by whitespace (or commas); each token is one frame:
///
/// - `.` is an idle frame
/// - `confirm` presses a button, `~right` holds it without a new press
/// - `~lmod+confirm` combines buttons in one frame
/// - a `*N` suffix repeats the frame `N` times, e.g. `~right*9`
///
/// Lines starting with `#` are comments.
///
/// # Errors
///
/// Returns an [`InputParseError`] naming the first bad token.
pub fn parse_script(script: &str) -> Result<Vec<InputFrame>, InputParseError> {
    let mut frames = Vec::new();
    for line in script.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        for token in line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let (body, repeat) = match token.split_once('*') {
                Some((body, count)) => {
                    let n = count
                        .parse::<usize>()
                        .ok()
                        .filter(|n| (1..=MAX_REPEAT).contains(n))
                        .ok_or_else(|| InputParseError::BadRepeat(token.to_string()))?;
                    (body, n)
                }
                None => (token, 1),
            };
            let frame = parse_frame(body)?;
            frames.extend(std::iter::repeat_n(frame, repeat));
        }
    }
    Ok(frames)
}

fn parse_frame(body: &str) -> Result<InputFrame, InputParseError> {
    if body == "." {
        return Ok(InputFrame::IDLE);
    }
    let mut frame = InputFrame::IDLE;
    for part in body.split('+') {
        let (held_only, name) = match part.strip_prefix('~') {
            Some(name) => (true, name),
            None => (false, part),
        };
        let button =
            Button::from_name(name).ok_or_else(|| InputParseError::UnknownButton(part.to_string()))?;
        frame = if held_only {
            frame.and_hold(button)
        } else {
            frame.and_press(button)
        };
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_bits_unique() {
        let all: ButtonSet = Button::ALL.into_iter().collect();
        assert_eq!(all.bits().count_ones(), 10);
        assert_eq!(all.iter().count(), 10);
        assert_eq!(ButtonSet::from_bits(u16::MAX), all);
    }

    #[test]
    fn test_transition() {
        let before = ButtonSet::EMPTY.with(Button::Right);
        let now = before.with(Button::Confirm);
        let frame = InputFrame::from_transition(before, now);
        assert!(frame.was_pressed(Button::Confirm));
        assert!(!frame.was_pressed(Button::Right));
        assert!(frame.is_held(Button::Right));
    }

    #[test]
    fn test_direction_priority() {
        let frame = InputFrame::hold(Button::Right).and_hold(Button::Down);
        assert_eq!(frame.held_direction(), Some(Direction::Down));
        let frame = frame.and_hold(Button::Up);
        assert_eq!(frame.held_direction(), Some(Direction::Up));
        assert_eq!(InputFrame::IDLE.held_direction(), None);
    }

    #[test]
    fn test_parse_script() {
        let frames = parse_script("# walk then build\n~right*3 . ~l+a, select").unwrap();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[0], InputFrame::hold(Button::Right));
        assert_eq!(frames[3], InputFrame::IDLE);
        assert!(frames[4].is_held(Button::LeftModifier));
        assert!(!frames[4].was_pressed(Button::LeftModifier));
        assert!(frames[4].was_pressed(Button::Confirm));
        assert_eq!(frames[5], InputFrame::press(Button::Select));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_script("jump"),
            Err(InputParseError::UnknownButton("jump".to_string()))
        );
        assert_eq!(
            parse_script("up*0"),
            Err(InputParseError::BadRepeat("up*0".to_string()))
        );
        assert_eq!(
            parse_script("up*x"),
            Err(InputParseError::BadRepeat("up*x".to_string()))
        );
        assert!(matches!(
            parse_script("up*100001"),
            Err(InputParseError::BadRepeat(_))
        ));
        assert_eq!(parse_script("  \n# nothing\n"), Ok(Vec::new()));
    }
}
