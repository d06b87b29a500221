#![no_main]

//! Controller fuzzer.
//!
//! Drives a session with arbitrary button states, including the menu's save
//! and load, and checks the invariants after every frame.

use arbitrary::Arbitrary;
use fauna::game::check_invariants;
use fauna::{ButtonSet, Game, InputFrame};
use libfuzzer_sys::fuzz_target;

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    /// World seed.
    seed: u64,
    /// Pressed and held button bits per frame.
    frames: Vec<(u16, u16)>,
}

fuzz_target!(|input: SessionInput| {
    let mut game = Game::new(input.seed);

    // Cap frames to keep runs short
    for (pressed, held) in input.frames.into_iter().take(2_000) {
        let pressed = ButtonSet::from_bits(pressed);
        let frame = InputFrame {
            pressed,
            held: ButtonSet::from_bits(held).union(pressed),
        };
        game.tick(frame);

        let violations = check_invariants(game.state());
        assert!(violations.is_empty(), "invariants broken: {violations:?}");
    }
});
