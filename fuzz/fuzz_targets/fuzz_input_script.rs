#![no_main]

//! Input script parser fuzzer.
//!
//! Parsing arbitrary text must never panic, and accepted scripts must run.

use fauna::{Game, parse_script};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(frames) = parse_script(text) else {
        return;
    };

    let mut game = Game::new(7);
    for input in frames.into_iter().take(2_000) {
        game.tick(input);
    }
});
