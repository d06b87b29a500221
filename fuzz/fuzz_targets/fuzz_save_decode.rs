#![no_main]

//! Save block fuzzer.
//!
//! Loading arbitrary bytes must either fail without touching the session or
//! leave a session that satisfies every invariant.

use fauna::game::check_invariants;
use fauna::{Game, SaveData};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut game = Game::new(1);
    let before = game.save();

    if game.load(data) {
        let violations = check_invariants(game.state());
        assert!(violations.is_empty(), "loaded save broke invariants: {violations:?}");

        // Whatever loaded must encode back into a block that loads again.
        let again = game.save();
        let decoded = SaveData::decode(&again).expect("re-encoded save must decode");
        assert_eq!(decoded.position, game.state().player.position);
    } else {
        assert_eq!(game.save(), before, "failed load changed the session");
    }
});
