//! Benchmarks for the per-frame tick.
//!
//! This benchmarks the controller loop a host runs sixty times a second.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use fauna::game::{Battle, BattleAction, Creature, GameState};
use fauna::{Game, InputFrame, parse_script};

/// A lap around the base: walking, gathering and opening the menu.
const LAP: &str = "~right*12 ~down*12 ~left*12 ~up*12 a . select start . start";

fn bench_idle_tick(c: &mut Criterion) {
    let mut game = Game::new(42);

    c.bench_function("tick_idle", |b| {
        b.iter(|| black_box(game.tick(black_box(InputFrame::IDLE))));
    });
}

fn bench_scripted_lap(c: &mut Criterion) {
    let frames = parse_script(LAP).unwrap();

    c.bench_function("tick_scripted_lap", |b| {
        b.iter(|| {
            let mut game = Game::new(black_box(42));
            for input in &frames {
                black_box(game.tick(*input));
            }
        });
    });
}

fn bench_battle_round(c: &mut Criterion) {
    let mut state = GameState::new(42);
    let wild = Creature::of_species(1, 1_000_000).unwrap();

    c.bench_function("battle_quick_attack", |b| {
        b.iter(|| {
            let mut battle = Battle::new(wild);
            battle.open_menu();
            let (player, rng) = state.player_and_rng();
            black_box(battle.resolve(BattleAction::QuickAttack, player, false, rng))
        });
    });
}

fn bench_new_session(c: &mut Criterion) {
    c.bench_function("new_session", |b| {
        b.iter(|| black_box(GameState::new(black_box(42))));
    });
}

criterion_group!(
    benches,
    bench_idle_tick,
    bench_scripted_lap,
    bench_battle_round,
    bench_new_session
);
criterion_main!(benches);
