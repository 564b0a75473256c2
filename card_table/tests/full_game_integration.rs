//! Full end-to-end simulation runs.
//!
//! Drives seeded simulations from the first deal to game over through the
//! tick loop only, checking the table invariants after every frame.

use card_table::{
    MenuOption, Phase, Simulation, SimulationSettings,
    constants::DECK_SIZE,
    scene::{Scene, SceneGraph},
    telemetry::MemoryTelemetry,
};

const FRAME: f32 = 1.0 / 30.0;
const MAX_FRAMES: usize = 50_000;

fn auto_simulation(players: usize, seed: u64) -> Simulation<SceneGraph, MemoryTelemetry> {
    let settings = SimulationSettings {
        players,
        seed: Some(seed),
        auto_mode: true,
        ..SimulationSettings::default()
    };
    Simulation::new(settings, SceneGraph::new(), MemoryTelemetry::default()).unwrap()
}

/// Tick until game over, asserting conservation on every frame.
fn run_to_game_over(sim: &mut Simulation<SceneGraph, MemoryTelemetry>) -> usize {
    let coins = sim.table.coin_total();
    for frame in 0..MAX_FRAMES {
        if sim.phase() == Phase::GameOver {
            return frame;
        }
        sim.tick(FRAME);
        assert_eq!(sim.table.coin_total(), coins, "coins leaked at frame {frame}");
        assert_eq!(sim.table.card_total(), DECK_SIZE, "cards leaked at frame {frame}");
    }
    panic!("no game over after {MAX_FRAMES} frames");
}

// ============================================================================
// Auto Mode
// ============================================================================

#[test]
fn test_auto_game_four_players_reaches_game_over() {
    let mut sim = auto_simulation(4, 99);
    run_to_game_over(&mut sim);

    let telemetry = sim.telemetry();
    assert!(!telemetry.round_summaries.is_empty());
    assert_eq!(
        telemetry.round_summaries.len(),
        telemetry.player_outcomes.len()
    );
    assert_eq!(telemetry.pause_metrics.len(), 1);
    assert!(telemetry.flushes >= 1);

    let standing = sim.standing().unwrap();
    assert!(standing.winner.is_some());
    assert!(standing.rounds_played <= sim.settings().total_rounds);
    assert_eq!(sim.scene().labels().count(), 1);
    assert!(sim.scheduler.is_empty());
    assert!(sim.clocks.is_frozen());
}

#[test]
fn test_auto_game_counts_menu_visits() {
    let mut sim = auto_simulation(3, 5);
    run_to_game_over(&mut sim);

    let counters = sim.pause_menu.counters;
    assert!(counters.resume > 0);
    assert_eq!(
        counters.resume,
        counters.options + counters.sound + counters.graphics
    );
    let row = format!(
        "{},{},{},{}",
        counters.resume, counters.options, counters.sound, counters.graphics
    );
    assert_eq!(sim.telemetry().pause_metrics, vec![row]);
}

#[test]
fn test_menu_panel_survives_every_visit() {
    let mut sim = auto_simulation(4, 99);
    run_to_game_over(&mut sim);

    assert!(sim.pause_menu.counters.resume > 0);
    assert!(sim.scene().is_valid(sim.pause_menu.panel));
    assert!(sim.scheduler.paused.drain_retired().is_empty());
}

#[test]
fn test_same_seed_same_game() {
    let mut first = auto_simulation(5, 1234);
    let mut second = auto_simulation(5, 1234);
    let first_frames = run_to_game_over(&mut first);
    let second_frames = run_to_game_over(&mut second);

    assert_eq!(first_frames, second_frames);
    assert_eq!(first.standing(), second.standing());
    assert_eq!(
        first.telemetry().player_outcomes,
        second.telemetry().player_outcomes
    );
}

#[test]
fn test_every_table_size_finishes() {
    for players in 2..=6 {
        let mut sim = auto_simulation(players, players as u64);
        run_to_game_over(&mut sim);
        assert_eq!(sim.phase(), Phase::GameOver);
    }
}

// ============================================================================
// Manual Play
// ============================================================================

#[test]
fn test_manual_play_resolves_rounds() {
    let settings = SimulationSettings {
        players: 3,
        total_rounds: 3,
        seed: Some(8),
        ..SimulationSettings::default()
    };
    let mut sim = Simulation::new(settings, SceneGraph::new(), MemoryTelemetry::default()).unwrap();

    for _ in 0..MAX_FRAMES {
        if sim.phase() == Phase::GameOver {
            break;
        }
        if sim.scheduler.is_empty() && sim.table.pot.is_empty() {
            sim.press_bet();
        }
        sim.tick(FRAME);
    }

    assert_eq!(sim.phase(), Phase::GameOver);
    assert!(sim.table.round > 3 || sim.table.players.len() <= 1);
    assert!(sim.telemetry().round_summaries.len() <= 3);
}

#[test]
fn test_pause_holds_the_table() {
    let mut sim = auto_simulation(4, 21);
    for _ in 0..30 {
        sim.tick(FRAME);
    }
    sim.toggle_auto_mode();
    assert!(sim.toggle_pause());
    let round = sim.table.round;
    let queued = sim.scheduler.main.len();

    for _ in 0..300 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.table.round, round);
    assert_eq!(sim.scheduler.main.len(), queued);
    assert!(sim.scheduler.paused.is_empty(), "menu animation finished");
    assert_eq!(sim.scene().opacity(sim.pause_menu.panel), Some(1.0));

    let graphics = sim.pause_menu.counters.graphics;
    assert!(sim.select_menu_option(MenuOption::Graphics));
    assert!(!sim.toggle_pause());
    assert_eq!(sim.pause_menu.counters.graphics, graphics + 1);
}

#[test]
fn test_resize_mid_game() {
    let mut sim = auto_simulation(2, 17);
    sim.request_players(5);
    sim.tick(FRAME);
    assert_eq!(sim.table.players.len(), 5);
    let frames = run_to_game_over(&mut sim);

    assert!(frames > 0);
    assert_eq!(sim.table.coin_total(), 5 * sim.settings().coins_per_player);
}
