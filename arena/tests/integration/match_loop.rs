// arena/tests/integration/match_loop.rs

use arena::concurrent::event_queue::ArenaEvent;
use arena::core::config::ArenaConfig;
use arena::core::types::TargetRef;
use arena::server::instance::ArenaMatch;

fn quick_config(bot_count: usize, seed: u64) -> ArenaConfig {
    ArenaConfig {
        tick_rate: 240,
        bot_count,
        match_duration_secs: 1.0,
        rng_seed: Some(seed),
        ..ArenaConfig::default()
    }
}

#[tokio::test]
async fn timed_match_runs_to_completion() {
    let mut arena = ArenaMatch::new(quick_config(4, 1)).expect("valid match setup");
    let summary = arena.run(None).await;

    assert!(arena.is_finished());
    assert!(summary.elapsed_secs >= 1.0);
    assert!(summary.ticks >= 239 && summary.ticks <= 241, "ran {} ticks", summary.ticks);
    assert_eq!(summary.scoreboard.len(), 5);
    assert_eq!(summary.scoreboard[0].who, TargetRef::Player);
}

#[tokio::test]
async fn tick_limit_stops_the_loop_early() {
    let mut arena = ArenaMatch::new(quick_config(2, 2)).expect("valid match setup");
    let summary = arena.run(Some(10)).await;
    assert_eq!(summary.ticks, 10);
    assert!(!arena.is_finished());
}

#[tokio::test]
async fn summary_serializes_to_json() {
    let mut arena = ArenaMatch::new(quick_config(3, 3)).expect("valid match setup");
    let summary = arena.run(Some(5)).await;
    let json = serde_json::to_value(&summary).expect("summary is serializable");
    assert_eq!(json["ticks"], 5);
    assert_eq!(json["scoreboard"].as_array().map(|a| a.len()), Some(4));
}

#[test]
fn long_headless_match_keeps_books_balanced() {
    let config = ArenaConfig { bot_count: 8, rng_seed: Some(42), ..ArenaConfig::default() };
    let dt = config.tick_seconds();
    let mut arena = ArenaMatch::new(config).expect("valid match setup");

    let mut deaths_reported = 0u32;
    let mut saw_hit = false;
    for _ in 0..(60 * 90) {
        let report = arena.tick(dt);
        deaths_reported += report.deaths.len() as u32;

        let player = arena.player();
        assert!(player.health >= 0.0 && player.health <= player.max_health);
        assert_eq!(player.alive, player.health > 0.0);
        for bot in arena.bots().agents() {
            assert!(bot.health >= 0.0 && bot.health <= bot.max_health);
            assert_eq!(bot.alive, bot.health > 0.0);
            assert!(!bot.flashlight_on || (bot.alive && arena.is_dark()));
        }
        saw_hit |= arena.drain_events(1024).iter().any(|e| matches!(e, ArenaEvent::Hit { .. }));
    }

    let board = arena.scoreboard();
    let kills: u32 = board.iter().map(|e| e.kills).sum();
    let deaths: u32 = board.iter().map(|e| e.deaths).sum();
    assert!(saw_hit, "eight bots in a house for 90s should land at least one hit");
    assert_eq!(kills, deaths);
    assert_eq!(kills, deaths_reported);
    assert_eq!(board[0].kills, 0, "the scripted player never shoots");
}

#[test]
fn dark_mode_limits_player_visibility_to_flashlight_range() {
    let config = ArenaConfig {
        bot_count: 6,
        dark_mode_interval_secs: 0.5,
        rng_seed: Some(9),
        ..ArenaConfig::default()
    };
    let dt = config.tick_seconds();
    let range = config.flashlight_range;
    let mut arena = ArenaMatch::new(config).expect("valid match setup");
    while !arena.is_dark() {
        arena.tick(dt);
    }

    let player_pos = arena.player().position;
    for bot in arena.bots().agents() {
        if arena.is_bot_visible(bot.id) {
            assert!(bot.alive);
            assert!(bot.position.distance(player_pos) < range);
        }
    }
}
