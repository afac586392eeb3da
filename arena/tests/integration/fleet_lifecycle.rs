// arena/tests/integration/fleet_lifecycle.rs

use arena::core::config::ArenaConfig;
use arena::core::types::{AgentId, Vec2};
use arena::entities::agent::BotState;
use arena::entities::player::PlayerState;
use arena::systems::bots::BotManager;
use arena::world::map_generator::MapGenerator;
use arena::world::wall_spatial_index::WallSpatialIndex;

const DT: f32 = 1.0 / 60.0;

struct TestFleet {
    manager: BotManager,
    walls: WallSpatialIndex,
    points: Vec<Vec2>,
}

fn setup_fleet(count: usize, seed: u64) -> TestFleet {
    let config = ArenaConfig::default();
    let mut manager = BotManager::with_seed(&config, seed);
    manager.create_bots(count);
    let walls = WallSpatialIndex::new(&MapGenerator::generate_house_map());
    let points = MapGenerator::default_spawn_points();
    manager.spawn_all(&points, &walls);
    TestFleet { manager, walls, points }
}

fn absent_player() -> PlayerState {
    let mut player = PlayerState::new(Vec2::new(0.0, 0.0));
    player.take_damage(1000.0);
    player
}

#[test]
fn killed_bot_respawns_once_with_full_health() {
    let TestFleet { mut manager, walls, points } = setup_fleet(6, 1);
    let player = absent_player();
    manager.apply_damage(AgentId(3), 1000.0);
    assert_eq!(manager.alive_count(), 5);

    let mut requests = Vec::new();
    let mut previous_timer = manager.agent(AgentId(3)).map(|b| b.respawn_timer_ms).unwrap();
    for _ in 0..600 {
        let tick = manager.update(DT, &player, &walls, None);
        if let Some(bot) = manager.agent(AgentId(3)) {
            assert!(bot.respawn_timer_ms >= 0.0);
            assert!(bot.respawn_timer_ms <= previous_timer);
            previous_timer = bot.respawn_timer_ms;
        }
        requests.extend(tick.respawn_requests);
    }
    assert_eq!(requests, vec![AgentId(3)]);

    manager.respawn_bots(&requests, &points, &walls);
    let bot = manager.agent(AgentId(3)).unwrap();
    assert!(bot.alive);
    assert_eq!(bot.health, bot.max_health);
    assert_eq!(bot.state, BotState::Idle);
    assert_eq!(bot.deaths, 1);
    assert_eq!(manager.alive_count(), 6);
}

#[test]
fn spawning_spreads_agents_over_points() {
    let config = ArenaConfig::default();
    let walls = WallSpatialIndex::empty();
    let points = [
        Vec2::new(-10.0, -10.0),
        Vec2::new(10.0, -10.0),
        Vec2::new(-10.0, 10.0),
        Vec2::new(10.0, 10.0),
    ];

    let trials = 300;
    let mut max_total = 0usize;
    let mut trials_with_empty_point = 0usize;
    for seed in 0..trials {
        let mut manager = BotManager::with_seed(&config, seed as u64);
        manager.create_bots(8);
        manager.spawn_all(&points, &walls);

        let mut occupancy = [0usize; 4];
        for bot in manager.agents() {
            let nearest = (0..points.len())
                .min_by(|&a, &b| bot.position.distance(points[a]).total_cmp(&bot.position.distance(points[b])))
                .unwrap();
            occupancy[nearest] += 1;
        }
        max_total += occupancy.iter().copied().max().unwrap();
        if occupancy.contains(&0) {
            trials_with_empty_point += 1;
        }
    }

    let mean_max = max_total as f64 / trials as f64;
    assert!(mean_max <= 3.6, "mean max occupancy {} too high", mean_max);
    assert!(trials_with_empty_point * 20 <= trials, "{} trials left a point empty", trials_with_empty_point);
}

#[test]
fn fleet_runs_a_minute_without_leaving_the_arena() {
    let TestFleet { mut manager, walls, points } = setup_fleet(8, 7);
    let player = PlayerState::new(Vec2::new(0.0, 0.0));
    let half = ArenaConfig::default().walkable_half_extent();

    for _ in 0..3600 {
        let tick = manager.update(DT, &player, &walls, None);
        for shot in &tick.shots {
            if shot.hit {
                if let arena::core::types::TargetRef::Agent(id) = shot.target {
                    manager.apply_damage(id, shot.damage);
                }
            }
        }
        manager.respawn_bots(&tick.respawn_requests, &points, &walls);
        for bot in manager.agents() {
            assert!(bot.health >= 0.0 && bot.health <= bot.max_health);
            assert_eq!(bot.alive, bot.health > 0.0);
            assert!(bot.position.x.abs() <= half + 1e-3 && bot.position.y.abs() <= half + 1e-3);
        }
    }
}

#[test]
fn dispose_then_recreate() {
    let TestFleet { mut manager, walls, points } = setup_fleet(4, 3);
    manager.dispose();
    assert_eq!(manager.alive_count(), 0);
    manager.create_bots(2);
    manager.spawn_all(&points, &walls);
    assert_eq!(manager.alive_count(), 2);
}
