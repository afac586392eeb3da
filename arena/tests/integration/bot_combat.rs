// arena/tests/integration/bot_combat.rs

use arena::concurrent::event_queue::ArenaEvent;
use arena::core::config::{AiConfig, ArenaConfig};
use arena::core::types::{AgentId, TargetRef, Vec2, Wall};
use arena::entities::agent::{Agent, BotStateKind};
use arena::entities::player::PlayerState;
use arena::systems::ai::combat::{damage_falloff, try_shoot};
use arena::systems::ai::targeting::find_target;
use arena::systems::bots::BotManager;
use arena::world::map_generator::MapGenerator;
use arena::world::visibility::has_line_of_sight;
use arena::world::wall_spatial_index::WallSpatialIndex;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn placed_agent(id: usize, position: Vec2, seed: u64) -> Agent {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut agent = Agent::new(AgentId(id), &AiConfig::default());
    agent.spawn(position, &mut rng);
    agent
}

#[test]
fn ready_agent_at_close_range_always_reports_a_shot() {
    let config = AiConfig::default();
    let mut hits = 0;
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut agent = placed_agent(0, Vec2::zero(), seed);
        agent.target = Some(TargetRef::Player);

        let shot = try_shoot(&mut agent, 5.0, 10_000.0, &config, &mut rng).expect("cooldown has elapsed");
        assert_eq!(shot.target, TargetRef::Player);
        if shot.hit {
            hits += 1;
            let floor = config.damage_roll_min as f32 * damage_falloff(5.0, &config);
            assert!(shot.damage >= floor && shot.damage <= config.damage_roll_max as f32);
        } else {
            assert_eq!(shot.damage, 0.0);
        }
    }
    // Base accuracy is 0.5 at this range.
    assert!(hits > 60 && hits < 140, "unexpected hit count {}", hits);
}

#[test]
fn agent_without_target_never_fires() {
    let config = AiConfig::default();
    let mut rng = StdRng::seed_from_u64(4);
    let mut agent = placed_agent(0, Vec2::zero(), 4);
    assert!(try_shoot(&mut agent, 5.0, 0.0, &config, &mut rng).is_none());
}

#[test]
fn house_walls_hide_targets_in_other_rooms() {
    let config = AiConfig::default();
    let walls = WallSpatialIndex::new(&MapGenerator::generate_house_map());
    // Bedroom one's south wall blocks this line outside its door gap.
    let me = placed_agent(0, Vec2::new(-12.0, -10.0), 1);
    let player = PlayerState::new(Vec2::new(-12.0, 10.0));
    assert!(!has_line_of_sight(me.position, player.position, &walls));
    assert!(find_target(&me, Some(&player), std::iter::empty::<&Agent>(), &walls, &config).is_none());

    let open = WallSpatialIndex::empty();
    let lock = find_target(&me, Some(&player), std::iter::empty::<&Agent>(), &open, &config).unwrap();
    assert_eq!(lock.target, TargetRef::Player);
}

#[test]
fn mutually_visible_agents_trade_independent_shots() {
    let config = ArenaConfig::default();
    let walls = WallSpatialIndex::empty();
    let mut manager = BotManager::with_seed(&config, 17);
    manager.create_bots(2);
    manager.spawn_all(&[Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0)], &walls);

    let mut player = PlayerState::new(Vec2::new(18.0, 18.0));
    player.take_damage(1000.0);

    let first = manager.update(1.0 / 60.0, &player, &walls, None);
    assert!(first.shots.is_empty());
    for bot in manager.agents() {
        assert_eq!(bot.state.kind(), BotStateKind::Combat);
    }

    let mut events: Vec<ArenaEvent> = Vec::new();
    let second = manager.update(1.0 / 60.0, &player, &walls, Some(&mut events));
    assert_eq!(second.shots.len(), 2);
    assert_eq!(events.len(), 2);
    assert_eq!(second.shots[0].shooter, AgentId(0));
    assert_eq!(second.shots[0].target, TargetRef::Agent(AgentId(1)));
    assert_eq!(second.shots[1].shooter, AgentId(1));
    assert_eq!(second.shots[1].target, TargetRef::Agent(AgentId(0)));

    // Both are now inside their cooldown window.
    let third = manager.update(1.0 / 60.0, &player, &walls, None);
    assert!(third.shots.is_empty());
}

#[test]
fn player_outranks_agents_in_view() {
    let config = AiConfig::default();
    let walls = WallSpatialIndex::new(&[Wall::from_center(1, Vec2::new(10.0, 10.0), 2.0, 2.0)]);
    let me = placed_agent(0, Vec2::zero(), 2);
    let near_bot = placed_agent(1, Vec2::new(0.0, 3.0), 3);
    let player = PlayerState::new(Vec2::new(-20.0, 0.0));

    let lock = find_target(&me, Some(&player), [&near_bot], &walls, &config).unwrap();
    assert_eq!(lock.target, TargetRef::Player);
}
