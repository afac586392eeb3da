// arena/tests/properties/invariants.rs

use arena::core::config::AiConfig;
use arena::core::types::{AgentId, Combatant, TargetRef, Vec2, Wall};
use arena::entities::agent::{Agent, BotState, BotStateKind};
use arena::entities::player::PlayerState;
use arena::systems::ai::combat::accuracy_at;
use arena::systems::ai::tactics::{CombatPlan, Tactic, TickContext};
use arena::systems::ai::targeting::find_target;
use arena::systems::ai::BotAISystem;
use arena::world::visibility::has_line_of_sight;
use arena::world::wall_spatial_index::WallSpatialIndex;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn agent_at(id: usize, position: Vec2, rng: &mut StdRng) -> Agent {
    let mut agent = Agent::new(AgentId(id), &AiConfig::default());
    agent.spawn(position, rng);
    agent
}

fn coord() -> impl Strategy<Value = f32> {
    -18.0f32..18.0
}

fn alive_state() -> impl Strategy<Value = BotState> {
    prop_oneof![
        Just(BotState::Idle),
        Just(BotState::Patrol { waypoint: None }),
        Just(BotState::Alert),
        Just(BotState::Combat(CombatPlan { tactic: Tactic::Aggressive, tactic_timer: 0.0, reroll_after: 3.0 })),
    ]
}

proptest! {
    #[test]
    fn health_stays_in_bounds(hits in proptest::collection::vec(-20.0f32..80.0, 1..12)) {
        let mut rng = StdRng::seed_from_u64(0);
        let mut agent = agent_at(0, Vec2::zero(), &mut rng);
        for amount in hits {
            agent.take_damage(amount);
            prop_assert!(agent.health >= 0.0 && agent.health <= agent.max_health);
            prop_assert_eq!(agent.alive, agent.health > 0.0);
        }
    }

    #[test]
    fn accuracy_never_rises_with_distance(a in 0.0f32..60.0, b in 0.0f32..60.0) {
        let config = AiConfig::default();
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(accuracy_at(far, &config) <= accuracy_at(near, &config));
        prop_assert!(accuracy_at(far, &config) >= 0.0);
    }

    #[test]
    fn low_health_always_flees(state in alive_state(), health in 1.0f32..29.9, seed in any::<u64>()) {
        let config = AiConfig::default();
        let walls = WallSpatialIndex::empty();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut agent = agent_at(0, Vec2::zero(), &mut rng);
        agent.transition(state);
        agent.health = health;
        let player = PlayerState::new(Vec2::new(0.0, 6.0));
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            now_ms: 0.0,
            obstacles: &walls,
            config: &config,
            half_extent: 19.0,
            patrol_extent: 15.0,
        };

        BotAISystem::update_agent(&mut agent, &ctx, Some(&player), std::iter::empty::<&Agent>(), &mut rng);
        prop_assert_eq!(agent.state.kind(), BotStateKind::Flee);
    }

    #[test]
    fn selected_target_is_alive_in_range_and_visible(
        positions in proptest::collection::vec((coord(), coord(), any::<bool>()), 1..6),
        player_pos in (coord(), coord()),
        player_alive in any::<bool>(),
        wall_x in -10.0f32..10.0,
    ) {
        let config = AiConfig { view_range: 20.0, ..AiConfig::default() };
        let walls = WallSpatialIndex::new(&[Wall::from_center(1, Vec2::new(wall_x, 0.0), 0.3, 12.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        let me = agent_at(0, Vec2::new(-15.0, 0.0), &mut rng);

        let others: Vec<Agent> = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y, alive))| {
                let mut agent = agent_at(i + 1, Vec2::new(x, y), &mut rng);
                if !alive {
                    agent.take_damage(1000.0);
                }
                agent
            })
            .collect();
        let mut player = PlayerState::new(Vec2::new(player_pos.0, player_pos.1));
        if !player_alive {
            player.take_damage(1000.0);
        }

        if let Some(lock) = find_target(&me, Some(&player), others.iter(), &walls, &config) {
            let (alive, position) = match lock.target {
                TargetRef::Player => (player.is_alive(), player.position),
                TargetRef::Agent(id) => {
                    let target = &others[id.0 - 1];
                    (target.is_alive(), target.position)
                }
            };
            prop_assert!(alive);
            prop_assert!(me.position.distance(position) < config.view_range);
            prop_assert!(has_line_of_sight(me.position, position, &walls));
        }
    }
}
