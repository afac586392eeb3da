// arena/src/systems/ai/mod.rs
pub mod bot_ai;
pub mod combat;
pub mod tactics;
pub mod targeting;

pub use bot_ai::{AgentTick, BotAISystem};
pub use tactics::{CombatPlan, Tactic, TickContext};
pub use targeting::TargetLock;
