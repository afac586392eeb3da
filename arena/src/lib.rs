// arena/src/lib.rs

pub mod core;
pub mod concurrent;
pub mod entities;
pub mod world;
pub mod server;
pub mod operational;
pub mod systems;

pub use crate::core::config::{AiConfig, ArenaConfig};
pub use crate::core::error::{ArenaError, ArenaResult};
pub use crate::server::instance::ArenaMatch;
pub use crate::systems::bots::BotManager;
