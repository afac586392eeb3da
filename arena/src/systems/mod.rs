// arena/src/systems/mod.rs
pub mod ai;
pub mod bots;
pub mod respawn;
