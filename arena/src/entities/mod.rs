// arena/src/entities/mod.rs
pub mod agent;
pub mod player;
