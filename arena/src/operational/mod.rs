// arena/src/operational/mod.rs
pub mod monitoring;
