// arena/src/concurrent/mod.rs
pub mod event_queue;
