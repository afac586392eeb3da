// arena/src/world/mod.rs
pub mod map_generator;
pub mod visibility;
pub mod wall_spatial_index;
