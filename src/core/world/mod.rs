pub mod manager;
pub mod model;

pub use manager::WorldManager;
pub use model::{normalize_world_name, World};
