pub mod engine;
pub mod timers;

pub use engine::GameEngine;
pub use timers::Timers;
