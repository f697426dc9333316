//! Domain layer: the players, the bowl and the match state machine.

pub mod bowl;
pub mod game;
pub mod player;
pub mod player_view;
pub mod rotation;
pub mod state;
pub mod tokens;


pub use game::{Effect, Effects, Game, TimerEvent};
pub use state::{ConnectionId, Phase, PlayerId, PlayerStatus, Team};
