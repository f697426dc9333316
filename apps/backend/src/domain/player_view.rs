//! Public view of a player, as shown in the roster.
//!
//! Everything here is visible to every connection. Secret state (reconnection
//! token, suggested words) never appears in this type.

use serde::{Deserialize, Serialize};

use crate::domain::player::Player;
use crate::domain::state::{PlayerId, PlayerStatus, Team};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub status: PlayerStatus,
    pub score: u32,
    /// First player to ever join the match.
    pub is_owner: bool,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            team: player.team,
            status: player.status,
            score: player.score,
            is_owner: player.id == 0,
        }
    }
}
