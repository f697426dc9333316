use crate::domain::state::{ConnectionId, PlayerId, PlayerStatus, Team};

/// A participant in the match. Created on first contact and never deleted;
/// a dropped connection only marks the player `Disconnected`.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub status: PlayerStatus,
    pub score: u32,
    /// `None` while disconnected.
    pub connection: Option<ConnectionId>,
    token: String,
    words: Vec<String>,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: String,
        team: Team,
        token: String,
        connection: ConnectionId,
    ) -> Self {
        Self {
            id,
            name,
            team,
            status: PlayerStatus::Passive,
            score: 0,
            connection: Some(connection),
            token,
            words: Vec::new(),
        }
    }

    /// Reconnection token. Fixed for the lifetime of the player.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Replace the suggestion list wholesale.
    pub fn replace_words(&mut self, words: Vec<String>) {
        self.words = words;
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Drop the connection binding, keeping score and words.
    pub fn disconnect(&mut self) {
        self.connection = None;
        self.status = PlayerStatus::Disconnected;
    }

    /// Demote from the turn unless the player has already dropped out.
    pub fn end_turn(&mut self) {
        if self.status == PlayerStatus::Active {
            self.status = PlayerStatus::Passive;
        }
    }
}
