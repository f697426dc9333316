use serde::{Deserialize, Serialize};

use crate::domain::player_view::PlayerView;
use crate::domain::state::{Phase, PlayerId, Team};
use crate::errors::{DomainError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub word: String,
}

/// Commands sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Join, or rejoin with a previously issued token.
    ClientHello { name: String, token: Option<String> },
    StartGame,
    UpdatePlayerInfo {
        name: Option<String>,
        team: Option<Team>,
    },
    WordSuggestions { words: Vec<Suggestion> },
    /// The team guessed the word identified by `token`.
    WordSuccess { token: String },
}

impl ClientMsg {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMsg::ClientHello { .. } => "client_hello",
            ClientMsg::StartGame => "start_game",
            ClientMsg::UpdatePlayerInfo { .. } => "update_player_info",
            ClientMsg::WordSuggestions { .. } => "word_suggestions",
            ClientMsg::WordSuccess { .. } => "word_success",
        }
    }
}

/// Messages sent by the server, either to one connection or to all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    ServerHello {
        token: String,
        player_id: PlayerId,
    },
    PlayerList {
        players: Vec<PlayerView>,
    },
    BowlUpdate {
        current: usize,
        total: usize,
    },
    /// Secret word for the turn-holder only. Never broadcast.
    WordNew {
        token: String,
        word: String,
        /// Seconds left in the turn.
        time_left: f64,
    },
    GameStatus {
        status: Phase,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMsg {
    pub fn error(err: &DomainError) -> Self {
        ServerMsg::Error {
            code: err.code(),
            message: err.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code: ErrorCode::BadRequest,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerMsg::ServerHello { .. } => "server_hello",
            ServerMsg::PlayerList { .. } => "player_list",
            ServerMsg::BowlUpdate { .. } => "bowl_update",
            ServerMsg::WordNew { .. } => "word_new",
            ServerMsg::GameStatus { .. } => "game_status",
            ServerMsg::Error { .. } => "error",
        }
    }
}
