//! The match state machine.
//!
//! `Game` is synchronous and knows nothing about sockets or tasks. Each entry
//! point takes the current instant, validates the input, mutates state and
//! returns the [`Effects`] the caller must carry out. A handler that returns
//! `Err` has not changed anything.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::{GameConfig, TeamPolicy};
use crate::domain::bowl::Bowl;
use crate::domain::player::Player;
use crate::domain::player_view::PlayerView;
use crate::domain::rotation::TurnRotation;
use crate::domain::state::{ConnectionId, Phase, PlayerId, PlayerStatus, Team};
use crate::domain::tokens::{TokenGenerator, UuidTokens};
use crate::errors::DomainError;
use crate::protocol::{ClientMsg, ServerMsg, Suggestion};

/// Deferred transitions delivered back through the engine inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SuggestionsOver,
    /// Ends the turn with the given serial, if it is still the current one.
    TurnOver { serial: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Answer the connection that sent the command.
    Reply(ServerMsg),
    Unicast { to: ConnectionId, msg: ServerMsg },
    Broadcast(ServerMsg),
    Schedule { after: Duration, timer: TimerEvent },
}

/// Ordered list of effects produced by one handler call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects(Vec<Effect>);

impl Effects {
    fn reply(&mut self, msg: ServerMsg) {
        self.0.push(Effect::Reply(msg));
    }

    fn unicast(&mut self, to: ConnectionId, msg: ServerMsg) {
        self.0.push(Effect::Unicast { to, msg });
    }

    fn broadcast(&mut self, msg: ServerMsg) {
        self.0.push(Effect::Broadcast(msg));
    }

    fn schedule(&mut self, after: Duration, timer: TimerEvent) {
        self.0.push(Effect::Schedule { after, timer });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone)]
struct Turn {
    player: PlayerId,
    serial: u64,
    deadline: Instant,
    /// Token of the word in play; `None` between a guess and the next draw.
    word_token: Option<String>,
}

pub struct Game {
    config: GameConfig,
    phase: Phase,
    players: Vec<Player>,
    bowl: Bowl,
    rotation: TurnRotation,
    turn: Option<Turn>,
    turn_serial: u64,
    round: u32,
    rng: StdRng,
    tokens: Box<dyn TokenGenerator>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_parts(config, rng, Box::new(UuidTokens))
    }

    /// Build with an explicit randomness source and token generator.
    pub fn with_parts(config: GameConfig, rng: StdRng, tokens: Box<dyn TokenGenerator>) -> Self {
        Self {
            config,
            phase: Phase::Lobby,
            players: Vec::new(),
            bowl: Bowl::new(),
            rotation: TurnRotation::new(),
            turn: None,
            turn_serial: 0,
            round: 0,
            rng,
            tokens,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    /// 1-based round number; 0 before play starts.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn bowl(&self) -> &Bowl {
        &self.bowl
    }

    pub fn turn_holder(&self) -> Option<PlayerId> {
        self.turn.as_ref().map(|t| t.player)
    }

    pub fn word_token(&self) -> Option<&str> {
        self.turn.as_ref().and_then(|t| t.word_token.as_deref())
    }

    pub fn player_for(&self, connection: ConnectionId) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.connection == Some(connection))
            .map(|p| p.id)
    }

    pub fn handle_command(
        &mut self,
        from: ConnectionId,
        command: ClientMsg,
        now: Instant,
    ) -> Result<Effects, DomainError> {
        match command {
            ClientMsg::ClientHello { name, token } => self.hello(from, name, token, now),
            ClientMsg::StartGame => self.start(from),
            ClientMsg::UpdatePlayerInfo { name, team } => self.update_info(from, name, team),
            ClientMsg::WordSuggestions { words } => self.suggest(from, words),
            ClientMsg::WordSuccess { token } => self.word_success(from, &token, now),
        }
    }

    /// A connection went away. Its player, if any, keeps score and words.
    pub fn handle_leave(&mut self, connection: ConnectionId) -> Effects {
        let mut fx = Effects::default();
        let Some(id) = self.player_for(connection) else {
            return fx;
        };
        self.players[id as usize].disconnect();
        fx.broadcast(self.roster());
        fx
    }

    pub fn handle_timer(&mut self, timer: TimerEvent, now: Instant) -> Effects {
        let mut fx = Effects::default();
        match timer {
            TimerEvent::SuggestionsOver => {
                if self.phase != Phase::Suggestions {
                    debug!(phase = %self.phase, "stale suggestion timer ignored");
                    return fx;
                }
                self.close_suggestions(now, &mut fx);
            }
            TimerEvent::TurnOver { serial } => {
                let current = self.turn.as_ref().map(|t| t.serial);
                if self.phase != Phase::Playing || current != Some(serial) {
                    debug!(serial, ?current, "stale turn timer ignored");
                    return fx;
                }
                self.next_turn(now, &mut fx);
            }
        }
        fx
    }

    fn joined(&self, from: ConnectionId) -> Result<PlayerId, DomainError> {
        self.player_for(from).ok_or(DomainError::NotJoined)
    }

    fn expect_phase(&self, action: &'static str, expected: Phase) -> Result<(), DomainError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DomainError::phase(action, expected, self.phase))
        }
    }

    fn hello(
        &mut self,
        from: ConnectionId,
        name: String,
        token: Option<String>,
        now: Instant,
    ) -> Result<Effects, DomainError> {
        if self.player_for(from).is_some() {
            return Err(DomainError::AlreadyJoined);
        }

        let resumed = token
            .as_deref()
            .and_then(|t| self.players.iter().position(|p| p.token() == t));

        let mut fx = Effects::default();
        let id = match resumed {
            Some(index) => {
                let holds_turn = self.turn_holder() == Some(index as PlayerId);
                let player = &mut self.players[index];
                player.connection = Some(from);
                player.status = if holds_turn {
                    PlayerStatus::Active
                } else {
                    PlayerStatus::Passive
                };
                player.id
            }
            None => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(DomainError::validation("Name must not be blank"));
                }
                let id = self.players.len() as PlayerId;
                let team = self.pick_team();
                let token = self.tokens.generate();
                self.players
                    .push(Player::new(id, name.to_string(), team, token, from));
                id
            }
        };

        let player = &self.players[id as usize];
        fx.reply(ServerMsg::ServerHello {
            token: player.token().to_string(),
            player_id: id,
        });
        fx.broadcast(self.roster());
        fx.reply(ServerMsg::GameStatus { status: self.phase });
        if self.phase != Phase::Lobby {
            fx.reply(self.bowl_update());
        }

        if self.phase == Phase::Playing {
            match &self.turn {
                Some(turn) if turn.player == id => {
                    if let Some(msg) = self.current_word(now) {
                        fx.reply(msg);
                    }
                }
                Some(_) => {}
                None => self.next_turn(now, &mut fx),
            }
        }
        Ok(fx)
    }

    fn pick_team(&mut self) -> Team {
        match self.config.team_policy {
            TeamPolicy::Balanced => {
                let count = |team: Team| {
                    self.players
                        .iter()
                        .filter(|p| p.team == team && p.is_connected())
                        .count()
                };
                if count(Team::Blue) < count(Team::Red) {
                    Team::Blue
                } else {
                    Team::Red
                }
            }
            TeamPolicy::Random => {
                if self.rng.random_bool(0.5) {
                    Team::Red
                } else {
                    Team::Blue
                }
            }
        }
    }

    fn start(&mut self, from: ConnectionId) -> Result<Effects, DomainError> {
        self.joined(from)?;
        self.expect_phase("start_game", Phase::Lobby)?;
        for team in Team::ALL {
            let ready = self
                .players
                .iter()
                .any(|p| p.team == team && p.is_connected());
            if !ready {
                return Err(DomainError::TeamsNotReady(team));
            }
        }

        self.phase = Phase::Suggestions;
        let mut fx = Effects::default();
        fx.broadcast(ServerMsg::GameStatus { status: self.phase });
        fx.schedule(self.config.suggestion_time, TimerEvent::SuggestionsOver);
        Ok(fx)
    }

    fn update_info(
        &mut self,
        from: ConnectionId,
        name: Option<String>,
        team: Option<Team>,
    ) -> Result<Effects, DomainError> {
        self.expect_phase("update_player_info", Phase::Lobby)?;
        let id = self.joined(from)?;
        let name = match name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation("Name must not be blank"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let player = &mut self.players[id as usize];
        if let Some(name) = name {
            player.name = name;
        }
        if let Some(team) = team {
            player.team = team;
        }

        let mut fx = Effects::default();
        fx.broadcast(self.roster());
        Ok(fx)
    }

    fn suggest(
        &mut self,
        from: ConnectionId,
        words: Vec<Suggestion>,
    ) -> Result<Effects, DomainError> {
        self.expect_phase("word_suggestions", Phase::Suggestions)?;
        let id = self.joined(from)?;
        if words.len() > self.config.max_words {
            return Err(DomainError::TooManyWords {
                submitted: words.len(),
                max: self.config.max_words,
            });
        }
        let words: Vec<String> = words
            .into_iter()
            .map(|s| s.word.trim().to_string())
            .collect();
        if words.iter().any(String::is_empty) {
            return Err(DomainError::validation("Suggested words must not be blank"));
        }

        self.players[id as usize].replace_words(words);
        let mut fx = Effects::default();
        fx.broadcast(self.bowl_update());
        Ok(fx)
    }

    fn word_success(
        &mut self,
        from: ConnectionId,
        token: &str,
        now: Instant,
    ) -> Result<Effects, DomainError> {
        self.expect_phase("word_success", Phase::Playing)?;
        self.joined(from)?;
        let holder = match &self.turn {
            Some(turn) if turn.word_token.as_deref() == Some(token) => turn.player,
            _ => return Err(DomainError::StaleWordToken),
        };

        if let Some(turn) = self.turn.as_mut() {
            turn.word_token = None;
        }
        self.bowl.confirm();
        self.players[holder as usize].score += 1;

        let mut fx = Effects::default();
        fx.broadcast(self.roster());
        fx.broadcast(self.bowl_update());

        if self.bowl.is_exhausted() {
            if self.round < self.config.rounds {
                self.start_round(&mut fx);
            } else {
                self.finish(&mut fx);
                return Ok(fx);
            }
        }
        self.deliver_word(now, &mut fx);
        Ok(fx)
    }

    fn close_suggestions(&mut self, now: Instant, fx: &mut Effects) {
        let words: Vec<String> = self
            .players
            .iter()
            .flat_map(|p| p.words().iter().cloned())
            .collect();
        self.bowl.fill(words);

        if self.bowl.total() == 0 {
            self.finish(fx);
            return;
        }

        self.phase = Phase::Playing;
        fx.broadcast(ServerMsg::GameStatus { status: self.phase });
        self.start_round(fx);
        self.next_turn(now, fx);
    }

    fn start_round(&mut self, fx: &mut Effects) {
        self.round += 1;
        self.bowl.refill(&mut self.rng);
        debug!(round = self.round, words = self.bowl.total(), "round started");
        fx.broadcast(self.bowl_update());
    }

    /// Hand the turn to the next player, returning any unguessed word first.
    fn next_turn(&mut self, now: Instant, fx: &mut Effects) {
        self.bowl.put_back();
        if let Some(previous) = self.turn.take() {
            self.players[previous.player as usize].end_turn();
        }

        let Some(id) = self.rotation.next_player(&self.players) else {
            debug!("no connected player to take the turn");
            fx.broadcast(self.roster());
            return;
        };

        self.turn_serial += 1;
        let serial = self.turn_serial;
        self.players[id as usize].status = PlayerStatus::Active;
        self.turn = Some(Turn {
            player: id,
            serial,
            deadline: now + self.config.turn_time,
            word_token: None,
        });

        fx.broadcast(self.roster());
        fx.schedule(self.config.turn_time, TimerEvent::TurnOver { serial });
        self.deliver_word(now, fx);
    }

    /// Draw a word and send it, with a fresh token, to the turn-holder only.
    fn deliver_word(&mut self, now: Instant, fx: &mut Effects) {
        let Some(turn) = self.turn.as_mut() else {
            return;
        };
        let Some(word) = self.bowl.draw().map(str::to_string) else {
            return;
        };
        let token = self.tokens.generate();
        turn.word_token = Some(token.clone());

        let time_left = turn.deadline.saturating_duration_since(now).as_secs_f64();
        if let Some(connection) = self.players[turn.player as usize].connection {
            fx.unicast(
                connection,
                ServerMsg::WordNew {
                    token,
                    word,
                    time_left,
                },
            );
        }
    }

    /// The word in play for a returning turn-holder, with its existing token.
    fn current_word(&self, now: Instant) -> Option<ServerMsg> {
        let turn = self.turn.as_ref()?;
        let token = turn.word_token.clone()?;
        let word = self.bowl.in_play()?.to_string();
        Some(ServerMsg::WordNew {
            token,
            word,
            time_left: turn.deadline.saturating_duration_since(now).as_secs_f64(),
        })
    }

    fn finish(&mut self, fx: &mut Effects) {
        self.bowl.put_back();
        if let Some(previous) = self.turn.take() {
            self.players[previous.player as usize].end_turn();
        }
        self.phase = Phase::Finished;
        fx.broadcast(self.roster());
        fx.broadcast(ServerMsg::GameStatus { status: self.phase });
        fx.broadcast(self.bowl_update());
    }

    fn roster(&self) -> ServerMsg {
        ServerMsg::PlayerList {
            players: self.players.iter().map(PlayerView::from).collect(),
        }
    }

    fn bowl_update(&self) -> ServerMsg {
        match self.phase {
            Phase::Lobby | Phase::Suggestions => {
                let submitted = self.players.iter().map(|p| p.words().len()).sum();
                ServerMsg::BowlUpdate {
                    current: submitted,
                    total: submitted,
                }
            }
            Phase::Playing | Phase::Finished => ServerMsg::BowlUpdate {
                current: self.bowl.remaining(),
                total: self.bowl.total(),
            },
        }
    }
}
