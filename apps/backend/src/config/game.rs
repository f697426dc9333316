use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::config::parse_var;
use crate::error::AppError;

/// How a newly joined player is assigned to a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeamPolicy {
    /// Join the team with fewer connected players; ties go to red.
    #[default]
    Balanced,
    /// Coin flip.
    Random,
}

impl FromStr for TeamPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "balanced" => Ok(TeamPolicy::Balanced),
            "random" => Ok(TeamPolicy::Random),
            other => Err(format!("unknown team policy '{other}'")),
        }
    }
}

/// Rules of a single match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Upper bound on words per player submission.
    pub max_words: usize,
    /// Times the full bowl is played through.
    pub rounds: u32,
    pub suggestion_time: Duration,
    pub turn_time: Duration,
    pub team_policy: TeamPolicy,
    /// Fixed shuffle seed; OS entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_words: 15,
            rounds: 3,
            suggestion_time: Duration::from_secs(180),
            turn_time: Duration::from_secs(60),
            team_policy: TeamPolicy::Balanced,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_words = parse_var(&lookup, "SALADBOWL_MAX_WORDS", defaults.max_words)?;
        let rounds = parse_var(&lookup, "SALADBOWL_ROUNDS", defaults.rounds)?;
        if rounds == 0 {
            return Err(AppError::config(
                "SALADBOWL_ROUNDS must be at least 1".to_string(),
            ));
        }

        let suggestion_secs = parse_var(
            &lookup,
            "SALADBOWL_SUGGESTION_SECS",
            defaults.suggestion_time.as_secs(),
        )?;
        let turn_secs = parse_var(&lookup, "SALADBOWL_TURN_SECS", defaults.turn_time.as_secs())?;
        if turn_secs == 0 {
            return Err(AppError::config(
                "SALADBOWL_TURN_SECS must be at least 1".to_string(),
            ));
        }

        let team_policy = parse_var(&lookup, "SALADBOWL_TEAM_POLICY", defaults.team_policy)?;
        let seed = match lookup("SALADBOWL_SEED") {
            Some(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!("SALADBOWL_SEED has an invalid value: '{raw}'"))
            })?),
            _ => None,
        };

        Ok(Self {
            max_words,
            rounds,
            suggestion_time: Duration::from_secs(suggestion_secs),
            turn_time: Duration::from_secs(turn_secs),
            team_policy,
            seed,
        })
    }
}
