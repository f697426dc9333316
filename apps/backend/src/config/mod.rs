//! Process configuration read from the environment.

pub mod game;
pub mod server;

pub use game::{GameConfig, TeamPolicy};
pub use server::ServerConfig;

use crate::error::AppError;

/// Parse an optional variable, falling back to `default` when unset or blank.
pub(crate) fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{name} has an invalid value: '{raw}'"))),
        _ => Ok(default),
    }
}
