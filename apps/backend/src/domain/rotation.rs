//! Turn order: teams alternate, players within a team go round-robin.

use std::collections::VecDeque;

use crate::domain::player::Player;
use crate::domain::state::{PlayerId, Team};

/// Team that opens the first turn of a match.
pub const FIRST_TEAM: Team = Team::Red;

#[derive(Debug, Clone, Default)]
pub struct TurnRotation {
    red: VecDeque<PlayerId>,
    blue: VecDeque<PlayerId>,
    last_team: Option<Team>,
}

impl TurnRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Team of the previous turn-holder, if any turn has been handed out.
    pub fn last_team(&self) -> Option<Team> {
        self.last_team
    }

    /// Pick the next turn-holder.
    ///
    /// The team opposite the previous turn goes next. An empty queue is
    /// refilled with the team's players in roster order. Disconnected players
    /// lose their place in the current cycle. The turn only falls back to the
    /// same team when the other team has nobody connected; `None` means
    /// nobody at all is connected.
    pub fn next_player(&mut self, players: &[Player]) -> Option<PlayerId> {
        let preferred = self.last_team.map(Team::other).unwrap_or(FIRST_TEAM);
        for team in [preferred, preferred.other()] {
            if let Some(id) = self.pop_connected(team, players) {
                self.last_team = Some(team);
                return Some(id);
            }
        }
        None
    }

    fn pop_connected(&mut self, team: Team, players: &[Player]) -> Option<PlayerId> {
        let queue = match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        };

        let mut refilled = false;
        loop {
            while let Some(id) = queue.pop_front() {
                let eligible = players
                    .get(id as usize)
                    .is_some_and(|p| p.team == team && p.is_connected());
                if eligible {
                    return Some(id);
                }
            }
            if refilled {
                return None;
            }
            refilled = true;
            queue.extend(players.iter().filter(|p| p.team == team).map(|p| p.id));
        }
    }

    #[cfg(test)]
    pub(crate) fn queued(&self, team: Team) -> Vec<PlayerId> {
        match team {
            Team::Red => self.red.iter().copied().collect(),
            Team::Blue => self.blue.iter().copied().collect(),
        }
    }
}
