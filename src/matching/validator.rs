//! Match request validation
//!
//! A 2v2 match needs exactly two entries per team and four distinct player
//! ids across both teams.

use crate::error::ValidationError;
use crate::types::{MatchRequest, MatchTeamInput, PlayerId};
use std::collections::HashSet;

/// Players per team in a 2v2 match
pub const TEAM_SIZE: usize = 2;

/// Players per match
pub const MATCH_PLAYERS: usize = TEAM_SIZE * 2;

/// Stateless checks for the 4-unique-player invariant
pub struct MatchValidator;

impl MatchValidator {
    /// Validate a match request
    pub fn validate(request: &MatchRequest) -> Result<(), ValidationError> {
        Self::check_team(1, &request.team1)?;
        Self::check_team(2, &request.team2)?;

        Self::check_unique(request.players().map(|p| p.id))
    }

    /// Validate a set of player ids that should form one match
    pub fn check_unique(ids: impl IntoIterator<Item = PlayerId>) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(MATCH_PLAYERS);
        for id in ids {
            if !seen.insert(id) {
                return Err(ValidationError::DuplicatePlayerId(id));
            }
        }

        if seen.len() != MATCH_PLAYERS {
            return Err(ValidationError::WrongPlayerCount {
                expected: MATCH_PLAYERS,
                got: seen.len(),
            });
        }

        Ok(())
    }

    fn check_team(team: u8, input: &MatchTeamInput) -> Result<(), ValidationError> {
        if input.players.len() != TEAM_SIZE {
            return Err(ValidationError::MalformedTeam {
                team,
                got: input.players.len(),
            });
        }
        Ok(())
    }
}
