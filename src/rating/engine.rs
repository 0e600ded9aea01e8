//! Rating engine interface
//!
//! The engine owns the skill model: it hands out the starting rating for new
//! players, updates ratings after a 2v2 match and predicts match outcomes.
//! Everything above it (resolution, batching, balancing) only relies on this
//! contract.

use crate::error::{MmrError, MmrResult};
use crate::types::{Rating, TeamRatings};

/// Skill model used to rate matches and predict outcomes
#[cfg_attr(test, mockall::automock)]
pub trait RatingEngine: Send + Sync {
    /// Rating given to a player with no history
    fn default_rating(&self) -> Rating;

    /// Update the ratings of both teams after a match
    ///
    /// The side with the higher score won; equal scores are a draw. Ratings
    /// are returned in the same order they were passed in.
    fn rate(
        &self,
        team_a: TeamRatings,
        score_a: i32,
        team_b: TeamRatings,
        score_b: i32,
    ) -> MmrResult<(TeamRatings, TeamRatings)>;

    /// Probability in `[0, 1]` that `team_a` beats `team_b`
    fn predict_win(&self, team_a: &TeamRatings, team_b: &TeamRatings) -> MmrResult<f64>;
}

/// Reject ratings the skill model cannot work with
pub fn ensure_well_formed(ratings: &[Rating]) -> MmrResult<()> {
    match ratings.iter().find(|r| !r.is_well_formed()) {
        Some(bad) => Err(MmrError::InternalRating {
            reason: format!(
                "rating (mu: {}, sigma: {}) must be finite with positive sigma",
                bad.mu, bad.sigma
            ),
        }),
        None => Ok(()),
    }
}
