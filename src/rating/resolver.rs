//! Effective rating resolution
//!
//! Works out the rating a player enters a match with, from what the caller
//! sent, the engine's default, previous-season dampening and the ratings
//! already produced earlier in the same batch.

use crate::matching::batch::BatchCache;
use crate::rating::engine::RatingEngine;
use crate::types::{PlayerRatingInput, Rating};
use tracing::debug;

/// Divisor applied to a previous-season mean's distance from the default
pub const PREVIOUS_SEASON_DAMPENING: f64 = 3.0;

/// Which rule produced a resolved rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSource {
    /// Updated earlier in the same batch
    Cached,
    /// Dampened carry-over of a previous-season rating
    PreviousSeason,
    /// Explicit mu and sigma from the caller
    Explicit,
    /// Engine default for a player without usable history
    Default,
}

/// Resolves caller input into the rating a player starts a match with
pub struct RatingResolver<'a> {
    engine: &'a dyn RatingEngine,
}

impl<'a> RatingResolver<'a> {
    pub fn new(engine: &'a dyn RatingEngine) -> Self {
        Self { engine }
    }

    /// Resolve the input rating for one player
    pub fn resolve(&self, input: &PlayerRatingInput, cache: &BatchCache) -> Rating {
        self.resolve_with_source(input, cache).0
    }

    /// Resolve the input rating and report which rule applied
    pub fn resolve_with_source(
        &self,
        input: &PlayerRatingInput,
        cache: &BatchCache,
    ) -> (Rating, RatingSource) {
        let resolved = match (
            cache.get(input.id),
            input.is_previous_season_rating.unwrap_or(false),
            input.mu,
            input.sigma,
        ) {
            (Some(cached), _, _, _) => (cached, RatingSource::Cached),
            (None, true, mu, _) => (self.dampen(mu), RatingSource::PreviousSeason),
            (None, false, Some(mu), Some(sigma)) => {
                (Rating::new(mu, sigma), RatingSource::Explicit)
            }
            (None, false, _, _) => (self.engine.default_rating(), RatingSource::Default),
        };

        debug!(
            "Resolved player {} to mu={:.4} sigma={:.4} ({:?})",
            input.id, resolved.0.mu, resolved.0.sigma, resolved.1
        );

        resolved
    }

    /// Pull a previous-season mean two thirds of the way back to the default;
    /// uncertainty always restarts at the default
    fn dampen(&self, previous_mu: Option<f64>) -> Rating {
        let default = self.engine.default_rating();
        match previous_mu {
            Some(mu) => Rating::new(
                default.mu + (mu - default.mu) / PREVIOUS_SEASON_DAMPENING,
                default.sigma,
            ),
            None => default,
        }
    }
}
