//! Sequential rating of match batches
//!
//! Matches in a batch are rated strictly in submission order. Every rated
//! match feeds its updated ratings into a [`BatchCache`], and later matches
//! in the same batch start from those ratings instead of whatever the caller
//! sent for the same players.

use crate::error::{MmrError, MmrResult};
use crate::matching::validator::MatchValidator;
use crate::rating::display::DisplayConverter;
use crate::rating::engine::RatingEngine;
use crate::rating::resolver::RatingResolver;
use crate::types::{
    MatchRequest, MatchResult, MatchTeamInput, Player, PlayerId, PlayerResult, Rating, Team,
    TeamRatings, TeamResult,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Ratings produced so far within one batch call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchCache {
    ratings: HashMap<PlayerId, Rating>,
}

impl BatchCache {
    pub fn get(&self, id: PlayerId) -> Option<Rating> {
        self.ratings.get(&id).copied()
    }

    pub fn with_rating(mut self, id: PlayerId, rating: Rating) -> Self {
        self.ratings.insert(id, rating);
        self
    }

    /// Fold the updated ratings of a rated match into the cache
    pub fn record(self, result: &MatchResult) -> Self {
        result
            .players()
            .fold(self, |cache, player| cache.with_rating(player.id, player.rating()))
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// Validates, resolves and rates matches, alone or in ordered batches
#[derive(Clone)]
pub struct BatchOrchestrator {
    engine: Arc<dyn RatingEngine>,
    display: DisplayConverter,
}

impl BatchOrchestrator {
    pub fn new(engine: Arc<dyn RatingEngine>, display: DisplayConverter) -> Self {
        Self { engine, display }
    }

    pub fn engine(&self) -> &dyn RatingEngine {
        self.engine.as_ref()
    }

    pub fn display(&self) -> &DisplayConverter {
        &self.display
    }

    /// Rate one match on its own
    pub fn submit_single(&self, request: &MatchRequest) -> MmrResult<MatchResult> {
        self.rate_match(request, &BatchCache::default())
    }

    /// Rate matches in order, carrying updated ratings forward
    ///
    /// Stops at the first failing match and reports its index; nothing from
    /// the batch is returned in that case.
    pub fn process_batch(&self, requests: &[MatchRequest]) -> MmrResult<Vec<MatchResult>> {
        let (cache, results) = requests.iter().enumerate().try_fold(
            (BatchCache::default(), Vec::with_capacity(requests.len())),
            |(cache, mut results), (index, request)| {
                let result = self
                    .rate_match(request, &cache)
                    .map_err(|e| e.at_index(index))?;
                let cache = cache.record(&result);
                results.push(result);
                Ok::<_, MmrError>((cache, results))
            },
        )?;

        debug!(
            "Rated batch of {} matches covering {} players",
            results.len(),
            cache.len()
        );

        Ok(results)
    }

    /// Rate one match against the ratings already produced in this batch
    pub fn rate_match(&self, request: &MatchRequest, cache: &BatchCache) -> MmrResult<MatchResult> {
        MatchValidator::validate(request)?;

        let resolver = RatingResolver::new(self.engine.as_ref());
        let team1 = resolve_team(&resolver, &request.team1, cache);
        let team2 = resolve_team(&resolver, &request.team2, cache);

        let (rated1, rated2) =
            self.engine
                .rate(team1.ratings(), team1.score, team2.ratings(), team2.score)?;

        Ok(MatchResult {
            team1: self.team_result(&team1, rated1),
            team2: self.team_result(&team2, rated2),
        })
    }

    fn team_result(&self, team: &Team, rated: TeamRatings) -> TeamResult {
        let players = team
            .players
            .iter()
            .zip(rated)
            .map(|(player, rating)| PlayerResult {
                id: player.id,
                mu: rating.mu,
                sigma: rating.sigma,
                mmr: self.display.to_display_value(&rating),
            })
            .collect();

        TeamResult {
            score: team.score,
            players,
        }
    }
}

/// Caller must have validated that the team has exactly two entries
fn resolve_team(resolver: &RatingResolver<'_>, input: &MatchTeamInput, cache: &BatchCache) -> Team {
    let player = |slot: usize| {
        let entry = &input.players[slot];
        Player::new(entry.id, resolver.resolve(entry, cache))
    };

    Team {
        players: [player(0), player(1)],
        score: input.score,
    }
}
