//! Rating service operations
//!
//! [`MmrService`] wraps the rating core with the concerns of a running
//! service: request logging, metrics and write-through persistence of every
//! successfully rated submission.

use crate::error::{MmrError, MmrResult, ValidationError};
use crate::matching::balancer::{balance_distance, TeamBalancer};
use crate::matching::batch::{BatchCache, BatchOrchestrator};
use crate::matching::validator::{MatchValidator, MATCH_PLAYERS};
use crate::metrics::MetricsCollector;
use crate::rating::display::DisplayConverter;
use crate::rating::engine::RatingEngine;
use crate::rating::resolver::RatingResolver;
use crate::rating::storage::RatingStore;
use crate::types::{BalancedTeams, MatchRequest, MatchResult, Player, PlayerRatingInput};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Operation labels used for logs and metrics
pub mod operation {
    pub const SUBMIT_SINGLE: &str = "submit_single_match";
    pub const SUBMIT_BATCH: &str = "submit_batch";
    pub const BALANCE_TEAMS: &str = "balance_teams";
}

/// The exposed rating operations
#[derive(Clone)]
pub struct MmrService {
    orchestrator: BatchOrchestrator,
    balancer: TeamBalancer,
    store: Arc<dyn RatingStore>,
    metrics: Arc<MetricsCollector>,
}

impl MmrService {
    pub fn new(
        engine: Arc<dyn RatingEngine>,
        display: DisplayConverter,
        store: Arc<dyn RatingStore>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            orchestrator: BatchOrchestrator::new(engine.clone(), display),
            balancer: TeamBalancer::new(engine),
            store,
            metrics,
        }
    }

    pub fn engine(&self) -> &dyn RatingEngine {
        self.orchestrator.engine()
    }

    pub fn store(&self) -> Arc<dyn RatingStore> {
        self.store.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Rate a single match and persist the updated ratings
    pub async fn submit_single_match(&self, request: &MatchRequest) -> MmrResult<MatchResult> {
        let timer = self.metrics.start_timer();

        let result = self.rate_single(request).await;

        if let Ok(result) = &result {
            info!(
                "Rated match {:?} {} - {} {:?}",
                result.team1.players.iter().map(|p| p.id).collect::<Vec<_>>(),
                result.team1.score,
                result.team2.score,
                result.team2.players.iter().map(|p| p.id).collect::<Vec<_>>(),
            );
            self.metrics.record_matches_rated(1);
        }

        self.observe(operation::SUBMIT_SINGLE, timer.stop(), &result);
        result
    }

    /// Rate matches in submission order and persist the whole batch
    ///
    /// Nothing is persisted when any match in the batch fails.
    pub async fn submit_batch(&self, requests: &[MatchRequest]) -> MmrResult<Vec<MatchResult>> {
        let timer = self.metrics.start_timer();
        self.metrics.record_batch_size(requests.len());

        let results = self.rate_batch(requests).await;

        if let Ok(results) = &results {
            info!("Rated batch of {} matches", results.len());
            self.metrics.record_matches_rated(results.len());
        }

        self.observe(operation::SUBMIT_BATCH, timer.stop(), &results);
        results
    }

    /// Split four players into the fairest two teams
    ///
    /// Players resolve exactly as they would at the start of a batch.
    pub async fn balance_teams(&self, players: &[PlayerRatingInput]) -> MmrResult<BalancedTeams> {
        let timer = self.metrics.start_timer();
        let teams = self.balance(players);

        if let Ok(teams) = &teams {
            debug!(
                "Generated teams {:?} vs {:?} (win probability {:.4})",
                teams.team1.players.map(|p| p.id),
                teams.team2.players.map(|p| p.id),
                teams.win_probability
            );
            self.metrics
                .record_balance(balance_distance(teams.win_probability));
        }

        self.observe(operation::BALANCE_TEAMS, timer.stop(), &teams);
        teams
    }

    async fn rate_single(&self, request: &MatchRequest) -> MmrResult<MatchResult> {
        let result = self.orchestrator.submit_single(request)?;
        self.persist(std::slice::from_ref(&result)).await?;
        Ok(result)
    }

    async fn rate_batch(&self, requests: &[MatchRequest]) -> MmrResult<Vec<MatchResult>> {
        let results = self.orchestrator.process_batch(requests)?;
        self.persist(&results).await?;
        Ok(results)
    }

    fn balance(&self, players: &[PlayerRatingInput]) -> MmrResult<BalancedTeams> {
        MatchValidator::check_unique(players.iter().map(|p| p.id))?;

        let resolver = RatingResolver::new(self.engine());
        let cache = BatchCache::default();
        let resolved: Vec<Player> = players
            .iter()
            .map(|input| Player::new(input.id, resolver.resolve(input, &cache)))
            .collect();

        let resolved: [Player; MATCH_PLAYERS] = resolved.try_into().map_err(|rest: Vec<Player>| {
            ValidationError::WrongPlayerCount {
                expected: MATCH_PLAYERS,
                got: rest.len(),
            }
        })?;

        self.balancer.balance(&resolved)
    }

    async fn persist(&self, results: &[MatchResult]) -> MmrResult<()> {
        self.store.store_results(results).await?;
        let stored = self.store.player_count().await?;
        self.metrics.set_stored_players(stored);
        Ok(())
    }

    fn observe<T>(&self, operation: &str, elapsed: Duration, outcome: &MmrResult<T>) {
        self.metrics
            .record_request(operation, outcome.is_ok(), elapsed);

        let Err(e) = outcome else {
            return;
        };

        match e.validation() {
            Some(validation) => {
                warn!("Rejected {} request: {}", operation, e);
                self.metrics.record_validation_error(validation.kind());
            }
            None => {
                error!("{} failed: {}", operation, e);
                if matches!(root_cause(e), MmrError::InternalRating { .. }) {
                    self.metrics.record_internal_error();
                }
            }
        }
    }
}

fn root_cause(error: &MmrError) -> &MmrError {
    match error {
        MmrError::Batch { source, .. } => root_cause(source),
        other => other,
    }
}
