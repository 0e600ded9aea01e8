//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use team_mmr::config::AppConfig;
use team_mmr::error::{MmrError, MmrResult};
use team_mmr::rating::{
    ExtendedWengLinConfig, RatingEngine, RatingEntry, RatingStore, WengLinRatingEngine,
};
use team_mmr::service::AppState;
use team_mmr::types::{
    MatchRequest, MatchResult, MatchTeamInput, PlayerId, PlayerRatingInput, Rating, TeamRatings,
};

/// Weng-Lin engine that records every team passed to `rate`
pub struct RecordingEngine {
    inner: WengLinRatingEngine,
    rated: Arc<Mutex<Vec<(TeamRatings, TeamRatings)>>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            inner: WengLinRatingEngine::new(ExtendedWengLinConfig::default())
                .expect("default engine config is valid"),
            rated: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Teams as they entered the engine, in call order
    pub fn rated_inputs(&self) -> Vec<(TeamRatings, TeamRatings)> {
        self.rated
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl RatingEngine for RecordingEngine {
    fn default_rating(&self) -> Rating {
        self.inner.default_rating()
    }

    fn rate(
        &self,
        team_a: TeamRatings,
        score_a: i32,
        team_b: TeamRatings,
        score_b: i32,
    ) -> MmrResult<(TeamRatings, TeamRatings)> {
        if let Ok(mut calls) = self.rated.lock() {
            calls.push((team_a, team_b));
        }
        self.inner.rate(team_a, score_a, team_b, score_b)
    }

    fn predict_win(&self, team_a: &TeamRatings, team_b: &TeamRatings) -> MmrResult<f64> {
        self.inner.predict_win(team_a, team_b)
    }
}

/// Rating store that captures every write and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingRatingStore {
    writes: Arc<Mutex<Vec<Vec<MatchResult>>>>,
    open: AtomicBool,
    fail_writes: AtomicBool,
}

impl RecordingRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `store_results` call, in order
    pub fn writes(&self) -> Vec<Vec<MatchResult>> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RatingStore for RecordingRatingStore {
    async fn open(&self) -> MmrResult<()> {
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> MmrResult<()> {
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn get_rating(&self, player_id: PlayerId) -> MmrResult<Option<RatingEntry>> {
        let latest = self
            .writes()
            .iter()
            .flatten()
            .filter_map(|result| result.player(player_id))
            .last()
            .map(|player| RatingEntry::new(player_id, player.rating()));
        Ok(latest)
    }

    async fn store_results(&self, results: &[MatchResult]) -> MmrResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MmrError::Storage {
                message: "write rejected".to_string(),
            });
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(results.to_vec());
        }
        Ok(())
    }

    async fn player_count(&self) -> MmrResult<usize> {
        let mut ids: Vec<PlayerId> = self
            .writes()
            .iter()
            .flatten()
            .flat_map(|result| result.players().map(|p| p.id).collect::<Vec<_>>())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids.len())
    }
}

/// A started application around the given collaborators
pub async fn started_state(
    engine: Arc<dyn RatingEngine>,
    store: Arc<dyn RatingStore>,
) -> Arc<AppState> {
    let state = AppState::with_components(AppConfig::default(), engine, store)
        .expect("application state builds");
    state.start().await.expect("application starts");
    Arc::new(state)
}

/// A started application with the default engine and in-memory store
pub async fn default_state() -> Arc<AppState> {
    let state = AppState::new(AppConfig::default())
        .await
        .expect("application state builds");
    state.start().await.expect("application starts");
    Arc::new(state)
}

pub fn team(score: i32, players: [PlayerRatingInput; 2]) -> MatchTeamInput {
    MatchTeamInput::new(score, players.to_vec())
}

/// A match between new players identified by `ids`
pub fn new_players_match(ids: [PlayerId; 4], score1: i32, score2: i32) -> MatchRequest {
    let [a, b, c, d] = ids.map(PlayerRatingInput::new);
    MatchRequest::new(team(score1, [a, b]), team(score2, [c, d]))
}
