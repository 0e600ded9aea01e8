//! Rating storage interface and implementations
//!
//! Durable player ratings live behind the [`RatingStore`] collaborator. The
//! rating core never reads from it; the service writes every successfully
//! rated submission through to it. Stores have an explicit open/close
//! lifecycle tied to service start and stop.

use crate::error::{MmrError, MmrResult};
use crate::types::{MatchResult, PlayerId, Rating};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tracing::{debug, info};

/// Storage entry for a player's rating with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    pub player_id: PlayerId,
    pub rating: Rating,
    pub games_played: u64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RatingEntry {
    /// Create a new rating entry for a player seen for the first time
    pub fn new(player_id: PlayerId, rating: Rating) -> Self {
        let now = Utc::now();
        Self {
            player_id,
            rating,
            games_played: 0,
            last_updated: now,
            created_at: now,
        }
    }

    /// Update the rating and increment games played
    pub fn update_rating(&mut self, new_rating: Rating) {
        self.rating = new_rating;
        self.games_played += 1;
        self.last_updated = Utc::now();
    }
}

/// Persistence collaborator for player ratings
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Acquire the underlying resources
    async fn open(&self) -> MmrResult<()>;

    /// Release the underlying resources; further calls fail until reopened
    async fn close(&self) -> MmrResult<()>;

    fn is_open(&self) -> bool;

    /// Get a player's rating entry
    async fn get_rating(&self, player_id: PlayerId) -> MmrResult<Option<RatingEntry>>;

    /// Persist the updated ratings of rated matches, applied in order
    async fn store_results(&self, results: &[MatchResult]) -> MmrResult<()>;

    /// Get total number of rated players
    async fn player_count(&self) -> MmrResult<usize>;
}

/// In-memory rating storage implementation
#[derive(Debug)]
pub struct InMemoryRatingStore {
    ratings: RwLock<HashMap<PlayerId, RatingEntry>>,
    open: AtomicBool,
    max_entries: usize,
}

impl InMemoryRatingStore {
    /// Create a new in-memory rating store
    pub fn new(max_entries: usize) -> Self {
        Self {
            ratings: RwLock::new(HashMap::new()),
            open: AtomicBool::new(false),
            max_entries,
        }
    }

    fn ensure_open(&self) -> MmrResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(MmrError::Storage {
                message: "Rating store is closed".to_string(),
            })
        }
    }

    fn lock_poisoned() -> MmrError {
        MmrError::Storage {
            message: "Rating store lock poisoned".to_string(),
        }
    }

    /// Drop entries above capacity
    ///
    /// `written` maps each player of the current write to the position of its
    /// last update. Older entries go first, least recently updated first;
    /// players of the current write only go when the write alone exceeds
    /// capacity, earliest write first.
    fn evict_if_needed(
        &self,
        ratings: &mut HashMap<PlayerId, RatingEntry>,
        written: &HashMap<PlayerId, usize>,
    ) {
        if ratings.len() <= self.max_entries {
            return;
        }
        let to_remove = ratings.len() - self.max_entries;

        let mut untouched: Vec<_> = ratings
            .iter()
            .filter(|(id, _)| !written.contains_key(*id))
            .map(|(id, entry)| (*id, entry.last_updated))
            .collect();
        untouched.sort_by_key(|(_, updated)| *updated);

        let mut touched: Vec<_> = written.iter().map(|(id, seq)| (*id, *seq)).collect();
        touched.sort_by_key(|(_, seq)| *seq);

        let evicted: Vec<PlayerId> = untouched
            .into_iter()
            .map(|(id, _)| id)
            .chain(touched.into_iter().map(|(id, _)| id))
            .take(to_remove)
            .collect();

        for player_id in &evicted {
            ratings.remove(player_id);
        }
        debug!("Evicted {} rating entries", evicted.len());
    }
}

impl Default for InMemoryRatingStore {
    fn default() -> Self {
        Self::new(10000) // Default to 10,000 max entries
    }
}

#[async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn open(&self) -> MmrResult<()> {
        self.open.store(true, Ordering::SeqCst);
        info!("In-memory rating store opened (capacity {})", self.max_entries);
        Ok(())
    }

    async fn close(&self) -> MmrResult<()> {
        self.open.store(false, Ordering::SeqCst);
        info!("In-memory rating store closed");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn get_rating(&self, player_id: PlayerId) -> MmrResult<Option<RatingEntry>> {
        self.ensure_open()?;
        let ratings = self.ratings.read().map_err(|_| Self::lock_poisoned())?;

        Ok(ratings.get(&player_id).cloned())
    }

    async fn store_results(&self, results: &[MatchResult]) -> MmrResult<()> {
        self.ensure_open()?;
        let mut ratings = self.ratings.write().map_err(|_| Self::lock_poisoned())?;

        let mut written = HashMap::new();
        for (seq, player) in results.iter().flat_map(|r| r.players()).enumerate() {
            ratings
                .entry(player.id)
                .or_insert_with(|| RatingEntry::new(player.id, player.rating()))
                .update_rating(player.rating());
            written.insert(player.id, seq);
        }

        self.evict_if_needed(&mut ratings, &written);
        Ok(())
    }

    async fn player_count(&self) -> MmrResult<usize> {
        self.ensure_open()?;
        let ratings = self.ratings.read().map_err(|_| Self::lock_poisoned())?;

        Ok(ratings.len())
    }
}
