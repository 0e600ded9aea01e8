//! Rating system integration using Weng-Lin (OpenSkill) algorithm
//!
//! This module provides the rating engine interface, its skillratings-backed
//! implementation, rating resolution, display values and the storage
//! collaborator for persisted ratings.

pub mod display;
pub mod engine;
pub mod resolver;
pub mod storage;
pub mod weng_lin;

// Re-export commonly used types
pub use display::DisplayConverter;
pub use engine::RatingEngine;
pub use resolver::{RatingResolver, RatingSource};
pub use storage::{InMemoryRatingStore, RatingEntry, RatingStore};
pub use weng_lin::{ExtendedWengLinConfig, WengLinRatingEngine};
