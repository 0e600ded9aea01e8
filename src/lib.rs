//! Team MMR - 2v2 rating orchestration and team balancing
//!
//! This crate rates 2v2 matches with the Weng-Lin (OpenSkill) model, alone or
//! in ordered batches that carry updated ratings forward, and splits four
//! players into the fairest two teams. A small Axum service exposes both.

pub mod api;
pub mod config;
pub mod error;
pub mod matching;
pub mod metrics;
pub mod rating;
pub mod service;
pub mod types;

// Re-export commonly used types and traits
pub use error::{MmrError, MmrResult, Result, ValidationError};
pub use types::*;

// Re-export key components
pub use matching::{BatchOrchestrator, MatchValidator, TeamBalancer};
pub use rating::{DisplayConverter, RatingEngine, RatingResolver, WengLinRatingEngine};
pub use service::MmrService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
