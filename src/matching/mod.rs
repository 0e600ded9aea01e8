//! Match validation, batch orchestration and team balancing
//!
//! This module holds the ordering and search logic that sits on top of the
//! rating engine.

pub mod balancer;
pub mod batch;
pub mod validator;

pub use balancer::{PairingCandidate, TeamBalancer};
pub use batch::{BatchCache, BatchOrchestrator};
pub use validator::MatchValidator;
