//! Weng-Lin (OpenSkill) rating engine
//!
//! This module provides the concrete rating engine used by the service,
//! backed by the two-team Weng-Lin functions of the skillratings crate.

use crate::error::{MmrError, MmrResult};
use crate::rating::engine::{ensure_well_formed, RatingEngine};
use crate::types::{Rating, TeamRatings};
use serde::{Deserialize, Serialize};
use skillratings::weng_lin::{
    expected_score_two_teams, weng_lin_two_teams, WengLinConfig, WengLinRating,
};
use skillratings::Outcomes;
use std::cmp::Ordering;
use tracing::trace;

/// Extended configuration for the Weng-Lin rating system
/// This wraps the skillratings WengLinConfig with the starting rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedWengLinConfig {
    /// Core Weng-Lin parameters
    pub weng_lin_config: WengLinConfig,
    /// Initial mean for new players
    pub initial_mu: f64,
    /// Initial uncertainty for new players
    pub initial_sigma: f64,
}

impl Default for ExtendedWengLinConfig {
    fn default() -> Self {
        Self {
            weng_lin_config: WengLinConfig {
                beta: 25.0 / 6.0,
                uncertainty_tolerance: 0.000_001,
            },
            initial_mu: 25.0,
            initial_sigma: 5.0,
        }
    }
}

impl ExtendedWengLinConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> MmrResult<()> {
        if !(self.weng_lin_config.beta > 0.0) {
            return Err(MmrError::ConfigurationError {
                message: "Beta must be positive".to_string(),
            });
        }

        if self.weng_lin_config.uncertainty_tolerance < 0.0 {
            return Err(MmrError::ConfigurationError {
                message: "Uncertainty tolerance must be non-negative".to_string(),
            });
        }

        if !self.initial_mu.is_finite() {
            return Err(MmrError::ConfigurationError {
                message: "Initial mu must be finite".to_string(),
            });
        }

        if !(self.initial_sigma > 0.0) || !self.initial_sigma.is_finite() {
            return Err(MmrError::ConfigurationError {
                message: "Initial sigma must be positive".to_string(),
            });
        }

        Ok(())
    }
}

/// Rating engine backed by the Weng-Lin Bradley-Terry model
#[derive(Debug, Clone)]
pub struct WengLinRatingEngine {
    config: ExtendedWengLinConfig,
}

impl WengLinRatingEngine {
    /// Create a new Weng-Lin rating engine
    pub fn new(config: ExtendedWengLinConfig) -> MmrResult<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtendedWengLinConfig {
        &self.config
    }
}

fn to_weng_lin(team: &TeamRatings) -> [WengLinRating; 2] {
    [team[0].into(), team[1].into()]
}

fn into_team(ratings: Vec<WengLinRating>) -> MmrResult<TeamRatings> {
    match ratings.as_slice() {
        [first, second] => Ok([(*first).into(), (*second).into()]),
        other => Err(MmrError::InternalRating {
            reason: format!("expected 2 updated ratings per team, got {}", other.len()),
        }),
    }
}

impl RatingEngine for WengLinRatingEngine {
    fn default_rating(&self) -> Rating {
        Rating::new(self.config.initial_mu, self.config.initial_sigma)
    }

    fn rate(
        &self,
        team_a: TeamRatings,
        score_a: i32,
        team_b: TeamRatings,
        score_b: i32,
    ) -> MmrResult<(TeamRatings, TeamRatings)> {
        ensure_well_formed(&team_a)?;
        ensure_well_formed(&team_b)?;

        let outcome = match score_a.cmp(&score_b) {
            Ordering::Greater => Outcomes::WIN,
            Ordering::Less => Outcomes::LOSS,
            Ordering::Equal => Outcomes::DRAW,
        };
        trace!("Rating match {} - {} as {:?}", score_a, score_b, outcome);

        let (new_a, new_b) = weng_lin_two_teams(
            &to_weng_lin(&team_a),
            &to_weng_lin(&team_b),
            &outcome,
            &self.config.weng_lin_config,
        );

        let new_a = into_team(new_a)?;
        let new_b = into_team(new_b)?;
        ensure_well_formed(&new_a)?;
        ensure_well_formed(&new_b)?;

        Ok((new_a, new_b))
    }

    fn predict_win(&self, team_a: &TeamRatings, team_b: &TeamRatings) -> MmrResult<f64> {
        ensure_well_formed(team_a)?;
        ensure_well_formed(team_b)?;

        let (win_a, _win_b) = expected_score_two_teams(
            &to_weng_lin(team_a),
            &to_weng_lin(team_b),
            &self.config.weng_lin_config,
        );

        if !win_a.is_finite() {
            return Err(MmrError::InternalRating {
                reason: "win probability is not a number".to_string(),
            });
        }

        Ok(win_a.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> WengLinRatingEngine {
        WengLinRatingEngine::new(ExtendedWengLinConfig::default()).unwrap()
    }

    #[test]
    fn test_extended_weng_lin_config_default() {
        let config = ExtendedWengLinConfig::default();
        assert_eq!(config.initial_mu, 25.0);
        assert_eq!(config.initial_sigma, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extended_weng_lin_config_validation() {
        let mut config = ExtendedWengLinConfig::default();
        config.weng_lin_config.beta = -1.0;
        assert!(config.validate().is_err());

        config = ExtendedWengLinConfig::default();
        config.weng_lin_config.uncertainty_tolerance = -1.0;
        assert!(config.validate().is_err());

        config = ExtendedWengLinConfig::default();
        config.initial_sigma = 0.0;
        assert!(config.validate().is_err());

        config = ExtendedWengLinConfig::default();
        config.initial_mu = f64::NAN;
        assert!(WengLinRatingEngine::new(config).is_err());
    }

    #[test]
    fn test_default_rating_comes_from_config() {
        let config = ExtendedWengLinConfig {
            initial_mu: 30.0,
            initial_sigma: 5.0,
            ..ExtendedWengLinConfig::default()
        };
        let engine = WengLinRatingEngine::new(config).unwrap();
        assert_eq!(engine.default_rating(), Rating::new(30.0, 5.0));
    }

    #[test]
    fn test_winners_gain_losers_drop() {
        let engine = engine();
        let default = engine.default_rating();

        let (team_a, team_b) = engine
            .rate([default; 2], 100, [default; 2], 200)
            .unwrap();

        for loser in team_a {
            assert!(loser.mu < default.mu);
            assert!(loser.sigma < default.sigma);
        }
        for winner in team_b {
            assert!(winner.mu > default.mu);
            assert!(winner.sigma < default.sigma);
        }
        // Symmetric start gives a symmetric result
        assert!((team_a[0].mu - default.mu + (team_b[0].mu - default.mu)).abs() < 1e-9);
    }

    #[test]
    fn test_draw_between_equals_keeps_means() {
        let engine = engine();
        let default = engine.default_rating();

        let (team_a, team_b) = engine.rate([default; 2], 5, [default; 2], 5).unwrap();

        for rating in team_a.iter().chain(team_b.iter()) {
            assert!((rating.mu - default.mu).abs() < 1e-9);
        }
    }

    #[test]
    fn test_predict_win() {
        let engine = engine();
        let even = [Rating::new(25.0, 5.0); 2];
        let strong = [Rating::new(35.0, 5.0); 2];

        let p_even = engine.predict_win(&even, &even).unwrap();
        assert!((p_even - 0.5).abs() < 1e-9);

        let p_strong = engine.predict_win(&strong, &even).unwrap();
        let p_weak = engine.predict_win(&even, &strong).unwrap();
        assert!(p_strong > 0.5);
        assert!(p_weak < 0.5);
        assert!((p_strong + p_weak - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_input_is_internal_error() {
        let engine = engine();
        let good = [Rating::new(25.0, 5.0); 2];
        let bad = [Rating::new(25.0, 5.0), Rating::new(f64::NAN, 5.0)];

        let err = engine.rate(good, 1, bad, 0).unwrap_err();
        assert!(matches!(err, MmrError::InternalRating { .. }));

        let err = engine.predict_win(&bad, &good).unwrap_err();
        assert!(matches!(err, MmrError::InternalRating { .. }));
    }
}
