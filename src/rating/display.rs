//! Public display value for ratings
//!
//! Clients see one comparable integer instead of a (mu, sigma) pair. The
//! value is a conservative estimate: the mean minus a fixed number of
//! standard deviations, scaled and rounded.

use crate::error::{MmrError, MmrResult};
use crate::types::Rating;
use serde::{Deserialize, Serialize};

/// Converts ratings into the integer shown to players
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConverter {
    /// Standard deviations subtracted from the mean
    pub sigma_multiplier: f64,
    /// Factor applied before rounding
    pub scale: f64,
}

impl Default for DisplayConverter {
    fn default() -> Self {
        Self {
            sigma_multiplier: 3.0,
            scale: 100.0,
        }
    }
}

impl DisplayConverter {
    pub fn new(sigma_multiplier: f64, scale: f64) -> MmrResult<Self> {
        let converter = Self {
            sigma_multiplier,
            scale,
        };
        converter.validate()?;
        Ok(converter)
    }

    pub fn validate(&self) -> MmrResult<()> {
        if !self.sigma_multiplier.is_finite() || self.sigma_multiplier < 0.0 {
            return Err(MmrError::ConfigurationError {
                message: "Display sigma multiplier must be finite and non-negative".to_string(),
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(MmrError::ConfigurationError {
                message: "Display scale must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Conservative skill estimate
    pub fn conservative_estimate(&self, rating: &Rating) -> f64 {
        rating.mu - self.sigma_multiplier * rating.sigma
    }

    /// Integer display value, non-decreasing in mu for a fixed sigma
    pub fn to_display_value(&self, rating: &Rating) -> i64 {
        // `as` saturates, so extreme ratings pin to the i64 range
        (self.conservative_estimate(rating) * self.scale).round() as i64
    }
}
