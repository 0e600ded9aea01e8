//! Common types used throughout the rating service

use serde::{Deserialize, Serialize};
use skillratings::weng_lin::WengLinRating;

/// Caller-supplied identifier for a player
pub type PlayerId = i64;

/// Gaussian skill estimate for a player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub mu: f64,
    pub sigma: f64,
}

impl Rating {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }

    /// Both components are finite and sigma is strictly positive
    pub fn is_well_formed(&self) -> bool {
        self.mu.is_finite() && self.sigma.is_finite() && self.sigma > 0.0
    }
}

impl From<WengLinRating> for Rating {
    fn from(rating: WengLinRating) -> Self {
        Self {
            mu: rating.rating,
            sigma: rating.uncertainty,
        }
    }
}

impl From<Rating> for WengLinRating {
    fn from(rating: Rating) -> Self {
        Self {
            rating: rating.mu,
            uncertainty: rating.sigma,
        }
    }
}

/// Ratings of the two members of a team, in request order
pub type TeamRatings = [Rating; 2];

/// A player with a resolved rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(flatten)]
    pub rating: Rating,
}

impl Player {
    pub fn new(id: PlayerId, rating: Rating) -> Self {
        Self { id, rating }
    }
}

/// Two players and the score their side achieved
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub players: [Player; 2],
    pub score: i32,
}

impl Team {
    pub fn ratings(&self) -> TeamRatings {
        [self.players[0].rating, self.players[1].rating]
    }
}

/// Rating information supplied by the caller for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRatingInput {
    pub id: PlayerId,
    #[serde(default)]
    pub mu: Option<f64>,
    #[serde(default)]
    pub sigma: Option<f64>,
    #[serde(default)]
    pub is_previous_season_rating: Option<bool>,
}

impl PlayerRatingInput {
    /// A player with no rating history
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            mu: None,
            sigma: None,
            is_previous_season_rating: None,
        }
    }

    /// A player with a current-season rating
    pub fn with_rating(id: PlayerId, mu: f64, sigma: f64) -> Self {
        Self {
            id,
            mu: Some(mu),
            sigma: Some(sigma),
            is_previous_season_rating: Some(false),
        }
    }

    /// A player carrying a rating over from the previous season
    pub fn previous_season(id: PlayerId, mu: f64, sigma: f64) -> Self {
        Self {
            id,
            mu: Some(mu),
            sigma: Some(sigma),
            is_previous_season_rating: Some(true),
        }
    }
}

/// One side of a submitted match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTeamInput {
    pub score: i32,
    pub players: Vec<PlayerRatingInput>,
}

impl MatchTeamInput {
    pub fn new(score: i32, players: Vec<PlayerRatingInput>) -> Self {
        Self { score, players }
    }
}

/// A finished 2v2 match to be rated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub team1: MatchTeamInput,
    pub team2: MatchTeamInput,
}

impl MatchRequest {
    pub fn new(team1: MatchTeamInput, team2: MatchTeamInput) -> Self {
        Self { team1, team2 }
    }

    /// All player entries, team 1 first
    pub fn players(&self) -> impl Iterator<Item = &PlayerRatingInput> {
        self.team1.players.iter().chain(self.team2.players.iter())
    }
}

/// Updated rating of a player after a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub id: PlayerId,
    pub mu: f64,
    pub sigma: f64,
    /// Public display value derived from the updated rating
    pub mmr: i64,
}

impl PlayerResult {
    pub fn rating(&self) -> Rating {
        Rating::new(self.mu, self.sigma)
    }
}

/// One side of a rated match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    pub score: i32,
    pub players: Vec<PlayerResult>,
}

/// Outcome of rating a single match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub team1: TeamResult,
    pub team2: TeamResult,
}

impl MatchResult {
    /// All updated players, team 1 first
    pub fn players(&self) -> impl Iterator<Item = &PlayerResult> {
        self.team1.players.iter().chain(self.team2.players.iter())
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerResult> {
        self.players().find(|p| p.id == id)
    }
}

/// Request to split four players into two fair teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateTeamsRequest {
    pub players: Vec<PlayerRatingInput>,
}

/// Players on one side of a generated pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLineup {
    pub players: [Player; 2],
}

impl TeamLineup {
    pub fn ratings(&self) -> TeamRatings {
        [self.players[0].rating, self.players[1].rating]
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }
}

/// The fairest split of four players found by the balancer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancedTeams {
    pub team1: TeamLineup,
    pub team2: TeamLineup,
    /// Probability that team1 beats team2
    pub win_probability: f64,
}
