//! Balanced team generation
//!
//! Four players can be split into two teams of two in exactly three ways.
//! The balancer asks the rating engine for the win probability of each split
//! and keeps the one closest to a coin flip.

use crate::error::MmrResult;
use crate::rating::engine::RatingEngine;
use crate::types::{BalancedTeams, Player, TeamLineup};
use std::sync::Arc;
use tracing::debug;

/// Slot indices of the three distinct 2v2 splits, in evaluation order
const PAIRINGS: [([usize; 2], [usize; 2]); 3] = [
    ([0, 1], [2, 3]), // 12 | 34
    ([0, 2], [1, 3]), // 13 | 24
    ([0, 3], [1, 2]), // 14 | 23
];

/// One way of splitting four players into two teams
#[derive(Debug, Clone, PartialEq)]
pub struct PairingCandidate {
    pub team1: TeamLineup,
    pub team2: TeamLineup,
}

impl PairingCandidate {
    /// All three splits of `players`, in the fixed evaluation order
    pub fn enumerate(players: &[Player; 4]) -> [PairingCandidate; 3] {
        PAIRINGS.map(|(a, b)| PairingCandidate {
            team1: TeamLineup {
                players: [players[a[0]], players[a[1]]],
            },
            team2: TeamLineup {
                players: [players[b[0]], players[b[1]]],
            },
        })
    }
}

/// Distance of a win probability from an even match
pub fn balance_distance(win_probability: f64) -> f64 {
    (win_probability - 0.5).abs()
}

/// Picks the fairest 2v2 split of four players
#[derive(Clone)]
pub struct TeamBalancer {
    engine: Arc<dyn RatingEngine>,
}

impl TeamBalancer {
    pub fn new(engine: Arc<dyn RatingEngine>) -> Self {
        Self { engine }
    }

    /// Find the split whose predicted outcome is closest to 50/50
    ///
    /// Ties keep the split evaluated first. Ratings are returned untouched.
    pub fn balance(&self, players: &[Player; 4]) -> MmrResult<BalancedTeams> {
        let candidates = PairingCandidate::enumerate(players);
        let mut probabilities = [0.5; 3];
        let mut best = 0;

        for (index, candidate) in candidates.iter().enumerate() {
            let p = self
                .engine
                .predict_win(&candidate.team1.ratings(), &candidate.team2.ratings())?;
            debug!(
                "Pairing {:?} vs {:?}: win probability {:.4}",
                candidate.team1.players.map(|p| p.id),
                candidate.team2.players.map(|p| p.id),
                p
            );

            probabilities[index] = p;
            if balance_distance(p) < balance_distance(probabilities[best]) {
                best = index;
            }
        }

        let chosen = &candidates[best];
        Ok(BalancedTeams {
            team1: chosen.team1.clone(),
            team2: chosen.team2.clone(),
            win_probability: probabilities[best],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MmrError;
    use crate::rating::engine::MockRatingEngine;
    use crate::rating::weng_lin::{ExtendedWengLinConfig, WengLinRatingEngine};
    use crate::types::{PlayerId, Rating, TeamRatings};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn players(mus: [f64; 4]) -> [Player; 4] {
        [
            Player::new(1, Rating::new(mus[0], 5.0)),
            Player::new(2, Rating::new(mus[1], 5.0)),
            Player::new(3, Rating::new(mus[2], 5.0)),
            Player::new(4, Rating::new(mus[3], 5.0)),
        ]
    }

    fn weng_lin() -> Arc<dyn RatingEngine> {
        Arc::new(WengLinRatingEngine::new(ExtendedWengLinConfig::default()).unwrap())
    }

    fn ids(team: &TeamLineup) -> Vec<PlayerId> {
        team.players.iter().map(|p| p.id).collect()
    }

    /// Engine whose prediction depends on who partners player 1
    fn scripted(probabilities: [f64; 3]) -> MockRatingEngine {
        let mut engine = MockRatingEngine::new();
        engine
            .expect_predict_win()
            .times(3)
            .returning(move |a: &TeamRatings, _| {
                // team1 always holds player 1 (mu 1.0) plus the partner's mu
                let partner = (a[0].mu + a[1].mu - 1.0).round() as usize;
                Ok(probabilities[partner - 2])
            });
        engine
    }

    #[test]
    fn test_enumeration_order() {
        let candidates = PairingCandidate::enumerate(&players([1.0, 2.0, 3.0, 4.0]));

        assert_eq!(ids(&candidates[0].team1), vec![1, 2]);
        assert_eq!(ids(&candidates[0].team2), vec![3, 4]);
        assert_eq!(ids(&candidates[1].team1), vec![1, 3]);
        assert_eq!(ids(&candidates[1].team2), vec![2, 4]);
        assert_eq!(ids(&candidates[2].team1), vec![1, 4]);
        assert_eq!(ids(&candidates[2].team2), vec![2, 3]);
    }

    #[test]
    fn test_picks_closest_to_even() {
        let balancer = TeamBalancer::new(Arc::new(scripted([0.9, 0.45, 0.3])));
        let teams = balancer.balance(&players([1.0, 2.0, 3.0, 4.0])).unwrap();

        assert_eq!(ids(&teams.team1), vec![1, 3]);
        assert_eq!(ids(&teams.team2), vec![2, 4]);
        assert_eq!(teams.win_probability, 0.45);
    }

    #[test]
    fn test_ties_keep_earliest() {
        let balancer = TeamBalancer::new(Arc::new(scripted([0.75, 0.25, 0.75])));
        let teams = balancer.balance(&players([1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(ids(&teams.team1), vec![1, 2]);

        let balancer = TeamBalancer::new(Arc::new(scripted([0.875, 0.625, 0.375])));
        let teams = balancer.balance(&players([1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(ids(&teams.team1), vec![1, 3]);
    }

    #[test]
    fn test_engine_error_propagates() {
        let mut engine = MockRatingEngine::new();
        engine.expect_predict_win().returning(|_, _| {
            Err(MmrError::InternalRating {
                reason: "bad sigma".to_string(),
            })
        });
        let balancer = TeamBalancer::new(Arc::new(engine));

        let err = balancer.balance(&players([1.0, 2.0, 3.0, 4.0])).unwrap_err();
        assert!(matches!(err, MmrError::InternalRating { .. }));
    }

    #[test]
    fn test_weng_lin_balances_strongest_with_weakest() {
        let balancer = TeamBalancer::new(weng_lin());

        // Ids 1..4 carry mus 20, 30, 25, 35
        let teams = balancer
            .balance(&players([20.0, 30.0, 25.0, 35.0]))
            .unwrap();

        assert_eq!(ids(&teams.team1), vec![1, 4]);
        assert_eq!(ids(&teams.team2), vec![2, 3]);
        assert!((teams.win_probability - 0.5).abs() < 0.15);
    }

    #[test]
    fn test_ratings_are_not_modified() {
        let balancer = TeamBalancer::new(weng_lin());
        let input = players([20.0, 30.0, 25.0, 35.0]);
        let teams = balancer.balance(&input).unwrap();

        for player in teams.team1.players.iter().chain(teams.team2.players.iter()) {
            assert!(input.contains(player));
        }
    }

    proptest! {
        #[test]
        fn prop_balance_is_optimal_and_partitions(
            mus in proptest::array::uniform4(0.0f64..50.0),
            sigmas in proptest::array::uniform4(0.5f64..10.0),
        ) {
            let engine = weng_lin();
            let balancer = TeamBalancer::new(engine.clone());
            let input: [Player; 4] = std::array::from_fn(|i| {
                Player::new(i as PlayerId + 1, Rating::new(mus[i], sigmas[i]))
            });

            let first = balancer.balance(&input).unwrap();
            let again = balancer.balance(&input).unwrap();
            prop_assert_eq!(&first, &again);

            let chosen = balance_distance(first.win_probability);
            for candidate in PairingCandidate::enumerate(&input) {
                let p = engine
                    .predict_win(&candidate.team1.ratings(), &candidate.team2.ratings())
                    .unwrap();
                prop_assert!(chosen <= balance_distance(p));
            }

            let mut seen = HashSet::new();
            for player in first.team1.players.iter().chain(first.team2.players.iter()) {
                prop_assert!(seen.insert(player.id));
            }
            prop_assert_eq!(seen, HashSet::from([1, 2, 3, 4]));
        }
    }
}
