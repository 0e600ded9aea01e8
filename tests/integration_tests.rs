//! Integration tests for the team-mmr rating service
//!
//! These tests drive the service operations end to end, including:
//! - Rating resolution on the way into the engine
//! - Batch carry-forward and fail-fast behavior
//! - Write-through persistence to the rating store
//! - Team generation

mod fixtures;

use fixtures::{
    new_players_match, started_state, team, RecordingEngine, RecordingRatingStore,
};
use std::sync::Arc;
use team_mmr::error::{MmrError, ValidationError};
use team_mmr::types::{MatchRequest, PlayerRatingInput, Rating};

fn default_rating() -> Rating {
    Rating::new(25.0, 5.0)
}

#[tokio::test]
async fn test_carry_forward_within_batch() {
    let engine = Arc::new(RecordingEngine::new());
    let store = Arc::new(RecordingRatingStore::new());
    let state = started_state(engine.clone(), store.clone()).await;

    // Player 1 plays both matches; the explicit rating in match 2 must lose
    // to the rating produced by match 1.
    let first = new_players_match([1, 2, 3, 4], 10, 5);
    let second = MatchRequest::new(
        team(
            10,
            [
                PlayerRatingInput::with_rating(1, 40.0, 2.0),
                PlayerRatingInput::new(5),
            ],
        ),
        team(3, [PlayerRatingInput::new(6), PlayerRatingInput::new(7)]),
    );

    let results = state
        .mmr_service()
        .submit_batch(&[first, second])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    let after_first = results[0].player(1).unwrap().rating();
    let inputs = engine.rated_inputs();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[1].0[0], after_first);

    // Player 5 is new to the batch and starts from the default rating
    assert_eq!(inputs[1].0[1], default_rating());

    // The batch is persisted as one ordered write
    let writes = store.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0], results);
}

#[tokio::test]
async fn test_previous_season_rating_is_dampened() {
    let engine = Arc::new(RecordingEngine::new());
    let state = started_state(engine.clone(), Arc::new(RecordingRatingStore::new())).await;

    let request = MatchRequest::new(
        team(
            10,
            [
                PlayerRatingInput::previous_season(1, 19.0, 1.5),
                PlayerRatingInput::previous_season(2, 31.0, 1.5),
            ],
        ),
        team(
            8,
            [
                PlayerRatingInput::with_rating(3, 30.0, 4.0),
                PlayerRatingInput::new(4),
            ],
        ),
    );

    state
        .mmr_service()
        .submit_single_match(&request)
        .await
        .unwrap();

    let (team1, team2) = engine.rated_inputs()[0];
    assert_eq!(team1[0], Rating::new(23.0, 5.0));
    assert_eq!(team1[1], Rating::new(27.0, 5.0));
    assert_eq!(team2[0], Rating::new(30.0, 4.0));
    assert_eq!(team2[1], default_rating());
}

#[tokio::test]
async fn test_single_match_moves_winners_up_and_losers_down() {
    let state = fixtures::default_state().await;

    let result = state
        .mmr_service()
        .submit_single_match(&new_players_match([1, 2, 3, 4], 10, 7))
        .await
        .unwrap();

    for winner in &result.team1.players {
        assert!(winner.mu >= 25.0);
        assert!(winner.sigma <= 5.0);
    }
    for loser in &result.team2.players {
        assert!(loser.mu <= 25.0);
    }
    assert_eq!(result.team1.score, 10);
    assert_eq!(result.team2.score, 7);

    // Ratings reach the store
    let stored = state
        .mmr_service()
        .store()
        .get_rating(1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rating, result.player(1).unwrap().rating());
}

#[tokio::test]
async fn test_batch_of_one_matches_single_submission() {
    let request = new_players_match([1, 2, 3, 4], 5, 10);

    let single = fixtures::default_state()
        .await
        .mmr_service()
        .submit_single_match(&request)
        .await
        .unwrap();
    let batch = fixtures::default_state()
        .await
        .mmr_service()
        .submit_batch(std::slice::from_ref(&request))
        .await
        .unwrap();

    assert_eq!(batch, vec![single]);
}

#[tokio::test]
async fn test_duplicate_in_batch_fails_whole_batch() {
    let engine = Arc::new(RecordingEngine::new());
    let store = Arc::new(RecordingRatingStore::new());
    let state = started_state(engine.clone(), store.clone()).await;

    let err = state
        .mmr_service()
        .submit_batch(&[
            new_players_match([1, 2, 3, 4], 10, 5),
            new_players_match([5, 6, 7, 5], 10, 5),
            new_players_match([8, 9, 10, 11], 10, 5),
        ])
        .await
        .unwrap_err();

    assert_eq!(err.batch_index(), Some(1));
    assert_eq!(
        err.validation(),
        Some(&ValidationError::DuplicatePlayerId(5))
    );

    // Only the first match reached the engine and nothing was stored
    assert_eq!(engine.rated_inputs().len(), 1);
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_malformed_team_rejected() {
    let state = fixtures::default_state().await;
    let mut request = new_players_match([1, 2, 3, 4], 10, 5);
    request.team2.players.push(PlayerRatingInput::new(5));

    let err = state
        .mmr_service()
        .submit_single_match(&request)
        .await
        .unwrap_err();

    assert_eq!(
        err.validation(),
        Some(&ValidationError::MalformedTeam { team: 2, got: 3 })
    );
}

#[tokio::test]
async fn test_store_failure_surfaces() {
    let store = Arc::new(RecordingRatingStore::new());
    let state = started_state(Arc::new(RecordingEngine::new()), store.clone()).await;
    store.fail_writes(true);

    let err = state
        .mmr_service()
        .submit_single_match(&new_players_match([1, 2, 3, 4], 10, 5))
        .await
        .unwrap_err();

    assert!(matches!(err, MmrError::Storage { .. }));
    assert_eq!(state.metrics().rating().matches_rated_total.get(), 0);
}

#[tokio::test]
async fn test_balance_teams_end_to_end() {
    let store = Arc::new(RecordingRatingStore::new());
    let state = started_state(Arc::new(RecordingEngine::new()), store.clone()).await;

    let players = vec![
        PlayerRatingInput::with_rating(1, 20.0, 5.0),
        PlayerRatingInput::with_rating(2, 30.0, 5.0),
        PlayerRatingInput::with_rating(3, 25.0, 5.0),
        PlayerRatingInput::with_rating(4, 35.0, 5.0),
    ];

    let teams = state.mmr_service().balance_teams(&players).await.unwrap();

    assert!(teams.team1.contains(1) && teams.team1.contains(4));
    assert!(teams.team2.contains(2) && teams.team2.contains(3));
    assert!((0.0..=1.0).contains(&teams.win_probability));

    // Balancing never touches stored ratings
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_concurrent_submissions() {
    let state = fixtures::default_state().await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = state.mmr_service();
            tokio::spawn(async move {
                let base = i * 4;
                service
                    .submit_single_match(&new_players_match(
                        [base + 1, base + 2, base + 3, base + 4],
                        10,
                        5,
                    ))
                    .await
            })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        assert!(result.unwrap().is_ok());
    }

    let stored = state.mmr_service().store().player_count().await.unwrap();
    assert_eq!(stored, 32);
    assert_eq!(state.metrics().rating().matches_rated_total.get(), 8);
}
