mod common;

use common::{FakeCoach, FakeDb, FakeRecommender};
use eco_tracker_core::actions::{get_coach_response, get_recommendations, log_action};
use eco_tracker_core::{ActionError, DetailFields, UserProgress};
use uuid::Uuid;

#[tokio::test]
async fn recommendations_see_totals_and_recent_actions() {
    let user_id = Uuid::new_v4();
    let db = FakeDb::with_user(user_id, UserProgress::default()).await;
    for distance in [5.0, 10.0, 20.0] {
        let fields = DetailFields {
            mode: Some("Car".into()),
            distance: Some(distance),
            ..Default::default()
        };
        log_action(&db, user_id, "travel", fields).await.unwrap();
    }
    let recommender = FakeRecommender::default();

    let recommendations = get_recommendations(&db, &recommender, user_id, 2)
        .await
        .unwrap();

    assert_eq!(recommendations.len(), 3);
    let request = recommender.last_request.lock().await.clone().unwrap();
    assert_eq!(request.user_id, user_id);
    assert_eq!(request.actions.len(), 2);
    assert!((request.total_co2e - 7.0).abs() < 1e-9);
    assert_eq!(request.points, 15 + 20 + 30);
}

#[tokio::test]
async fn recommendations_for_unknown_user() {
    let db = FakeDb::default();
    let recommender = FakeRecommender::default();

    let err = get_recommendations(&db, &recommender, Uuid::new_v4(), 10)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "User not found.");
    assert!(recommender.last_request.lock().await.is_none());
}

#[tokio::test]
async fn recommender_failure_is_reported_not_retried() {
    let user_id = Uuid::new_v4();
    let db = FakeDb::with_user(user_id, UserProgress::default()).await;
    let recommender = FakeRecommender {
        fail: true,
        ..Default::default()
    };

    let err = get_recommendations(&db, &recommender, user_id, 10)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Recommendation(_)));
    assert_eq!(
        err.to_string(),
        "Failed to get personalized recommendations: Service unavailable: model timed out"
    );
}

#[tokio::test]
async fn coach_answers_trimmed_query() {
    let coach = FakeCoach::default();
    let response = get_coach_response(&coach, "  composting?  ").await.unwrap();
    assert_eq!(response, "Great question about composting?!");
}

#[tokio::test]
async fn coach_rejects_blank_query() {
    let coach = FakeCoach::default();
    let err = get_coach_response(&coach, "   ").await.unwrap_err();
    assert_eq!(err.to_string(), "Query cannot be empty.");
}

#[tokio::test]
async fn coach_failure_has_friendly_message() {
    let coach = FakeCoach { fail: true };
    let err = get_coach_response(&coach, "how do I save energy?")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to get a response from the Eco-Coach. Please try again."
    );
}
