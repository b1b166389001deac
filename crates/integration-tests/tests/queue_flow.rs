//! End-to-end queue flow tests against real SQLite storage.
//!
//! Covers token numbering, queue positions, completion cycles and
//! location refresh, with a mocked travel estimator.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use spotqueue_core::application::{
    EngineConfig, IssueTokenRequest, QueueEngine, UpdateLocationRequest,
};
use spotqueue_core::domain::{TravelEstimate, User, WorkStatus};
use spotqueue_core::error::AppError;
use spotqueue_core::port::time_provider::{SystemTimeProvider, TimeProvider};
use spotqueue_core::port::travel_estimator::mocks::{FailingTravelEstimator, MockTravelEstimator};
use spotqueue_core::port::{
    CounterRepository, ServiceRepository, TokenRepository, TravelEstimator, UserRepository,
};
use spotqueue_infra_sqlite::{create_pool, run_migrations, SqliteRegistry, SqliteTokenRepository};

const FIXED_LAT: f64 = 24.8523464;
const FIXED_LON: f64 = 67.0078039;

struct Harness {
    engine: Arc<QueueEngine>,
    token_repo: Arc<SqliteTokenRepository>,
    registry: Arc<SqliteRegistry>,
    db_path: PathBuf,
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

async fn harness(name: &str, estimator: Arc<dyn TravelEstimator>) -> Harness {
    let db_path = std::env::temp_dir().join(format!("spotqueue_{}.db", name));
    let _ = std::fs::remove_file(&db_path);

    let pool = create_pool(db_path.to_str().unwrap()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let token_repo = Arc::new(SqliteTokenRepository::new(pool.clone()));
    let registry = Arc::new(SqliteRegistry::new(pool));

    let config = EngineConfig {
        handoff_delay: Duration::from_millis(10),
        ..Default::default()
    };

    let engine = Arc::new(QueueEngine::new(
        config,
        token_repo.clone(),
        token_repo.clone(),
        registry.clone(),
        registry.clone(),
        registry.clone(),
        estimator,
        Arc::new(SystemTimeProvider),
    ));

    Harness {
        engine,
        token_repo,
        registry,
        db_path,
    }
}

async fn seed_user(registry: &SqliteRegistry, name: &str, email: &str) -> User {
    UserRepository::insert(registry, name, email, "User")
        .await
        .unwrap()
}

async fn seed_service(registry: &SqliteRegistry, name: &str) {
    let service = ServiceRepository::insert(registry, name, "09:00", "17:00", 1)
        .await
        .unwrap();
    CounterRepository::insert(registry, 1, service.id)
        .await
        .unwrap();
}

fn issue_req(email: &str, service: &str) -> IssueTokenRequest {
    IssueTokenRequest {
        email: email.to_string(),
        service_name: service.to_string(),
        latitude: 24.8416198,
        longitude: 67.164574,
    }
}

#[tokio::test]
async fn test_token_numbers_increase_and_positions_count_history() {
    let h = harness(
        "numbering",
        Arc::new(MockTravelEstimator::fixed(5.0, 30)),
    )
    .await;

    seed_service(&h.registry, "Health_Checkup").await;
    let a = seed_user(&h.registry, "Ayesha", "ayesha@example.com").await;
    let b = seed_user(&h.registry, "Bilal", "bilal@example.com").await;
    seed_user(&h.registry, "Sana", "sana@example.com").await;

    let t1 = h
        .engine
        .issue_token(issue_req("ayesha@example.com", "Health_Checkup"))
        .await
        .unwrap();
    assert_eq!(t1.token_number, 1);
    assert_eq!(t1.queue_position, 1);

    let t2 = h
        .engine
        .issue_token(issue_req("bilal@example.com", "Health_Checkup"))
        .await
        .unwrap();
    assert_eq!(t2.token_number, 2);
    assert_eq!(t2.queue_position, 2);

    h.engine.complete_and_advance(a.id).await.unwrap();

    // Completed rows still count toward the historical position
    let t3 = h
        .engine
        .issue_token(issue_req("sana@example.com", "Health_Checkup"))
        .await
        .unwrap();
    assert_eq!(t3.token_number, 3);
    assert_eq!(t3.queue_position, 3);

    // The served user was renumbered to the front meanwhile
    let b_token = h.token_repo.find_latest_by_user(b.id).await.unwrap().unwrap();
    assert_eq!(b_token.queue_position, 1);
}

#[tokio::test]
async fn test_completion_promotes_remaining_user() {
    let h = harness("promote", Arc::new(MockTravelEstimator::fixed(5.0, 30))).await;

    seed_service(&h.registry, "Health_Checkup").await;
    let a = seed_user(&h.registry, "Ayesha", "a@example.com").await;
    let b = seed_user(&h.registry, "Bilal", "b@example.com").await;

    h.engine
        .issue_token(issue_req("a@example.com", "Health_Checkup"))
        .await
        .unwrap();
    h.engine
        .issue_token(issue_req("b@example.com", "Health_Checkup"))
        .await
        .unwrap();

    let outcome = h.engine.complete_and_advance(a.id).await.unwrap();
    assert_eq!(outcome.serving, Some(b.id));
    assert_eq!(outcome.message, format!("User {} is now being served.", b.id));

    let a_token = h.token_repo.find_latest_by_user(a.id).await.unwrap().unwrap();
    assert_eq!(a_token.work_status, WorkStatus::Completed);
    assert_eq!(a_token.queue_position, 0);

    let b_token = h.token_repo.find_latest_by_user(b.id).await.unwrap().unwrap();
    assert_eq!(b_token.work_status, WorkStatus::Pending);
    assert_eq!(b_token.queue_position, 1);
}

#[tokio::test]
async fn test_next_user_tie_breaks_on_duration() {
    // First estimate serves the user being completed; then the three
    // remaining users get distances 5, 3, 3 and durations 1, 4, 2.
    let estimator = Arc::new(MockTravelEstimator::scripted(vec![
        TravelEstimate::new(9.0, 9),
        TravelEstimate::new(5.0, 1),
        TravelEstimate::new(3.0, 4),
        TravelEstimate::new(3.0, 2),
    ]));
    let h = harness("tiebreak", estimator).await;

    seed_service(&h.registry, "Health_Checkup").await;
    let u1 = seed_user(&h.registry, "One", "one@example.com").await;
    let u2 = seed_user(&h.registry, "Two", "two@example.com").await;
    let u3 = seed_user(&h.registry, "Three", "three@example.com").await;
    let u4 = seed_user(&h.registry, "Four", "four@example.com").await;

    for email in [
        "one@example.com",
        "two@example.com",
        "three@example.com",
        "four@example.com",
    ] {
        h.engine
            .issue_token(issue_req(email, "Health_Checkup"))
            .await
            .unwrap();
    }

    let outcome = h.engine.complete_and_advance(u1.id).await.unwrap();

    // Minimum distance is shared by users 3 and 4; user 4 wins on duration
    assert_eq!(outcome.serving, Some(u4.id));

    let p4 = h.token_repo.find_latest_by_user(u4.id).await.unwrap().unwrap();
    let p2 = h.token_repo.find_latest_by_user(u2.id).await.unwrap().unwrap();
    let p3 = h.token_repo.find_latest_by_user(u3.id).await.unwrap().unwrap();
    assert_eq!(p4.queue_position, 1);
    assert_eq!(p2.queue_position, 2);
    assert_eq!(p3.queue_position, 3);
}

#[tokio::test]
async fn test_completing_last_user_empties_queue() {
    let h = harness("empty", Arc::new(MockTravelEstimator::fixed(5.0, 30))).await;

    seed_service(&h.registry, "Health_Checkup").await;
    let a = seed_user(&h.registry, "Ayesha", "a@example.com").await;

    h.engine
        .issue_token(issue_req("a@example.com", "Health_Checkup"))
        .await
        .unwrap();

    let outcome = h.engine.complete_and_advance(a.id).await.unwrap();
    assert_eq!(outcome.serving, None);
    assert!(outcome.message.contains("queue is empty"));
}

#[tokio::test]
async fn test_completing_twice_is_rejected() {
    let h = harness("twice", Arc::new(MockTravelEstimator::fixed(5.0, 30))).await;

    seed_service(&h.registry, "Health_Checkup").await;
    let a = seed_user(&h.registry, "Ayesha", "a@example.com").await;

    h.engine
        .issue_token(issue_req("a@example.com", "Health_Checkup"))
        .await
        .unwrap();

    h.engine.complete_and_advance(a.id).await.unwrap();

    let err = h.engine.complete_and_advance(a.id).await.unwrap_err();
    match err {
        AppError::NotFound(msg) => assert_eq!(msg, "User not found in the queue"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_location_update_flips_reach_out_inside_geofence() {
    // Issued far away, then updated from the service point itself
    let estimator = Arc::new(MockTravelEstimator::scripted(vec![
        TravelEstimate::new(5.0, 30),
        TravelEstimate::new(1.0, 1),
    ]));
    let h = harness("geofence", estimator).await;

    seed_service(&h.registry, "Health_Checkup").await;
    let a = seed_user(&h.registry, "Ayesha", "a@example.com").await;

    let issued = h
        .engine
        .issue_token(issue_req("a@example.com", "Health_Checkup"))
        .await
        .unwrap();
    assert!(!issued.reach_out);

    let updated = h
        .engine
        .update_location(UpdateLocationRequest {
            user_id: a.id,
            latitude: FIXED_LAT,
            longitude: FIXED_LON,
        })
        .await
        .unwrap();
    assert!(updated.reach_out);
    assert_eq!(updated.distance, 1.0);
    assert_eq!(updated.duration, 1);
}

#[tokio::test]
async fn test_location_update_rejects_invalid_coordinates() {
    let h = harness("badcoords", Arc::new(MockTravelEstimator::fixed(5.0, 30))).await;

    seed_service(&h.registry, "Health_Checkup").await;
    let a = seed_user(&h.registry, "Ayesha", "a@example.com").await;

    h.engine
        .issue_token(issue_req("a@example.com", "Health_Checkup"))
        .await
        .unwrap();

    let err = h
        .engine
        .update_location(UpdateLocationRequest {
            user_id: a.id,
            latitude: 95.0,
            longitude: 67.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));
}

#[tokio::test]
async fn test_issue_requires_known_user_and_service() {
    let h = harness("unknowns", Arc::new(MockTravelEstimator::fixed(5.0, 30))).await;

    seed_service(&h.registry, "Health_Checkup").await;

    let err = h
        .engine
        .issue_token(issue_req("ghost@example.com", "Health_Checkup"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg == "User not found"));

    seed_user(&h.registry, "Ayesha", "a@example.com").await;
    let err = h
        .engine
        .issue_token(issue_req("a@example.com", "No_Such_Service"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg == "Service not found"));
}

/// Pinned clock for timestamp assertions
struct FixedClock(i64);

impl TimeProvider for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

#[tokio::test]
async fn test_issued_at_comes_from_the_injected_clock() {
    let db_path = std::env::temp_dir().join("spotqueue_fixed_clock.db");
    let _ = std::fs::remove_file(&db_path);

    let pool = create_pool(db_path.to_str().unwrap()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let token_repo = Arc::new(SqliteTokenRepository::new(pool.clone()));
    let registry = Arc::new(SqliteRegistry::new(pool));

    let engine = QueueEngine::new(
        EngineConfig {
            handoff_delay: Duration::from_millis(10),
            ..Default::default()
        },
        token_repo.clone(),
        token_repo.clone(),
        registry.clone(),
        registry.clone(),
        registry.clone(),
        Arc::new(MockTravelEstimator::fixed(5.0, 30)),
        Arc::new(FixedClock(1_700_000_000_000)),
    );

    seed_service(&registry, "Health_Checkup").await;
    let a = seed_user(&registry, "Ayesha", "a@example.com").await;

    let issued = engine
        .issue_token(issue_req("a@example.com", "Health_Checkup"))
        .await
        .unwrap();
    assert_eq!(issued.issued_at, 1_700_000_000_000);

    // The stored row carries the same pinned stamp
    let stored = token_repo.find_latest_by_user(a.id).await.unwrap().unwrap();
    assert_eq!(stored.issued_at, 1_700_000_000_000);

    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_issue_surfaces_estimator_outage() {
    let h = harness("outage", Arc::new(FailingTravelEstimator)).await;

    seed_service(&h.registry, "Health_Checkup").await;
    seed_user(&h.registry, "Ayesha", "a@example.com").await;

    let err = h
        .engine
        .issue_token(issue_req("a@example.com", "Health_Checkup"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
}
