// Integration tests for Care Match
//
// Exercises full discovery flows: session-driven filtering, preference
// matching, batch pagination and the location resolution state machine.

use async_trait::async_trait;
use care_match::core::{
    Coordinates, DiscoveryEngine, DiscoverySession, LocationOutcome, LocationResolver,
    PermissionState, Place, PositionError, PositionSource, ReverseGeocoder, SessionConfig,
};
use care_match::models::{
    Availability, Caregiver, CityFilter, ExperienceBand, PreferenceProfile, SearchCriteria,
    SortKey, Specialty,
};
use care_match::services::GeocodeError;
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn create_caregiver(name: &str, city: &str) -> Caregiver {
    Caregiver {
        id: Uuid::new_v4(),
        name: name.to_string(),
        city: city.to_string(),
        specializations: vec![],
        certifications: vec![],
        experience: ExperienceBand::Years3To5,
        bio: String::new(),
        rating: 4.0,
        review_count: 10,
        availability: Availability::Today,
        is_online: true,
        highlighted_until: None,
        on_vacation: false,
    }
}

fn fast_config() -> SessionConfig {
    SessionConfig {
        batch_size: 6,
        debounce: Duration::from_millis(20),
        settle_delay: Duration::from_millis(20),
        match_delay: Duration::from_millis(30),
    }
}

async fn create_session(catalog: Vec<Caregiver>) -> DiscoverySession {
    DiscoverySession::new(
        DiscoveryEngine::with_default_weights(),
        Arc::new(catalog),
        None,
        fast_config(),
    )
    .await
}

#[tokio::test]
async fn test_preference_match_reference_ordering() {
    // Strong candidate: full specialization overlap, sufficient experience,
    // keyword hit, rating 4.0 -> 0.97. Neutral candidate against the same
    // profile: no overlap, sufficient experience, no keyword, rating 5.0.
    let mut strong = create_caregiver("strong", "Recife, PE");
    strong.specializations = vec![Specialty::Alzheimer];
    strong.bio = "paciente e calma".to_string();

    let mut neutral = create_caregiver("neutral", "Recife, PE");
    neutral.experience = ExperienceBand::Years10Plus;
    neutral.rating = 5.0;

    let session = create_session(vec![neutral, strong]).await;
    session
        .start_preference_match(PreferenceProfile {
            specializations: vec![Specialty::Alzheimer],
            min_experience: Some(ExperienceBand::Years0To2),
            keywords: vec!["paciente".to_string()],
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.results[0].caregiver.name, "strong");
    assert!((snapshot.results[0].match_score.unwrap() - 0.97).abs() < 1e-9);
    assert!(snapshot.results[1].match_score.unwrap() < 0.97);
}

#[tokio::test]
async fn test_city_without_caregivers_yields_empty_list() {
    let catalog = vec![
        create_caregiver("Maria", "Olinda, PE"),
        create_caregiver("Joana", "Caruaru, PE"),
    ];
    let session = create_session(catalog).await;

    session
        .set_city(CityFilter::City("Recife, PE".to_string()))
        .await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.total, 0);
    assert_eq!(snapshot.visible_count, 0);
    assert!(!snapshot.has_more);
}

#[tokio::test]
async fn test_batched_reveal_over_fourteen_results() {
    let catalog: Vec<Caregiver> = (0..14)
        .map(|i| create_caregiver(&format!("c{}", i), "Recife, PE"))
        .collect();
    let session = create_session(catalog).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.visible_count, 6);
    assert_eq!(snapshot.total, 14);
    assert!(snapshot.has_more);

    session.request_more().await;
    assert_eq!(session.snapshot().await.visible_count, 12);

    session.request_more().await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.visible_count, 14);
    assert!(!snapshot.has_more);

    // Further requests are no-ops, never an overrun
    session.request_more().await;
    assert_eq!(session.snapshot().await.visible_count, 14);
}

#[tokio::test]
async fn test_sponsored_caregiver_leads_in_both_modes() {
    let now = Utc::now();
    let mut boosted = create_caregiver("boosted", "Recife, PE");
    boosted.rating = 1.5;
    boosted.highlighted_until = Some(now + ChronoDuration::hours(2));

    let mut organic = create_caregiver("organic", "Recife, PE");
    organic.rating = 5.0;
    organic.specializations = vec![Specialty::Alzheimer];
    organic.bio = "paciente".to_string();

    let session = create_session(vec![organic, boosted]).await;

    session.set_sort(SortKey::Rating).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.results[0].caregiver.name, "boosted");
    assert!(snapshot.results[0].is_sponsored);

    session
        .start_preference_match(PreferenceProfile {
            specializations: vec![Specialty::Alzheimer],
            keywords: vec!["paciente".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.results[0].caregiver.name, "boosted");
}

#[tokio::test]
async fn test_recompute_is_stable_across_identical_criteria() {
    let catalog: Vec<Caregiver> = (0..10)
        .map(|i| {
            let mut c = create_caregiver(&format!("c{}", i), "Recife, PE");
            c.rating = 3.0 + (i % 3) as f64 / 2.0;
            c
        })
        .collect();
    let session = create_session(catalog).await;
    session.set_sort(SortKey::Rating).await;

    let first: Vec<Uuid> = session
        .snapshot()
        .await
        .results
        .iter()
        .map(|r| r.caregiver.id)
        .collect();

    // Re-applying the same criteria must not shuffle tied candidates
    session.set_sort(SortKey::Rating).await;
    let second: Vec<Uuid> = session
        .snapshot()
        .await
        .results
        .iter()
        .map(|r| r.caregiver.id)
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_debounced_typing_drives_one_recomputation() {
    let mut match_bio = create_caregiver("Maria", "Recife, PE");
    match_bio.bio = "paciente e atenciosa".to_string();
    let other = create_caregiver("Joana", "Recife, PE");

    let session = create_session(vec![match_bio, other]).await;

    session.set_query("p").await;
    session.set_query("pac").await;
    session.set_query("paciente").await;

    // Still showing the unfiltered list inside the quiet period
    assert_eq!(session.snapshot().await.total, 2);

    tokio::time::sleep(Duration::from_millis(80)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.results[0].caregiver.name, "Maria");
}

#[tokio::test]
async fn test_preference_match_single_flight_and_city_carryover() {
    let recife = create_caregiver("Maria", "Recife, PE");
    let olinda = create_caregiver("Joana", "Olinda, PE");
    let session = create_session(vec![recife, olinda]).await;

    session
        .set_city(CityFilter::City("Recife, PE".to_string()))
        .await;

    session
        .start_preference_match(PreferenceProfile::default())
        .await
        .unwrap();
    let second = session
        .start_preference_match(PreferenceProfile::default())
        .await;
    assert!(second.is_err());

    tokio::time::sleep(Duration::from_millis(60)).await;

    // The city selected before entering preference mode still restricts results
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.results[0].caregiver.name, "Maria");
    assert!(snapshot.results[0].match_score.is_some());

    // Leaving preference mode keeps the city and drops the scores
    session.clear_preference_match().await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.city, CityFilter::City("Recife, PE".to_string()));
    assert_eq!(snapshot.total, 1);
    assert!(snapshot.results[0].match_score.is_none());
}

#[tokio::test]
async fn test_filter_pipeline_end_to_end() {
    let mut qualified = create_caregiver("Maria", "Recife, PE");
    qualified.certifications = vec!["first_aid".to_string(), "nursing_tech".to_string()];
    qualified.availability = Availability::Today;

    let mut missing_cert = create_caregiver("Joana", "Recife, PE");
    missing_cert.certifications = vec!["first_aid".to_string()];

    let mut unavailable = create_caregiver("Clara", "Recife, PE");
    unavailable.certifications = vec!["first_aid".to_string(), "nursing_tech".to_string()];
    unavailable.availability = Availability::Other;

    let mut away = create_caregiver("Rita", "Recife, PE");
    away.certifications = vec!["first_aid".to_string(), "nursing_tech".to_string()];
    away.on_vacation = true;

    let session = create_session(vec![qualified, missing_cert, unavailable, away]).await;
    session
        .set_criteria(SearchCriteria {
            availability: Some(Availability::ThisWeek),
            certifications: vec!["first_aid".to_string(), "nursing_tech".to_string()],
            ..Default::default()
        })
        .await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.results[0].caregiver.name, "Maria");
}

// Location resolution wired into a live session

struct FixedPosition {
    coords: Coordinates,
}

#[async_trait]
impl PositionSource for FixedPosition {
    async fn permission(&self) -> PermissionState {
        PermissionState::Unknown
    }

    async fn current(&self) -> Result<Coordinates, PositionError> {
        Ok(self.coords)
    }
}

struct FixedGeocoder {
    place: Place,
}

#[async_trait]
impl ReverseGeocoder for FixedGeocoder {
    async fn reverse(&self, _coords: Coordinates) -> Result<Place, GeocodeError> {
        Ok(self.place.clone())
    }
}

struct FailingGeocoder;

#[async_trait]
impl ReverseGeocoder for FailingGeocoder {
    async fn reverse(&self, _coords: Coordinates) -> Result<Place, GeocodeError> {
        Err(GeocodeError::ApiError("upstream unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_resolved_city_applies_to_session() {
    let catalog = vec![
        create_caregiver("Maria", "Recife, PE"),
        create_caregiver("Joana", "Olinda, PE"),
    ];
    let known: HashSet<String> = catalog.iter().map(|c| c.city.clone()).collect();
    let session = create_session(catalog).await;

    let resolver = LocationResolver::new(
        Arc::new(FixedPosition {
            coords: Coordinates {
                latitude: -8.0476,
                longitude: -34.8770,
            },
        }),
        Arc::new(FixedGeocoder {
            place: Place {
                city: "Recife".to_string(),
                state_name: "Pernambuco".to_string(),
            },
        }),
        known,
    );

    assert_eq!(resolver.begin().await, PermissionState::Prompt);

    match resolver.grant().await {
        LocationOutcome::Applied(city) => {
            session.set_city(CityFilter::City(city)).await;
        }
        other => panic!("expected applied outcome, got {:?}", other),
    }

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.results[0].caregiver.name, "Maria");
    assert_eq!(snapshot.city, CityFilter::City("Recife, PE".to_string()));
}

#[tokio::test]
async fn test_failed_resolution_leaves_session_untouched() {
    let catalog = vec![
        create_caregiver("Maria", "Recife, PE"),
        create_caregiver("Joana", "Olinda, PE"),
    ];
    let known: HashSet<String> = catalog.iter().map(|c| c.city.clone()).collect();
    let session = create_session(catalog).await;

    let resolver = LocationResolver::new(
        Arc::new(FixedPosition {
            coords: Coordinates {
                latitude: -8.0,
                longitude: -34.8,
            },
        }),
        Arc::new(FailingGeocoder),
        known,
    );

    resolver.begin().await;
    let outcome = resolver.grant().await;
    assert_eq!(outcome, LocationOutcome::Failed);
    assert!(outcome.notice().is_some());

    // The failure never reaches the session; the list stays unrestricted
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.total, 2);
    assert_eq!(snapshot.city, CityFilter::Any);
}
