mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use radar::config::PairingConfig;
use radar::error::RadarError;
use radar::scoring::PairingWeights;
use radar::services::CollaborationService;

use common::{backend, seed, StubAdapter};

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected ~{expected}, got {actual}"
    );
}

async fn roster_of_three(max_roster_size: usize) -> (CollaborationService, tempfile::NamedTempFile) {
    let (db, file) = backend().await;
    seed(&db, "ada", Some("uk-drill"), |_| {}).await;
    seed(&db, "bex", Some("uk-drill"), |_| {}).await;
    seed(&db, "cyd", Some("jazz"), |_| {}).await;
    for slug in ["ada", "bex", "cyd"] {
        db.add_roster_member("label-1", slug).await.unwrap();
    }

    let adapter = StubAdapter::default()
        .with_network("ada", &["Label X", "prod-1"])
        .with_network("bex", &["label x", "prod-2"])
        .with_motifs("ada", &["night", "city"])
        .with_motifs("bex", &["city", "rain"]);

    let service = CollaborationService::new(
        db,
        Arc::new(adapter),
        Duration::from_millis(500),
        PairingWeights::default(),
        PairingConfig {
            min_compatibility: 0.5,
            max_roster_size,
            concurrency: 2,
        },
    );
    (service, file)
}

#[tokio::test]
async fn assess_pairing_end_to_end() {
    let (service, _file) = roster_of_three(50).await;

    let rec = service.assess_pairing("ada", "bex").await.unwrap().unwrap();
    approx(rec.components.network_overlap, 0.333);
    approx(rec.components.scene_overlap, 1.0);
    approx(rec.components.creative_complementarity, 0.667);
    approx(rec.compatibility, 0.7);
    assert_eq!(rec.shared_network_nodes, vec!["label x"]);
    assert_eq!(rec.justification.len(), 3);

    let reverse = service.assess_pairing("bex", "ada").await.unwrap().unwrap();
    assert_eq!(reverse.compatibility, rec.compatibility);
}

#[tokio::test]
async fn roster_pairs_respect_minimum() {
    let (service, _file) = roster_of_three(50).await;

    let strong = service
        .suggest_collabs_within_roster("label-1", None)
        .await
        .unwrap();
    assert_eq!(strong.len(), 1);
    assert_eq!((strong[0].artist_a.as_str(), strong[0].artist_b.as_str()), ("ada", "bex"));

    let all = service
        .suggest_collabs_within_roster("label-1", Some(0.0))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].compatibility, strong[0].compatibility);
    assert!(all[1..].iter().all(|p| p.compatibility == 0.0));
}

#[tokio::test]
async fn candidate_against_roster() {
    let (service, _file) = roster_of_three(50).await;

    let pairs = service
        .suggest_roster_candidate_collabs("label-1", "bex", Some(0.0))
        .await
        .unwrap();
    let partners: Vec<_> = pairs.iter().map(|p| p.artist_b.as_str()).collect();
    assert_eq!(partners, vec!["ada", "cyd"]);
    assert!(pairs.iter().all(|p| p.artist_a == "bex"));
}

#[tokio::test]
async fn oversized_roster_is_rejected() {
    let (service, _file) = roster_of_three(2).await;

    let err = service
        .suggest_collabs_within_roster("label-1", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RadarError::CapacityExceeded {
            limit: 2,
            actual: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn empty_roster_has_no_pairs() {
    let (service, _file) = roster_of_three(50).await;
    let pairs = service
        .suggest_collabs_within_roster("nobody", Some(0.0))
        .await
        .unwrap();
    assert!(pairs.is_empty());
}

#[tokio::test]
async fn weighted_compatibility_from_partial_overlaps() {
    let (db, _file) = backend().await;
    seed(&db, "ola", Some("afrobeats"), |_| {}).await;
    seed(&db, "pim", Some("afrobeats"), |_| {}).await;

    // 2 shared of 6 nodes, 1 shared of 2 scenes, motif Jaccard 0.5.
    let adapter = StubAdapter::default()
        .with_network("ola", &["n1", "n2", "n3", "n4"])
        .with_network("pim", &["n3", "n4", "n5", "n6"])
        .with_scenes("pim", &["amapiano"])
        .with_motifs("ola", &["summer"])
        .with_motifs("pim", &["summer", "faith"]);
    let service = CollaborationService::new(
        db,
        Arc::new(adapter),
        Duration::from_millis(500),
        PairingWeights::default(),
        PairingConfig::default(),
    );

    let rec = service.assess_pairing("ola", "pim").await.unwrap().unwrap();
    approx(rec.components.network_overlap, 0.333);
    approx(rec.components.scene_overlap, 0.5);
    approx(rec.components.creative_complementarity, 1.0);
    approx(rec.compatibility, 0.6);
    assert_eq!(rec.shared_scenes, vec!["afrobeats"]);
}
