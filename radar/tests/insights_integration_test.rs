mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use radar::config::InsightConfig;
use radar::db::RadarBackend;
use radar::models::{InsightType, MomentumDirection};
use radar::scoring::ScoringModel;
use radar::services::InsightEngine;

use common::{backend, seed};

fn engine(db: Arc<dyn RadarBackend>, retention: usize) -> InsightEngine {
    InsightEngine::new(
        db,
        Arc::new(ScoringModel::default()),
        InsightConfig {
            retention,
            ..InsightConfig::default()
        },
    )
}

#[tokio::test]
async fn heating_scene_produces_one_insight() {
    let (db, _file) = backend().await;
    for slug in ["s1", "s2", "s3"] {
        seed(&db, slug, Some("bristol-bass"), |s| s.composite = 0.65).await;
    }
    for slug in ["t1", "t2"] {
        seed(&db, slug, Some("alt-rnb"), |s| s.composite = 0.65).await;
    }

    let result = engine(db, 50).generate_insights_for_user("scout-1").await.unwrap();

    let scenes = &result[&InsightType::SceneOpportunity];
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].content.scene_slugs, vec!["bristol-bass"]);
    assert_eq!(scenes[0].user_id, "scout-1");
    // Unknown scene summaries fall back to the slug.
    assert_eq!(scenes[0].content.title, "bristol-bass is heating up");
}

#[tokio::test]
async fn generated_insights_are_listed_newest_first() {
    let (db, _file) = backend().await;
    seed(&db, "climber", None, |s| {
        s.breakout_probability = 0.85;
        s.momentum_direction = MomentumDirection::StronglyUp;
    })
    .await;
    let engine = engine(db, 50);

    let generated = engine.generate_insights_for_user("scout-1").await.unwrap();
    let total: usize = generated.values().map(Vec::len).sum();
    assert_eq!(generated[&InsightType::CandidateToWatch].len(), 1);

    let listed = engine.list_insights("scout-1", None).await.unwrap();
    assert_eq!(listed.len(), total);
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    assert!(engine.list_insights("someone-else", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn retention_keeps_newest_per_user() {
    let (db, _file) = backend().await;
    seed(&db, "climber", None, |s| {
        s.breakout_probability = 0.85;
        s.momentum_direction = MomentumDirection::ModeratelyUp;
    })
    .await;
    let engine = engine(db, 3);

    for _ in 0..5 {
        engine.generate_insights_for_user("scout-1").await.unwrap();
    }

    let listed = engine.list_insights("scout-1", Some(100)).await.unwrap();
    assert_eq!(listed.len(), 3);
}
