use libsql::{params, Connection};

use super::candidates::{CandidateRepository, CANDIDATE_COLUMNS, CANDIDATE_COLUMN_COUNT};
use super::{format_ts, parse_ts};
use crate::error::Result;
use crate::models::{
    DimensionScores, MomentumDirection, RankAxis, SceneScoreStats, ScoreSnapshot, ScoredCandidate,
};

const SNAPSHOT_COLUMNS: &str = "id, candidate_id, network_connectivity, scene_alignment, \
     creative_shift, press_quality, campaign_efficiency, identity_alignment, coverage_velocity, \
     momentum, momentum_direction, breakout_probability, risk, composite, partial, \
     model_version, explanation, snapshot_at";

const LATEST_SNAPSHOT_COLUMNS: &str = "l.id, l.candidate_id, l.network_connectivity, \
     l.scene_alignment, l.creative_shift, l.press_quality, l.campaign_efficiency, \
     l.identity_alignment, l.coverage_velocity, l.momentum, l.momentum_direction, \
     l.breakout_probability, l.risk, l.composite, l.partial, l.model_version, l.explanation, \
     l.snapshot_at";

/// Newest snapshot per candidate. Ties on timestamp fall back to insertion
/// order.
const LATEST_CTE: &str = r#"
    WITH latest AS (
        SELECT s.*,
            ROW_NUMBER() OVER (
                PARTITION BY s.candidate_id
                ORDER BY s.snapshot_at DESC, s.rowid DESC
            ) AS rn
        FROM score_snapshots s
    )
"#;

pub struct ScoreRepository;

impl ScoreRepository {
    pub async fn create(conn: &Connection, snapshot: &ScoreSnapshot) -> Result<()> {
        let d = &snapshot.dimensions;
        conn.execute(
            r#"
            INSERT INTO score_snapshots (
                id, candidate_id, network_connectivity, scene_alignment, creative_shift,
                press_quality, campaign_efficiency, identity_alignment, coverage_velocity,
                momentum, momentum_direction, breakout_probability, risk, composite,
                partial, model_version, explanation, snapshot_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
            )
            "#,
            params![
                snapshot.id.clone(),
                snapshot.candidate_id.clone(),
                d.network_connectivity,
                d.scene_alignment,
                d.creative_shift,
                d.press_quality,
                d.campaign_efficiency,
                d.identity_alignment,
                d.coverage_velocity,
                snapshot.momentum,
                snapshot.momentum_direction.to_string(),
                snapshot.breakout_probability,
                snapshot.risk,
                snapshot.composite,
                snapshot.partial as i64,
                snapshot.model_version.clone(),
                snapshot.explanation.clone(),
                format_ts(&snapshot.snapshot_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_latest(conn: &Connection, candidate_id: &str) -> Result<Option<ScoreSnapshot>> {
        let sql = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM score_snapshots WHERE candidate_id = ?1 \
             ORDER BY snapshot_at DESC, rowid DESC LIMIT 1"
        );
        let mut rows = conn.query(&sql, params![candidate_id]).await?;

        match rows.next().await? {
            Some(row) => Self::row_to_snapshot(&row, 0),
            None => Ok(None),
        }
    }

    /// Newest first.
    pub async fn get_history(
        conn: &Connection,
        candidate_id: &str,
        limit: usize,
    ) -> Result<Vec<ScoreSnapshot>> {
        let sql = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM score_snapshots WHERE candidate_id = ?1 \
             ORDER BY snapshot_at DESC, rowid DESC LIMIT ?2"
        );
        let mut rows = conn
            .query(&sql, params![candidate_id, limit as i64])
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            if let Some(snapshot) = Self::row_to_snapshot(&row, 0)? {
                results.push(snapshot);
            }
        }
        Ok(results)
    }

    /// Candidates ranked by one axis of their latest snapshot.
    pub async fn top_by_axis(
        conn: &Connection,
        axis: RankAxis,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        let order_column = match axis {
            RankAxis::Momentum => "l.momentum",
            RankAxis::Breakout => "l.breakout_probability",
            RankAxis::Risk => "l.risk",
        };
        Self::query_latest(conn, &format!("{order_column} DESC, l.composite DESC"), limit).await
    }

    /// Every candidate with at least one snapshot, best composite first.
    pub async fn list_latest(conn: &Connection, limit: usize) -> Result<Vec<ScoredCandidate>> {
        Self::query_latest(conn, "l.composite DESC", limit).await
    }

    async fn query_latest(
        conn: &Connection,
        order_by: &str,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        let sql = format!(
            "{LATEST_CTE} SELECT {CANDIDATE_COLUMNS}, {LATEST_SNAPSHOT_COLUMNS} \
             FROM latest l JOIN candidates c ON c.id = l.candidate_id \
             WHERE l.rn = 1 ORDER BY {order_by}, c.artist_slug ASC LIMIT ?1"
        );
        let mut rows = conn.query(&sql, params![limit as i64]).await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            let Some(snapshot) = Self::row_to_snapshot(&row, CANDIDATE_COLUMN_COUNT)? else {
                continue;
            };
            results.push(ScoredCandidate {
                candidate: CandidateRepository::row_to_candidate(&row, 0)?,
                snapshot,
            });
        }
        Ok(results)
    }

    /// Candidate count and average latest composite per primary scene, over
    /// the whole scored population.
    pub async fn scene_stats(conn: &Connection) -> Result<Vec<SceneScoreStats>> {
        let sql = format!(
            "{LATEST_CTE} SELECT c.primary_scene_slug, COUNT(*), AVG(l.composite) \
             FROM latest l JOIN candidates c ON c.id = l.candidate_id \
             WHERE l.rn = 1 AND c.primary_scene_slug IS NOT NULL \
             GROUP BY c.primary_scene_slug ORDER BY c.primary_scene_slug ASC"
        );
        let mut rows = conn.query(&sql, ()).await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(SceneScoreStats {
                scene_slug: row.get(0)?,
                candidate_count: row.get::<i64>(1)? as usize,
                average_composite: row.get(2)?,
            });
        }
        Ok(results)
    }

    /// `None` when the stored direction is not one this build knows.
    fn row_to_snapshot(row: &libsql::Row, offset: i32) -> Result<Option<ScoreSnapshot>> {
        let at = |i: i32| offset + i;
        let momentum_direction: MomentumDirection = match row.get::<String>(at(10))?.parse() {
            Ok(direction) => direction,
            Err(e) => {
                let id: String = row.get(at(0))?;
                tracing::warn!(snapshot_id = %id, error = %e, "Skipping snapshot with unknown momentum direction");
                return Ok(None);
            }
        };
        Ok(Some(ScoreSnapshot {
            id: row.get(at(0))?,
            candidate_id: row.get(at(1))?,
            dimensions: DimensionScores {
                network_connectivity: row.get(at(2))?,
                scene_alignment: row.get(at(3))?,
                creative_shift: row.get(at(4))?,
                press_quality: row.get(at(5))?,
                campaign_efficiency: row.get(at(6))?,
                identity_alignment: row.get(at(7))?,
                coverage_velocity: row.get(at(8))?,
            },
            momentum: row.get(at(9))?,
            momentum_direction,
            breakout_probability: row.get(at(11))?,
            risk: row.get(at(12))?,
            composite: row.get(at(13))?,
            partial: row.get::<i64>(at(14))? != 0,
            model_version: row.get(at(15))?,
            explanation: row.get(at(16))?,
            snapshot_at: parse_ts(&row.get::<String>(at(17))?),
        }))
    }
}
