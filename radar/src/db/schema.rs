use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Tracked artists
        CREATE TABLE IF NOT EXISTS candidates (
            id TEXT PRIMARY KEY,
            artist_slug TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            primary_scene_slug TEXT,
            microgenres TEXT NOT NULL DEFAULT '[]',
            country TEXT,
            description TEXT,
            metadata TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_candidates_scene ON candidates(primary_scene_slug);

        -- Immutable score history; the newest row per candidate is live
        CREATE TABLE IF NOT EXISTS score_snapshots (
            id TEXT PRIMARY KEY,
            candidate_id TEXT NOT NULL,
            network_connectivity REAL NOT NULL,
            scene_alignment REAL NOT NULL,
            creative_shift REAL NOT NULL,
            press_quality REAL NOT NULL,
            campaign_efficiency REAL NOT NULL,
            identity_alignment REAL NOT NULL,
            coverage_velocity REAL NOT NULL,
            momentum REAL NOT NULL,
            momentum_direction TEXT NOT NULL DEFAULT 'flat',
            breakout_probability REAL NOT NULL,
            risk REAL NOT NULL,
            composite REAL NOT NULL,
            partial INTEGER NOT NULL DEFAULT 0,
            model_version TEXT NOT NULL,
            explanation TEXT NOT NULL DEFAULT '',
            snapshot_at TEXT NOT NULL,
            FOREIGN KEY (candidate_id) REFERENCES candidates(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_score_snapshots_candidate
            ON score_snapshots(candidate_id, snapshot_at);

        -- Scene aggregates maintained by an external job
        CREATE TABLE IF NOT EXISTS scenes (
            slug TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            node_count INTEGER NOT NULL DEFAULT 0,
            edge_count INTEGER NOT NULL DEFAULT 0,
            new_node_count INTEGER NOT NULL DEFAULT 0,
            growth_rate REAL NOT NULL DEFAULT 0,
            trending_subgenres TEXT NOT NULL DEFAULT '[]',
            updated_at TEXT NOT NULL
        );

        -- User-scoped insights
        CREATE TABLE IF NOT EXISTS insights (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            insight_type TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_insights_user_created ON insights(user_id, created_at);

        -- Roster membership
        CREATE TABLE IF NOT EXISTS roster_members (
            roster_id TEXT NOT NULL,
            artist_slug TEXT NOT NULL,
            added_at TEXT NOT NULL,
            PRIMARY KEY (roster_id, artist_slug)
        );
        "#,
    )
    .await?;

    Ok(())
}
