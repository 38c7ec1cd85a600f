use libsql::{params, Connection};

use super::{format_ts, parse_ts};
use crate::error::Result;
use crate::models::SceneSummary;

pub struct SceneRepository;

impl SceneRepository {
    pub async fn upsert(conn: &Connection, scene: &SceneSummary) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO scenes (
                slug, display_name, node_count, edge_count, new_node_count,
                growth_rate, trending_subgenres, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(slug) DO UPDATE SET
                display_name = excluded.display_name,
                node_count = excluded.node_count,
                edge_count = excluded.edge_count,
                new_node_count = excluded.new_node_count,
                growth_rate = excluded.growth_rate,
                trending_subgenres = excluded.trending_subgenres,
                updated_at = excluded.updated_at
            "#,
            params![
                scene.slug.clone(),
                scene.display_name.clone(),
                scene.node_count,
                scene.edge_count,
                scene.new_node_count,
                scene.growth_rate,
                serde_json::to_string(&scene.trending_subgenres)?,
                format_ts(&scene.updated_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_slug(conn: &Connection, slug: &str) -> Result<Option<SceneSummary>> {
        let mut rows = conn
            .query(
                r#"
                SELECT slug, display_name, node_count, edge_count, new_node_count,
                    growth_rate, trending_subgenres, updated_at
                FROM scenes WHERE slug = ?1
                "#,
                params![slug],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(SceneSummary {
                slug: row.get(0)?,
                display_name: row.get(1)?,
                node_count: row.get(2)?,
                edge_count: row.get(3)?,
                new_node_count: row.get(4)?,
                growth_rate: row.get(5)?,
                trending_subgenres: serde_json::from_str(&row.get::<String>(6)?)
                    .unwrap_or_default(),
                updated_at: parse_ts(&row.get::<String>(7)?),
            }))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::init_schema;
    use chrono::Utc;

    #[tokio::test]
    async fn test_upsert_and_get() {
        let conn = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .unwrap()
            .connect()
            .unwrap();
        init_schema(&conn).await.unwrap();

        let mut scene = SceneSummary {
            slug: "uk-drill".to_string(),
            display_name: "UK Drill".to_string(),
            node_count: 120,
            edge_count: 340,
            new_node_count: 12,
            growth_rate: 0.1,
            trending_subgenres: vec!["melodic drill".to_string()],
            updated_at: Utc::now(),
        };
        SceneRepository::upsert(&conn, &scene).await.unwrap();

        scene.node_count = 130;
        SceneRepository::upsert(&conn, &scene).await.unwrap();

        let fetched = SceneRepository::get_by_slug(&conn, "uk-drill")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.node_count, 130);
        assert_eq!(fetched.trending_subgenres, vec!["melodic drill"]);
        assert!(SceneRepository::get_by_slug(&conn, "none").await.unwrap().is_none());
    }
}
