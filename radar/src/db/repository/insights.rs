use libsql::{params, Connection};

use super::{format_ts, parse_ts};
use crate::error::Result;
use crate::models::{Insight, InsightType};

pub struct InsightRepository;

impl InsightRepository {
    pub async fn create(conn: &Connection, insight: &Insight) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO insights (id, user_id, insight_type, content, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                insight.id.clone(),
                insight.user_id.clone(),
                insight.insight_type.to_string(),
                serde_json::to_string(&insight.content)?,
                format_ts(&insight.created_at),
            ],
        )
        .await?;

        Ok(())
    }

    /// Newest first.
    pub async fn list_for_user(conn: &Connection, user_id: &str, limit: usize) -> Result<Vec<Insight>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, user_id, insight_type, content, created_at
                FROM insights WHERE user_id = ?1
                ORDER BY created_at DESC, rowid DESC
                LIMIT ?2
                "#,
                params![user_id, limit as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            let insight_type: InsightType = match row.get::<String>(2)?.parse() {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping insight with unknown type");
                    continue;
                }
            };
            results.push(Insight {
                id: row.get(0)?,
                user_id: row.get(1)?,
                insight_type,
                content: serde_json::from_str(&row.get::<String>(3)?)?,
                created_at: parse_ts(&row.get::<String>(4)?),
            });
        }
        Ok(results)
    }

    /// Delete all but the `keep` most recent insights for a user. Returns the
    /// number of rows removed.
    pub async fn cleanup_old(conn: &Connection, user_id: &str, keep: usize) -> Result<u64> {
        let deleted = conn
            .execute(
                r#"
                DELETE FROM insights
                WHERE user_id = ?1
                  AND id NOT IN (
                    SELECT id FROM insights
                    WHERE user_id = ?1
                    ORDER BY created_at DESC, rowid DESC
                    LIMIT ?2
                  )
                "#,
                params![user_id, keep as i64],
            )
            .await?;

        Ok(deleted)
    }
}
