use libsql::{params, Connection};

use super::{format_ts, parse_ts};
use crate::error::Result;
use crate::models::{Candidate, CandidateFilter};

pub(crate) const CANDIDATE_COLUMNS: &str = "c.id, c.artist_slug, c.display_name, \
     c.primary_scene_slug, c.microgenres, c.country, c.description, c.metadata, \
     c.created_at, c.updated_at";

pub(crate) const CANDIDATE_COLUMN_COUNT: i32 = 10;

pub struct CandidateRepository;

impl CandidateRepository {
    /// Insert, or update the mutable fields of the candidate already holding
    /// this slug. The stored id is never changed.
    pub async fn upsert(conn: &Connection, candidate: &Candidate) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO candidates (
                id, artist_slug, display_name, primary_scene_slug, microgenres,
                country, description, metadata, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(artist_slug) DO UPDATE SET
                display_name = excluded.display_name,
                primary_scene_slug = excluded.primary_scene_slug,
                microgenres = excluded.microgenres,
                country = excluded.country,
                description = excluded.description,
                metadata = excluded.metadata,
                updated_at = excluded.updated_at
            "#,
            params![
                candidate.id.clone(),
                candidate.artist_slug.clone(),
                candidate.display_name.clone(),
                candidate.primary_scene_slug.clone(),
                serde_json::to_string(&candidate.microgenres)?,
                candidate.country.clone(),
                candidate.description.clone(),
                serde_json::to_string(&candidate.metadata)?,
                format_ts(&candidate.created_at),
                format_ts(&candidate.updated_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_slug(conn: &Connection, slug: &str) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates c WHERE c.artist_slug = ?1");
        let mut rows = conn.query(&sql, params![slug]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_candidate(&row, 0)?))
        } else {
            Ok(None)
        }
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates c WHERE c.id = ?1");
        let mut rows = conn.query(&sql, params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_candidate(&row, 0)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list(
        conn: &Connection,
        filter: &CandidateFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Candidate>> {
        let mut clauses = Vec::new();
        let mut values: Vec<libsql::Value> = Vec::new();

        if let Some(scene) = &filter.scene_slug {
            values.push(libsql::Value::from(scene.clone()));
            clauses.push(format!("c.primary_scene_slug = ?{}", values.len()));
        }
        if let Some(country) = &filter.country {
            values.push(libsql::Value::from(country.clone()));
            clauses.push(format!("c.country = ?{}", values.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        values.push(libsql::Value::from(limit as i64));
        let limit_idx = values.len();
        values.push(libsql::Value::from(offset as i64));
        let offset_idx = values.len();

        let sql = format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates c {where_clause} \
             ORDER BY c.artist_slug ASC LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
        );

        let mut rows = conn.query(&sql, libsql::params_from_iter(values)).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_candidate(&row, 0)?);
        }
        Ok(results)
    }

    pub async fn delete(conn: &Connection, slug: &str) -> Result<bool> {
        let rows_affected = conn
            .execute("DELETE FROM candidates WHERE artist_slug = ?1", params![slug])
            .await?;

        Ok(rows_affected > 0)
    }

    /// Map `CANDIDATE_COLUMNS` starting at column `offset`.
    pub(crate) fn row_to_candidate(row: &libsql::Row, offset: i32) -> Result<Candidate> {
        let at = |i: i32| offset + i;
        Ok(Candidate {
            id: row.get(at(0))?,
            artist_slug: row.get(at(1))?,
            display_name: row.get(at(2))?,
            primary_scene_slug: row.get(at(3))?,
            microgenres: serde_json::from_str(&row.get::<String>(at(4))?).unwrap_or_default(),
            country: row.get(at(5))?,
            description: row.get(at(6))?,
            metadata: serde_json::from_str(&row.get::<String>(at(7))?).unwrap_or_default(),
            created_at: parse_ts(&row.get::<String>(at(8))?),
            updated_at: parse_ts(&row.get::<String>(at(9))?),
        })
    }
}
