use chrono::Utc;
use libsql::{params, Connection};

use super::{format_ts, parse_ts};
use crate::error::Result;
use crate::models::RosterMember;

pub struct RosterRepository;

impl RosterRepository {
    /// Adding an existing member is a no-op that returns the stored row.
    pub async fn add_member(conn: &Connection, roster_id: &str, artist_slug: &str) -> Result<RosterMember> {
        let added_at = Utc::now();
        conn.execute(
            r#"
            INSERT INTO roster_members (roster_id, artist_slug, added_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(roster_id, artist_slug) DO NOTHING
            "#,
            params![roster_id, artist_slug, format_ts(&added_at)],
        )
        .await?;

        let mut rows = conn
            .query(
                "SELECT roster_id, artist_slug, added_at FROM roster_members \
                 WHERE roster_id = ?1 AND artist_slug = ?2",
                params![roster_id, artist_slug],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Self::row_to_member(&row),
            None => Ok(RosterMember {
                roster_id: roster_id.to_string(),
                artist_slug: artist_slug.to_string(),
                added_at,
            }),
        }
    }

    pub async fn remove_member(conn: &Connection, roster_id: &str, artist_slug: &str) -> Result<bool> {
        let rows_affected = conn
            .execute(
                "DELETE FROM roster_members WHERE roster_id = ?1 AND artist_slug = ?2",
                params![roster_id, artist_slug],
            )
            .await?;

        Ok(rows_affected > 0)
    }

    pub async fn get_members(conn: &Connection, roster_id: &str) -> Result<Vec<RosterMember>> {
        let mut rows = conn
            .query(
                "SELECT roster_id, artist_slug, added_at FROM roster_members \
                 WHERE roster_id = ?1 ORDER BY added_at ASC, rowid ASC",
                params![roster_id],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_member(&row)?);
        }
        Ok(results)
    }

    fn row_to_member(row: &libsql::Row) -> Result<RosterMember> {
        Ok(RosterMember {
            roster_id: row.get(0)?,
            artist_slug: row.get(1)?,
            added_at: parse_ts(&row.get::<String>(2)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::init_schema;

    #[tokio::test]
    async fn test_add_list_remove() {
        let conn = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .unwrap()
            .connect()
            .unwrap();
        init_schema(&conn).await.unwrap();

        RosterRepository::add_member(&conn, "r1", "nova").await.unwrap();
        RosterRepository::add_member(&conn, "r1", "kai").await.unwrap();
        RosterRepository::add_member(&conn, "r1", "nova").await.unwrap();
        RosterRepository::add_member(&conn, "r2", "zed").await.unwrap();

        let members = RosterRepository::get_members(&conn, "r1").await.unwrap();
        let slugs: Vec<_> = members.iter().map(|m| m.artist_slug.as_str()).collect();
        assert_eq!(slugs, vec!["nova", "kai"]);

        assert!(RosterRepository::remove_member(&conn, "r1", "nova").await.unwrap());
        assert_eq!(RosterRepository::get_members(&conn, "r1").await.unwrap().len(), 1);
        assert!(RosterRepository::get_members(&conn, "none").await.unwrap().is_empty());
    }
}
