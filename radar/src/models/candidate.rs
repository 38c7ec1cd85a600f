use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

use super::Metadata;

/// A tracked artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub artist_slug: String,
    pub display_name: String,
    pub primary_scene_slug: Option<String>,
    pub microgenres: Vec<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(artist_slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: nanoid!(),
            artist_slug: artist_slug.into(),
            display_name: display_name.into(),
            primary_scene_slug: None,
            microgenres: Vec::new(),
            country: None,
            description: None,
            metadata: Metadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_scene(mut self, scene_slug: impl Into<String>) -> Self {
        self.primary_scene_slug = Some(scene_slug.into());
        self
    }

    pub fn with_microgenres<I, S>(mut self, microgenres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.microgenres = microgenres.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilter {
    pub scene_slug: Option<String>,
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_candidate_has_fresh_id() {
        let a = Candidate::new("nova", "Nova");
        let b = Candidate::new("nova", "Nova");
        assert_ne!(a.id, b.id);
        assert_eq!(a.artist_slug, "nova");
        assert!(a.primary_scene_slug.is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let candidate = Candidate::new("nova", "Nova")
            .with_scene("uk-drill")
            .with_microgenres(["drill", "grime"]);
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["artistSlug"], "nova");
        assert_eq!(json["primarySceneSlug"], "uk-drill");
        assert_eq!(json["microgenres"][1], "grime");
    }
}
