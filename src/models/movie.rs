use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;

use super::genres;

const IMDB_TITLE_URL: &str = "https://www.imdb.com/title";

/// Identifier used to look a movie up in the external metadata API (an IMDb id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalId(String);

impl ExternalId {
    /// Parses a raw identifier, treating empty text and the `nan` sentinel as absent
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public IMDb page for this title
    pub fn imdb_url(&self) -> String {
        format!("{}/{}", IMDB_TITLE_URL, self.0)
    }
}

impl Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One catalog record, immutable after load
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawMovie")]
pub struct Movie {
    pub title: String,
    pub overview: Option<String>,
    /// Kept as delivered; see [`Movie::genres_display`]
    pub genres: Value,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub external_id: Option<ExternalId>,
}

impl Movie {
    /// Genre names joined for display, or an empty string when the field is malformed
    pub fn genres_display(&self) -> String {
        genres::display_genres(&self.genres)
    }

    /// Year component of the release date, if one can be read
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?.trim();

        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(parsed.year());
        }

        let year = date.get(..4)?;
        if year.chars().all(|c| c.is_ascii_digit()) {
            year.parse().ok()
        } else {
            None
        }
    }

    pub fn imdb_url(&self) -> Option<String> {
        self.external_id.as_ref().map(ExternalId::imdb_url)
    }
}

/// Movie row as it appears in the artifact
///
/// Every field is accepted as an arbitrary JSON value so that dirty rows
/// (nulls, numbers where text was expected) never fail the load.
#[derive(Debug, Deserialize)]
struct RawMovie {
    #[serde(default)]
    title: Value,
    #[serde(default)]
    overview: Value,
    #[serde(default)]
    genres: Value,
    #[serde(default)]
    release_date: Value,
    #[serde(default)]
    vote_average: Value,
    #[serde(default)]
    imdb_id: Value,
}

impl From<RawMovie> for Movie {
    fn from(raw: RawMovie) -> Self {
        let text = |value: Value| match value {
            Value::String(s) => Some(s),
            _ => None,
        };

        Movie {
            title: text(raw.title).unwrap_or_default(),
            overview: text(raw.overview),
            genres: raw.genres,
            release_date: text(raw.release_date),
            vote_average: raw.vote_average.as_f64().filter(|v| v.is_finite()),
            external_id: raw.imdb_id.as_str().and_then(ExternalId::parse),
        }
    }
}
