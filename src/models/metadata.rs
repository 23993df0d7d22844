use serde::Deserialize;

use crate::error::MetadataError;

/// OMDb's marker for a field it has no value for
const NOT_AVAILABLE: &str = "N/A";

/// Metadata returned by the external lookup
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieMetadata {
    pub poster_url: Option<String>,
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Raw response from `GET /?i={imdb_id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    /// `"True"` on success, `"False"` with `Error` set otherwise
    pub response: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty() && v != NOT_AVAILABLE)
}

impl TryFrom<OmdbResponse> for MovieMetadata {
    type Error = MetadataError;

    fn try_from(response: OmdbResponse) -> Result<Self, Self::Error> {
        if !response.response.eq_ignore_ascii_case("true") {
            return Err(MetadataError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "no reason given".to_string()),
            ));
        }

        Ok(MovieMetadata {
            poster_url: present(response.poster),
        })
    }
}
