//! Movie metadata provider abstraction
//!
//! The recommendation core never talks to the network. Posters and other
//! display metadata come from a pluggable provider (OMDb in production, stubs
//! in tests), called only by the presentation layer.

use crate::{
    error::MetadataError,
    models::{ExternalId, MovieMetadata},
};

pub mod omdb;

/// Trait for external metadata sources
///
/// Callers never pass an absent or sentinel identifier: [`ExternalId`] can
/// only be constructed from a real value.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch display metadata for one title
    ///
    /// A successful response may still lack a poster; that is reported as
    /// `poster_url: None`, not as an error.
    async fn fetch_metadata(&self, id: &ExternalId) -> Result<MovieMetadata, MetadataError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
