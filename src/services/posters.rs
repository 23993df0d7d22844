use std::sync::Arc;

use crate::{models::ExternalId, services::providers::MetadataProvider};

/// Poster shown on result cards when none is available
pub const CARD_PLACEHOLDER: &str = "https://via.placeholder.com/150x225?text=No+Image";

/// Poster shown in the detail view when none is available
pub const DETAIL_PLACEHOLDER: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Resolves one poster URL per identifier, in input order
///
/// Lookups run concurrently. Absent identifiers never reach the provider.
/// Failed lookups and responses without a poster both yield `placeholder`;
/// failures are logged and not retried.
pub async fn resolve_posters(
    provider: Arc<dyn MetadataProvider>,
    ids: Vec<Option<ExternalId>>,
    placeholder: &str,
) -> Vec<String> {
    let mut tasks = Vec::with_capacity(ids.len());

    for id in ids {
        let task = id.map(|id| {
            let provider = provider.clone();
            tokio::spawn(async move {
                let result = provider.fetch_metadata(&id).await;
                (id, result)
            })
        });
        tasks.push(task);
    }

    let mut posters = Vec::with_capacity(tasks.len());
    let mut failures = 0;

    for task in tasks {
        let poster = match task {
            None => None,
            Some(handle) => match handle.await {
                Ok((_, Ok(metadata))) => metadata.poster_url,
                Ok((id, Err(e))) => {
                    failures += 1;
                    tracing::warn!(
                        external_id = %id,
                        provider = provider.name(),
                        error = %e,
                        "Metadata lookup failed, using placeholder"
                    );
                    None
                }
                Err(e) => {
                    failures += 1;
                    tracing::error!(error = %e, "Metadata task join error");
                    None
                }
            },
        };
        posters.push(poster.unwrap_or_else(|| placeholder.to_string()));
    }

    if failures > 0 {
        tracing::debug!(
            requested = posters.len(),
            failures,
            "Partial metadata fetch failure"
        );
    }

    posters
}
