pub mod genres;
mod metadata;
mod movie;

pub use genres::{GenreError, GenreField};
pub use metadata::{MovieMetadata, OmdbResponse};
pub use movie::{ExternalId, Movie};
