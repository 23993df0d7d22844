use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::SessionId,
    models::Movie,
    services::{
        pagination::PAGE_SIZE,
        popularity::{self, POPULAR_COUNT},
        posters::{resolve_posters, CARD_PLACEHOLDER, DETAIL_PLACEHOLDER},
        title_search,
    },
};

use super::state::{AppState, PageSnapshot, PageTurn};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub movies: usize,
}

/// A movie as shown in a result grid
#[derive(Debug, Serialize)]
pub struct MovieCard {
    pub title: String,
    pub vote_average: Option<f64>,
    pub poster_url: String,
    pub imdb_url: Option<String>,
}

impl MovieCard {
    fn new(movie: &Movie, poster_url: String) -> Self {
        Self {
            title: movie.title.clone(),
            vote_average: movie.vote_average,
            poster_url,
            imdb_url: movie.imdb_url(),
        }
    }
}

/// Full view of the searched movie
#[derive(Debug, Serialize)]
pub struct MovieDetail {
    pub title: String,
    pub overview: Option<String>,
    pub genres: String,
    pub release_year: Option<i32>,
    pub vote_average: Option<f64>,
    pub poster_url: String,
    pub imdb_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationPage {
    /// Catalog title the recommendations are for
    pub title: String,
    pub start: usize,
    pub page_size: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub results: Vec<MovieCard>,
}

// Helpers

fn catalog_movie(state: &AppState, index: usize) -> AppResult<&Movie> {
    state.catalog.movie(index).ok_or_else(|| {
        AppError::InvariantViolation(format!(
            "row {} is outside the {}-row catalog",
            index,
            state.catalog.len()
        ))
    })
}

fn resolve(state: &AppState, query: &str) -> AppResult<usize> {
    title_search::resolve_title(&state.catalog, query).inspect_err(|e| {
        tracing::info!(error = %e, "Title lookup failed");
    })
}

async fn movie_cards(state: &AppState, movies: Vec<&Movie>) -> Vec<MovieCard> {
    let ids = movies.iter().map(|m| m.external_id.clone()).collect();
    let posters = resolve_posters(state.metadata.clone(), ids, CARD_PLACEHOLDER).await;

    movies
        .into_iter()
        .zip(posters)
        .map(|(movie, poster)| MovieCard::new(movie, poster))
        .collect()
}

async fn render_page(state: &AppState, snapshot: PageSnapshot) -> AppResult<RecommendationPage> {
    let selected = catalog_movie(state, snapshot.row)?;
    let movies = snapshot
        .indices
        .iter()
        .map(|&i| catalog_movie(state, i))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(RecommendationPage {
        title: selected.title.clone(),
        start: snapshot.start,
        page_size: PAGE_SIZE,
        total: snapshot.total,
        has_previous: snapshot.has_previous,
        has_next: snapshot.has_next,
        results: movie_cards(state, movies).await,
    })
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        movies: state.catalog.len(),
    })
}

/// Default view: highest-rated movies
pub async fn popular_movies(State(state): State<AppState>) -> Json<Vec<MovieCard>> {
    let movies = popularity::top_popular(&state.catalog, POPULAR_COUNT);
    Json(movie_cards(&state, movies).await)
}

/// Detail view for a single title
pub async fn get_movie(
    State(state): State<AppState>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<MovieDetail>> {
    let row = resolve(&state, &params.title)?;
    let movie = catalog_movie(&state, row)?;

    let poster_url = resolve_posters(
        state.metadata.clone(),
        vec![movie.external_id.clone()],
        DETAIL_PLACEHOLDER,
    )
    .await
    .pop()
    .unwrap_or_else(|| DETAIL_PLACEHOLDER.to_string());

    Ok(Json(MovieDetail {
        title: movie.title.clone(),
        overview: movie.overview.clone(),
        genres: movie.genres_display(),
        release_year: movie.release_year(),
        vote_average: movie.vote_average,
        poster_url,
        imdb_url: movie.imdb_url(),
    }))
}

/// Recommendations for a title, at the session's current page
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<RecommendationPage>> {
    let row = resolve(&state, &params.title)?;
    let snapshot = state.select_title(session_id, row).await?;

    tracing::info!(
        session_id = %session_id,
        row,
        start = snapshot.start,
        "Serving recommendations"
    );

    Ok(Json(render_page(&state, snapshot).await?))
}

/// Advance the session's recommendation page
pub async fn next_page(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> AppResult<Json<RecommendationPage>> {
    let snapshot = state.turn_page(session_id, PageTurn::Next).await?;
    Ok(Json(render_page(&state, snapshot).await?))
}

/// Step back one recommendation page
pub async fn previous_page(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> AppResult<Json<RecommendationPage>> {
    let snapshot = state.turn_page(session_id, PageTurn::Previous).await?;
    Ok(Json(render_page(&state, snapshot).await?))
}
