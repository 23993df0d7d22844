use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
    middleware::SessionId,
    services::{pagination::PageCursor, providers::MetadataProvider, recommendations},
};

/// Direction of a pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    Next,
    Previous,
}

/// How many browse sessions are kept, and for how long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Maximum number of sessions; the least recently used one is evicted
    pub capacity: usize,
    /// Sessions untouched for this long are dropped on the next insert
    pub idle_timeout: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// One session's position within the ranking for its current title
///
/// The ranking itself is not stored. It is a pure function of the row and is
/// recomputed for every page.
#[derive(Debug, Clone)]
pub struct BrowseSession {
    row: usize,
    total: usize,
    cursor: PageCursor,
    last_seen: Instant,
}

impl BrowseSession {
    pub fn new(row: usize, total: usize) -> Self {
        Self {
            row,
            total,
            cursor: PageCursor::new(),
            last_seen: Instant::now(),
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn turn(&mut self, direction: PageTurn) {
        match direction {
            PageTurn::Next => self.cursor.advance(self.total),
            PageTurn::Previous => self.cursor.retreat(),
        }
    }

    fn touch(&mut self, now: Instant) {
        self.last_seen = now;
    }
}

/// Copy of the visible page, taken so the session lock is not held while rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub row: usize,
    pub start: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub indices: Vec<usize>,
}

impl PageSnapshot {
    fn new(row: usize, cursor: PageCursor, ranked: &[usize]) -> Self {
        Self {
            row,
            start: cursor.start(),
            total: ranked.len(),
            has_previous: cursor.has_previous(),
            has_next: cursor.has_next(ranked.len()),
            indices: cursor.window(ranked).to_vec(),
        }
    }
}

/// Shared application state
///
/// The catalog is immutable and shared without locking. Browse sessions are
/// the only mutable state, one per [`SessionId`], bounded by [`SessionLimits`].
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub sessions: Arc<RwLock<HashMap<SessionId, BrowseSession>>>,
    limits: SessionLimits,
}

impl AppState {
    pub fn new(catalog: Catalog, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            metadata,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            limits: SessionLimits::default(),
        }
    }

    pub fn with_session_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Makes `row` the session's current title and returns the visible page
    ///
    /// Selecting the title the session already has keeps its position; any
    /// other title starts at offset 0. Ranking runs before the session table
    /// is locked.
    pub async fn select_title(&self, session: SessionId, row: usize) -> AppResult<PageSnapshot> {
        let ranked = recommendations::rank_similar(&self.catalog, row)?;
        let now = Instant::now();

        let (cursor, reset) = {
            let mut sessions = self.sessions.write().await;

            match sessions.get_mut(&session) {
                Some(existing) if existing.row() == row => {
                    existing.touch(now);
                    (existing.cursor(), false)
                }
                Some(existing) => {
                    *existing = BrowseSession::new(row, ranked.len());
                    (existing.cursor(), true)
                }
                None => {
                    self.make_room(&mut sessions, now);
                    sessions.insert(session, BrowseSession::new(row, ranked.len()));
                    (PageCursor::new(), true)
                }
            }
        };

        if reset {
            tracing::info!(
                session_id = %session,
                row,
                total = ranked.len(),
                "Title selected, pagination reset"
            );
        }

        Ok(PageSnapshot::new(row, cursor, &ranked))
    }

    /// Moves the session's window one page and returns the visible page
    pub async fn turn_page(&self, session: SessionId, direction: PageTurn) -> AppResult<PageSnapshot> {
        let (row, cursor) = {
            let mut sessions = self.sessions.write().await;
            let browse = sessions.get_mut(&session).ok_or_else(|| {
                AppError::InvalidInput(
                    "No active recommendations for this session; search for a title first"
                        .to_string(),
                )
            })?;

            browse.turn(direction);
            browse.touch(Instant::now());
            (browse.row(), browse.cursor())
        };

        let ranked = recommendations::rank_similar(&self.catalog, row)?;
        Ok(PageSnapshot::new(row, cursor, &ranked))
    }

    /// Drops idle sessions, then the least recently used ones, until one more fits
    fn make_room(&self, sessions: &mut HashMap<SessionId, BrowseSession>, now: Instant) {
        let before = sessions.len();
        let idle_timeout = self.limits.idle_timeout;
        sessions.retain(|_, browse| now.saturating_duration_since(browse.last_seen) < idle_timeout);

        let capacity = self.limits.capacity.max(1);
        while sessions.len() >= capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, browse)| browse.last_seen)
                .map(|(id, _)| *id);

            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = sessions.len(), "Browse sessions evicted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::services::providers::MockMetadataProvider;

    fn state() -> AppState {
        AppState::new(fixtures::catalog(), Arc::new(MockMetadataProvider::new()))
    }

    #[tokio::test]
    async fn test_select_and_page() {
        let state = state();
        let session = SessionId::new();

        let first = state.select_title(session, 0).await.unwrap();
        assert_eq!(first.start, 0);
        assert_eq!(first.total, 7);
        assert_eq!(first.indices, vec![1, 3, 6, 5, 2]);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let second = state.turn_page(session, PageTurn::Next).await.unwrap();
        assert_eq!(second.start, 5);
        assert_eq!(second.indices, vec![4, 7]);
        assert!(!second.has_next);

        let stuck = state.turn_page(session, PageTurn::Next).await.unwrap();
        assert_eq!(stuck, second);

        let back = state.turn_page(session, PageTurn::Previous).await.unwrap();
        assert_eq!(back, first);
    }

    #[tokio::test]
    async fn test_same_title_keeps_position() {
        let state = state();
        let session = SessionId::new();

        state.select_title(session, 0).await.unwrap();
        state.turn_page(session, PageTurn::Next).await.unwrap();

        let again = state.select_title(session, 0).await.unwrap();
        assert_eq!(again.start, 5);
    }

    #[tokio::test]
    async fn test_new_title_resets_position() {
        let state = state();
        let session = SessionId::new();

        state.select_title(session, 0).await.unwrap();
        state.turn_page(session, PageTurn::Next).await.unwrap();

        let switched = state.select_title(session, 3).await.unwrap();
        assert_eq!(switched.row, 3);
        assert_eq!(switched.start, 0);
        assert!(!switched.indices.contains(&3));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let state = state();
        let (alice, bob) = (SessionId::new(), SessionId::new());

        state.select_title(alice, 0).await.unwrap();
        state.select_title(bob, 0).await.unwrap();
        state.turn_page(alice, PageTurn::Next).await.unwrap();

        assert_eq!(state.select_title(bob, 0).await.unwrap().start, 0);
    }

    #[tokio::test]
    async fn test_paging_without_title() {
        let state = state();
        let result = state.turn_page(SessionId::new(), PageTurn::Next).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_session_table_is_bounded() {
        let state = state().with_session_limits(SessionLimits {
            capacity: 3,
            idle_timeout: Duration::from_secs(3600),
        });

        let sessions: Vec<SessionId> = (0..1000).map(|_| SessionId::new()).collect();
        for &session in &sessions {
            state.select_title(session, 0).await.unwrap();
        }

        assert_eq!(state.sessions.read().await.len(), 3);

        let newest = *sessions.last().unwrap();
        assert!(state.turn_page(newest, PageTurn::Next).await.is_ok());

        let result = state.turn_page(sessions[0], PageTurn::Next).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_least_recently_used_session_evicted() {
        let state = state().with_session_limits(SessionLimits {
            capacity: 2,
            idle_timeout: Duration::from_secs(3600),
        });
        let (alice, bob, carol) = (SessionId::new(), SessionId::new(), SessionId::new());

        state.select_title(alice, 0).await.unwrap();
        state.select_title(bob, 0).await.unwrap();
        state.turn_page(alice, PageTurn::Next).await.unwrap();

        // Re-selecting or switching title on a live session never evicts
        state.select_title(bob, 3).await.unwrap();
        assert_eq!(state.sessions.read().await.len(), 2);

        tokio::time::sleep(Duration::from_millis(5)).await;
        state.turn_page(alice, PageTurn::Previous).await.unwrap();
        state.select_title(carol, 0).await.unwrap();

        let sessions = state.sessions.read().await;
        assert!(sessions.contains_key(&alice));
        assert!(sessions.contains_key(&carol));
        assert!(!sessions.contains_key(&bob));
    }

    #[tokio::test]
    async fn test_idle_sessions_pruned_on_insert() {
        let state = state().with_session_limits(SessionLimits {
            capacity: 100,
            idle_timeout: Duration::ZERO,
        });

        for _ in 0..10 {
            state.select_title(SessionId::new(), 0).await.unwrap();
        }

        assert_eq!(state.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_session_stores_no_ranking() {
        let state = state();
        let session = SessionId::new();
        state.select_title(session, 0).await.unwrap();
        state.turn_page(session, PageTurn::Next).await.unwrap();

        let sessions = state.sessions.read().await;
        let browse = &sessions[&session];
        assert_eq!(browse.row(), 0);
        assert_eq!(browse.cursor().start(), 5);
    }

    #[tokio::test]
    async fn test_invalid_row_aborts() {
        let state = state();
        let result = state.select_title(SessionId::new(), 99).await;
        assert!(matches!(result, Err(AppError::InvariantViolation(_))));
        assert!(state.sessions.read().await.is_empty());
    }
}
