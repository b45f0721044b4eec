//! Recipe directory: the searchable list behind the home page.
//!
//! Search text is debounced before it reaches the server; a category change
//! or an explicit refresh fetches at once. Every fetch is tagged with a
//! sequence number and only the response to the latest one is published,
//! so a slow early search can never overwrite a newer result.

use crate::client::api::RecipeSource;
use crate::models::{Recipe, RecipeQuery};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

/// What the list page renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectorySnapshot {
    /// A fetch is in flight.
    pub loading: bool,
    /// The last completed fetch failed.
    pub failed: bool,
    /// Raw server result for `query`, newest first.
    pub recipes: Vec<Recipe>,
    /// The query `recipes` answers.
    pub query: RecipeQuery,
}

struct Inner {
    source: Arc<dyn RecipeSource>,
    snapshot: watch::Sender<DirectorySnapshot>,
    query: Mutex<RecipeQuery>,
    latest_request: AtomicU64,
    search_generation: AtomicU64,
}

#[derive(Clone)]
pub struct RecipeDirectory {
    inner: Arc<Inner>,
}

impl RecipeDirectory {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        let (snapshot, _) = watch::channel(DirectorySnapshot::default());
        Self {
            inner: Arc::new(Inner {
                source,
                snapshot,
                query: Mutex::new(RecipeQuery::default()),
                latest_request: AtomicU64::new(0),
                search_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DirectorySnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Record a keystroke. The fetch happens once the text has been stable
    /// for [`SEARCH_DEBOUNCE`]; earlier pending keystrokes are dropped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        let generation = self.inner.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;
            if inner.search_generation.load(Ordering::SeqCst) != generation {
                return;
            }
            let query = inner.update_query(|q| q.search = Some(text));
            inner.fetch(query).await;
        });
    }

    /// Switch category and fetch immediately. An empty string clears it.
    pub async fn set_category(&self, category: impl Into<String>) {
        let category = category.into();
        let query = self.inner.update_query(|q| q.category = Some(category));
        self.inner.fetch(query).await;
    }

    /// Re-fetch the current query.
    pub async fn refresh(&self) {
        let query = self.inner.update_query(|_| {});
        self.inner.fetch(query).await;
    }
}

impl Inner {
    fn update_query(&self, edit: impl FnOnce(&mut RecipeQuery)) -> RecipeQuery {
        let mut query = self.query.lock().unwrap_or_else(PoisonError::into_inner);
        edit(&mut query);
        *query = std::mem::take(&mut *query).normalized();
        query.clone()
    }

    async fn fetch(&self, query: RecipeQuery) {
        let seq = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshot.send_modify(|s| s.loading = true);

        let result = self.source.list(&query).await;

        if self.latest_request.load(Ordering::SeqCst) != seq {
            tracing::debug!(seq, search = ?query.search, "Discarding stale recipe list");
            return;
        }

        self.snapshot.send_modify(|s| {
            s.loading = false;
            s.query = query;
            match result {
                Ok(recipes) => {
                    s.failed = false;
                    s.recipes = recipes;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load recipes");
                    s.failed = true;
                    s.recipes.clear();
                }
            }
        });
    }
}
