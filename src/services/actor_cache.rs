use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};

use crate::error::AppResult;
use crate::models::Actor;

/// Process-wide memo of resolved actors
///
/// Entries are only ever added; there is no eviction and nothing is persisted.
/// Each actor id owns a cell that is filled at most once, so concurrent
/// resolutions of the same id share one piece of work and one entry.
#[derive(Default)]
pub struct ActorCache {
    entries: RwLock<HashMap<i32, Arc<OnceCell<Actor>>>>,
}

impl ActorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the cached actor, if it has been resolved
    #[cfg(test)]
    pub async fn get(&self, actor_id: i32) -> Option<Actor> {
        let entries = self.entries.read().await;
        entries.get(&actor_id).and_then(|cell| cell.get()).cloned()
    }

    /// Returns the cached actor, resolving and inserting it on a miss
    ///
    /// Callers racing on the same id wait for the first resolution instead of
    /// starting their own. A failed resolution inserts nothing, so a later call
    /// retries. Its cell is dropped from the map unless another caller is still
    /// waiting on it.
    pub async fn get_or_try_insert_with<F, Fut>(
        &self,
        actor_id: i32,
        resolve: F,
    ) -> AppResult<Actor>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Actor>>,
    {
        let cell = self.cell(actor_id).await;

        if let Some(actor) = cell.get() {
            tracing::debug!(actor_id, "Actor cache hit");
            return Ok(actor.clone());
        }

        let resolved = cell
            .get_or_try_init(|| async move {
                tracing::debug!(actor_id, "Actor cache miss");
                resolve().await.map(|actor| actor.snapshot())
            })
            .await
            .cloned();

        if resolved.is_err() {
            self.discard_empty(actor_id, &cell).await;
        }

        resolved
    }

    /// Number of resolved actors held
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn discard_empty(&self, actor_id: i32, cell: &Arc<OnceCell<Actor>>) {
        let mut entries = self.entries.write().await;

        // The map and `cell` hold the only references when nobody else is waiting
        let idle = entries
            .get(&actor_id)
            .is_some_and(|entry| Arc::ptr_eq(entry, cell) && Arc::strong_count(cell) == 2);

        if idle && !cell.initialized() {
            entries.remove(&actor_id);
        }
    }

    async fn cell(&self, actor_id: i32) -> Arc<OnceCell<Actor>> {
        if let Some(cell) = self.entries.read().await.get(&actor_id) {
            return cell.clone();
        }

        let mut entries = self.entries.write().await;
        entries
            .entry(actor_id)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Film;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn resolved_actor(id: i32) -> Actor {
        let mut actor = Actor::new(id);
        actor.name = Some("Sigourney Weaver".to_string());
        actor.title = Some("Ripley".to_string());
        actor.films.push(Film::new(348, "Alien".to_string(), None, None));
        actor
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = ActorCache::new();
        assert!(cache.get(10205).await.is_none());

        let first = cache
            .get_or_try_insert_with(10205, || async { Ok(resolved_actor(10205)) })
            .await
            .unwrap();
        let second = cache
            .get_or_try_insert_with(10205, || async {
                let mut other = resolved_actor(10205);
                other.name = Some("Someone Else".to_string());
                Ok(other)
            })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_stored_entry_has_no_role_label() {
        let cache = ActorCache::new();
        cache
            .get_or_try_insert_with(10205, || async { Ok(resolved_actor(10205)) })
            .await
            .unwrap();

        let cached = cache.get(10205).await.unwrap();
        assert_eq!(cached.title, None);
        assert_eq!(cached.films.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = ActorCache::new();

        let result = cache
            .get_or_try_insert_with(1, || async {
                Err(AppError::ExternalApi("catalog down".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);
        assert!(cache.entries.read().await.is_empty());

        let retried = cache
            .get_or_try_insert_with(1, || async { Ok(resolved_actor(1)) })
            .await;
        assert!(retried.is_ok());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_share_one_insert() {
        let cache = Arc::new(ActorCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            tasks.push(tokio::spawn(async move {
                cache
                    .get_or_try_insert_with(42, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(resolved_actor(42))
                    })
                    .await
            }));
        }

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }
}
