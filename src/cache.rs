//! Cache-aside layer over Redis.
//!
//! The cache is strictly an optimization in front of Postgres: every call
//! here is best-effort, backend errors degrade to a miss or a no-op, and a
//! missing `REDIS_URL` puts the whole client into a fully functional
//! disabled mode where every read is a miss and every write does nothing.

use std::future::Future;

use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::error::AppError;

#[derive(Clone)]
pub struct CacheClient {
    conn: Option<ConnectionManager>,
}

impl CacheClient {
    /// Connect to the cache backend. `None` (or an unreachable backend)
    /// yields a disabled client rather than an error: the application must
    /// stay fully correct without a cache.
    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else {
            info!("REDIS_URL not set, cache disabled");
            return Self { conn: None };
        };

        let client = match Client::open(url) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "invalid redis URL, cache disabled");
                return Self { conn: None };
            }
        };
        match client.get_connection_manager().await {
            Ok(conn) => {
                info!("cache backend connected");
                Self { conn: Some(conn) }
            }
            Err(e) => {
                warn!(error = %e, "cache backend unreachable, cache disabled");
                Self { conn: None }
            }
        }
    }

    pub fn disabled() -> Self {
        Self { conn: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    /// Get and deserialize a cached value. Any backend or decode error is
    /// treated as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone()?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(key, error = %e, "cached value failed to decode, treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                debug!(key, error = %e, "cache get failed, treating as miss");
                None
            }
        }
    }

    /// Store a value with a TTL. Failures are swallowed.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) {
        let Some(conn) = &self.conn else { return };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(key, error = %e, "cache value failed to encode, skipping set");
                return;
            }
        };
        let mut conn = conn.clone();
        if let Err(e) = conn.set_ex::<_, _, ()>(key, raw, ttl_seconds).await {
            debug!(key, error = %e, "cache set failed, ignoring");
        }
    }

    /// Best-effort deletion of explicit keys.
    pub async fn del(&self, keys: &[String]) {
        let Some(conn) = &self.conn else { return };
        if keys.is_empty() {
            return;
        }
        let mut conn = conn.clone();
        if let Err(e) = conn.del::<_, ()>(keys).await {
            debug!(?keys, error = %e, "cache del failed, ignoring");
        }
    }

    /// Best-effort bulk deletion by glob pattern, via an incremental SCAN
    /// so the full keyspace is never loaded at once.
    pub async fn del_pattern(&self, pattern: &str) {
        let Some(conn) = &self.conn else { return };
        let mut conn = conn.clone();
        let mut cursor: u64 = 0;
        loop {
            let reply: Result<(u64, Vec<String>), _> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await;
            match reply {
                Ok((next, batch)) => {
                    if !batch.is_empty() {
                        if let Err(e) = conn.del::<_, ()>(batch).await {
                            debug!(pattern, error = %e, "cache del batch failed, ignoring");
                        }
                    }
                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }
                Err(e) => {
                    debug!(pattern, error = %e, "cache scan failed, aborting pattern delete");
                    break;
                }
            }
        }
    }

    /// Read-through helper: return the cached value if present, otherwise
    /// run `compute` and return its result immediately. The cache write
    /// happens on a detached task so population never adds latency to the
    /// caller and its failure is dropped.
    pub async fn with_cache<T, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: u64,
        compute: F,
    ) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(hit) = self.get_json::<T>(key).await {
            return Ok(hit);
        }

        let value = compute().await?;

        if self.is_enabled() {
            let cache = self.clone();
            let key = key.to_string();
            let snapshot = value.clone();
            tokio::spawn(async move {
                cache.set_json(&key, &snapshot, ttl_seconds).await;
            });
        }

        Ok(value)
    }
}

/// Centralized cache key construction. Writers invalidate by exact key
/// where they can enumerate it, and by the `*_prefix` patterns where
/// they cannot.
pub mod keys {
    use uuid::Uuid;

    pub fn shopping_list(user_id: Uuid, list_id: Uuid) -> String {
        format!("user:{user_id}:shopping-list:{list_id}")
    }

    /// Paginated, so writers cannot enumerate every live key; they
    /// invalidate with `shopping_lists_prefix` instead.
    pub fn shopping_lists_page(user_id: Uuid, limit: i64, offset: i64) -> String {
        format!("user:{user_id}:shopping-lists:{limit}:{offset}")
    }

    pub fn shopping_lists_prefix(user_id: Uuid) -> String {
        format!("user:{user_id}:shopping-lists:*")
    }

    pub fn meal_plan(user_id: Uuid, plan_id: Uuid) -> String {
        format!("user:{user_id}:meal-plan:{plan_id}")
    }

    pub fn meal_plan_prefix(user_id: Uuid) -> String {
        format!("user:{user_id}:meal-plan:*")
    }

    pub fn catalog_recipe(recipe_id: Uuid) -> String {
        format!("catalog:recipe:{recipe_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_client_always_misses() {
        let cache = CacheClient::disabled();
        cache.set_json("k", &42u32, 60).await;
        assert_eq!(cache.get_json::<u32>("k").await, None);
    }

    #[tokio::test]
    async fn disabled_del_is_noop() {
        let cache = CacheClient::disabled();
        cache.del(&["a".into(), "b".into()]).await;
        cache.del_pattern("user:*").await;
    }

    #[tokio::test]
    async fn with_cache_disabled_calls_compute() {
        let cache = CacheClient::disabled();
        let value = cache
            .with_cache("k", 60, || async { Ok::<_, AppError>(7u32) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        // compute runs every time in disabled mode
        let again = cache
            .with_cache("k", 60, || async { Ok::<_, AppError>(8u32) })
            .await
            .unwrap();
        assert_eq!(again, 8);
    }

    #[tokio::test]
    async fn with_cache_propagates_compute_errors() {
        let cache = CacheClient::disabled();
        let res: Result<u32, AppError> = cache
            .with_cache("k", 60, || async {
                Err(AppError::NotFound("missing".into()))
            })
            .await;
        assert!(matches!(res, Err(AppError::NotFound(_))));
    }

    #[test]
    fn key_builders() {
        let user = uuid::Uuid::nil();
        let id = uuid::Uuid::nil();
        assert_eq!(
            keys::meal_plan(user, id),
            format!("user:{user}:meal-plan:{id}")
        );
        assert!(keys::meal_plan(user, id).starts_with(
            keys::meal_plan_prefix(user).trim_end_matches('*')
        ));
        assert!(keys::shopping_lists_page(user, 20, 0).starts_with(
            keys::shopping_lists_prefix(user).trim_end_matches('*')
        ));
    }
}
