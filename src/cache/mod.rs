use crate::config::CacheStore;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod memory;
pub mod null;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to serialize value: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to parse value: {0}")]
    Deserialization(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Cache trait defining the interface for all cache implementations.
///
/// Implementations must be thread-safe (Send + Sync) and cloneable so a
/// single cache can be shared across concurrent request handlers.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Store a value in the cache under the backend's TTL
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T)
        -> Result<(), CacheError>;

    /// Retrieve a value from the cache
    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError>;

    /// Delete a value from the cache
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Type-safe wrapper around the available cache implementations.
///
/// The concrete implementation is chosen at startup based on configuration;
/// callers only see this enum.
#[derive(Clone)]
pub enum Cache {
    /// In-memory cache implementation using Moka
    InMemory(memory::InMemoryCache),
    /// No-op cache implementation that doesn't actually cache anything
    Null(null::NullCache),
}

#[async_trait::async_trait]
impl CacheBackend for Cache {
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), CacheError> {
        match self {
            Self::InMemory(cache) => cache.set(key, value).await,
            Self::Null(cache) => cache.set(key, value).await,
        }
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        match self {
            Self::InMemory(cache) => cache.get(key).await,
            Self::Null(cache) => cache.get(key).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Self::InMemory(cache) => cache.delete(key).await,
            Self::Null(cache) => cache.delete(key).await,
        }
    }
}

/// Create a cache instance for one cache layer.
///
/// Each layer (RPT tokens, resolved permission lists) gets its own instance
/// so the layers can carry independent TTLs.
pub fn create_cache(
    store: &CacheStore,
    ttl_secs: u64,
    capacity_mib: usize,
) -> Result<Cache, CacheError> {
    match store {
        CacheStore::InMemory => {
            let cache =
                memory::InMemoryCache::new(ttl_secs, capacity_mib).map_err(CacheError::Config)?;
            Ok(Cache::InMemory(cache))
        }
        CacheStore::None => Ok(Cache::Null(null::NullCache::new())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cache::memory::InMemoryCache;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
    struct TestValue {
        field: String,
    }

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let memory_cache = InMemoryCache::new(60, 16).expect("Failed to create cache");
        let cache = Cache::InMemory(memory_cache);

        let test_value = TestValue {
            field: "test_value".to_string(),
        };
        cache
            .set("test_key", &test_value)
            .await
            .expect("Failed to set value");
        let value: Option<TestValue> = cache.get("test_key").await.expect("Failed to get value");
        assert_eq!(value, Some(test_value));

        let value: Option<TestValue> = cache
            .get("non_existent")
            .await
            .expect("Failed to get value");
        assert_eq!(value, None);

        cache
            .delete("test_key")
            .await
            .expect("Failed to delete value");
        let value: Option<TestValue> = cache.get("test_key").await.expect("Failed to get value");
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_cache_ttl() {
        let memory_cache = InMemoryCache::new(1, 16).expect("Failed to create cache"); // 1 second TTL
        let cache = Cache::InMemory(memory_cache);

        let test_value = TestValue {
            field: "ttl_value".to_string(),
        };
        cache
            .set("ttl_key", &test_value)
            .await
            .expect("Failed to set value");

        let value: Option<TestValue> = cache.get("ttl_key").await.expect("Failed to get value");
        assert_eq!(value, Some(test_value));

        tokio::time::sleep(Duration::from_secs(2)).await;

        let value: Option<TestValue> = cache.get("ttl_key").await.expect("Failed to get value");
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_null_store_never_caches() {
        let cache = create_cache(&CacheStore::None, 60, 16).expect("Failed to create cache");

        let test_value = TestValue {
            field: "value".to_string(),
        };
        cache
            .set("key", &test_value)
            .await
            .expect("Failed to set value");
        let value: Option<TestValue> = cache.get("key").await.expect("Failed to get value");
        assert_eq!(value, None);
    }
}
