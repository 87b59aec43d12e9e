use serde::Deserialize;

/// Specifies which cache store implementation to use
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStore {
    #[default]
    InMemory,
    #[serde(other)]
    None,
}

/// Configuration for the caching subsystem
#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    /// Cache store type: "in-memory" (default) or "none"
    #[serde(default)]
    pub store: CacheStore,

    /// TTL for cached RPT tokens in seconds (default: 5 minutes).
    /// 0 means each entry lives as long as the token's own expiry.
    #[serde(default = "default_rpt_ttl")]
    pub rpt_ttl: u64,

    /// TTL for resolved permission lists in seconds (default: 1 minute)
    #[serde(default = "default_permission_ttl")]
    pub permission_ttl: u64,

    /// Maximum capacity per cache in MiB (default: 64 MiB)
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_rpt_ttl() -> u64 {
    300
}

fn default_permission_ttl() -> u64 {
    60
}

fn default_capacity() -> usize {
    64
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            store: CacheStore::default(),
            rpt_ttl: default_rpt_ttl(),
            permission_ttl: default_permission_ttl(),
            capacity: default_capacity(),
        }
    }
}
