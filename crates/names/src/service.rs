//! Mutable-name service: publish, resolve, update history, cache lifecycle.

use crate::error::{NameError, NameResult};
use moor_core::{ContentAddress, NameConfig, NameRecord, NameUpdate};
use moor_store::{KeyType, NameRouter, PublicKeyInfo, PublishOptions};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Options for a resolve call.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolveOptions {
    /// Bypass the cache and force a live resolution.
    pub no_cache: bool,
}

/// Mutable-name service over a [`NameRouter`].
///
/// Caches resolutions per name, keeps an append-only update history, and
/// re-resolves published names on a background schedule. All mutable state
/// is owned by the instance; independent services never share a cache.
pub struct NameService {
    router: Arc<dyn NameRouter>,
    config: NameConfig,
    cache: Mutex<HashMap<String, NameRecord>>,
    /// Names registered for background re-resolution.
    refresh_set: Mutex<HashSet<String>>,
}

impl NameService {
    /// Create a name service over a router.
    pub fn new(router: Arc<dyn NameRouter>, config: NameConfig) -> Self {
        Self {
            router,
            config,
            cache: Mutex::new(HashMap::new()),
            refresh_set: Mutex::new(HashSet::new()),
        }
    }

    /// Provision a signing identity for a name.
    ///
    /// Fails with [`NameError::KeyExists`] if the name is already taken.
    pub async fn create_key(&self, name: &str, key_type: KeyType) -> NameResult<PublicKeyInfo> {
        let info = self.router.create_key(name, key_type).await?;
        tracing::debug!(name, "signing key created");
        Ok(info)
    }

    /// Remove a name's signing identity and tear down its refresh schedule.
    pub async fn remove_key(&self, name: &str) -> NameResult<()> {
        self.router.remove_key(name).await?;
        self.refresh_set.lock().await.remove(name);
        self.cache.lock().await.remove(name);
        tracing::debug!(name, "signing key removed, refresh torn down");
        Ok(())
    }

    /// Publish an address under a name.
    ///
    /// The address is validated structurally before any router call; a
    /// malformed address never reaches the network.
    pub async fn publish(
        &self,
        name: &str,
        address: &str,
        options: PublishOptions,
    ) -> NameResult<NameRecord> {
        let address = ContentAddress::parse(address)?;
        let options = self.fill_publish_defaults(options);
        let published = self.router.publish(name, &address, options).await?;

        let record = {
            let mut cache = self.cache.lock().await;
            let record = match cache.remove(name) {
                // Preserve accumulated history across republishes.
                Some(mut existing) => {
                    existing.address = address.clone();
                    existing.seq = published.seq;
                    existing.resolved_at = OffsetDateTime::now_utc();
                    existing
                }
                None => NameRecord::new(name, address.clone(), published.seq),
            };
            cache.insert(name.to_string(), record.clone());
            record
        };

        if self.config.auto_refresh {
            self.refresh_set.lock().await.insert(name.to_string());
        }

        tracing::info!(name, address = %address, seq = published.seq, "name published");
        Ok(record)
    }

    /// Resolve a name, serving from cache while the entry is fresh.
    pub async fn resolve(&self, name: &str, options: ResolveOptions) -> NameResult<NameRecord> {
        if !options.no_cache {
            let cache = self.cache.lock().await;
            if let Some(record) = cache.get(name) {
                if record.age() < self.refresh_window() {
                    return Ok(record.clone());
                }
            }
        }

        self.resolve_live(name).await
    }

    /// Publish a new address for a name, recording the transition.
    ///
    /// Resolves the current record first so the prior address is captured
    /// in the update history.
    pub async fn update(&self, name: &str, new_address: &str) -> NameResult<NameRecord> {
        let new_address = ContentAddress::parse(new_address)?;
        let prior = self.resolve(name, ResolveOptions::default()).await?;

        let published = self
            .router
            .publish(
                name,
                &new_address,
                self.fill_publish_defaults(PublishOptions::default()),
            )
            .await?;

        let update = NameUpdate {
            from: prior.address.clone(),
            to: new_address.clone(),
            seq: published.seq,
            at: OffsetDateTime::now_utc(),
        };

        let mut cache = self.cache.lock().await;
        let record = match cache.remove(name) {
            Some(mut existing) => {
                existing.address = new_address.clone();
                existing.seq = published.seq;
                existing.resolved_at = OffsetDateTime::now_utc();
                existing.history.push(update);
                existing
            }
            None => {
                let mut record = NameRecord::new(name, new_address.clone(), published.seq);
                record.history.push(update);
                record
            }
        };
        cache.insert(name.to_string(), record.clone());

        tracing::info!(
            name,
            from = %record.history.last().map(|u| u.from.as_str()).unwrap_or("-"),
            to = %new_address,
            seq = published.seq,
            "name updated"
        );
        Ok(record)
    }

    /// Update history for a name, oldest first.
    pub async fn history(&self, name: &str) -> Vec<NameUpdate> {
        self.cache
            .lock()
            .await
            .get(name)
            .map(|record| record.history.clone())
            .unwrap_or_default()
    }

    /// Evict cache entries past twice the refresh interval.
    ///
    /// Stale entries (older than one interval) are left in place; a read
    /// re-resolves them. Only entries past the eviction age are purged.
    pub async fn cleanup_expired_records(&self) -> usize {
        let eviction_age = time::Duration::try_from(self.config.eviction_age())
            .unwrap_or(time::Duration::MAX);
        let mut cache = self.cache.lock().await;
        let before = cache.len();
        cache.retain(|_, record| record.age() < eviction_age);
        let evicted = before - cache.len();
        if evicted > 0 {
            tracing::debug!(evicted, "expired name records evicted");
        }
        evicted
    }

    /// Re-resolve every name registered for auto-refresh.
    ///
    /// Names that can no longer be resolved (key removed, publish expired)
    /// are dropped from the schedule. Failures are logged, never raised.
    pub async fn refresh_sweep(&self) {
        let due: Vec<String> = self.refresh_set.lock().await.iter().cloned().collect();
        for name in due {
            match self.resolve_live(&name).await {
                Ok(record) => {
                    tracing::trace!(name = %name, address = %record.address, "name refreshed");
                }
                Err(NameError::NotPublished(_)) | Err(NameError::KeyNotFound(_)) => {
                    tracing::debug!(name = %name, "dropping unresolvable name from refresh");
                    self.refresh_set.lock().await.remove(&name);
                }
                Err(err) => {
                    tracing::warn!(name = %name, error = %err, "auto-refresh failed");
                }
            }
        }
    }

    /// Whether a name is registered for auto-refresh.
    pub async fn is_registered_for_refresh(&self, name: &str) -> bool {
        self.refresh_set.lock().await.contains(name)
    }

    /// Number of cached name records.
    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Refresh sweep interval from the configuration.
    pub fn refresh_interval(&self) -> std::time::Duration {
        self.config.refresh_interval()
    }

    /// Force a cache entry's resolution timestamp into the past.
    ///
    /// **For testing only.** Lets tests exercise staleness and eviction
    /// without sleeping through real intervals.
    pub async fn force_age(&self, name: &str, age: std::time::Duration) {
        if let Some(record) = self.cache.lock().await.get_mut(name) {
            record.resolved_at = OffsetDateTime::now_utc()
                - time::Duration::try_from(age).unwrap_or(time::Duration::ZERO);
        }
    }

    fn fill_publish_defaults(&self, options: PublishOptions) -> PublishOptions {
        PublishOptions {
            lifetime: options.lifetime.or(Some(std::time::Duration::from_secs(
                self.config.default_lifetime_secs,
            ))),
            ttl: options.ttl.or(Some(std::time::Duration::from_secs(
                self.config.default_ttl_secs,
            ))),
        }
    }

    fn refresh_window(&self) -> time::Duration {
        time::Duration::try_from(self.config.refresh_interval())
            .unwrap_or(time::Duration::MAX)
    }

    async fn resolve_live(&self, name: &str) -> NameResult<NameRecord> {
        let resolved = self.router.resolve(name).await?;

        let mut cache = self.cache.lock().await;
        let record = match cache.remove(name) {
            // The router's seq is authoritative: an eviction or an external
            // republish must never let the cached seq lag the address.
            Some(mut existing) => {
                existing.address = resolved.address;
                existing.seq = resolved.seq;
                existing.resolved_at = OffsetDateTime::now_utc();
                existing
            }
            None => NameRecord::new(name, resolved.address, resolved.seq),
        };
        cache.insert(name.to_string(), record.clone());
        Ok(record)
    }
}
