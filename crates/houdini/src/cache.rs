use std::sync::Arc;

use dashmap::DashMap;
use houdini_common::{EcmaView, ModuleId, ModuleType};

/// Scan results kept across builds of one [crate::Bundler].
#[derive(Debug, Clone)]
pub struct CachedModule {
  /// Hash of the loaded source the view was scanned from.
  pub source_hash: u128,
  pub module_type: ModuleType,
  pub view: Arc<EcmaView>,
}

#[derive(Debug, Default)]
pub struct BuildCache {
  modules: DashMap<ModuleId, CachedModule>,
  partitions: DashMap<String, SharedBuildCache>,
}

pub type SharedBuildCache = Arc<BuildCache>;

impl BuildCache {
  /// Returns the cached scan result of `id` if it was scanned from the same source.
  pub fn get(&self, id: &ModuleId, source_hash: u128) -> Option<CachedModule> {
    let cached = self.modules.get(id).filter(|cached| cached.source_hash == source_hash)?;
    tracing::trace!("Cache hit for {id}");
    Some(cached.clone())
  }

  pub fn insert(&self, id: ModuleId, module: CachedModule) {
    self.modules.insert(id, module);
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  /// A nested cache, created on first use. Entries of a partition never collide with entries of
  /// the cache it belongs to or of other partitions.
  pub fn partition(&self, key: &str) -> SharedBuildCache {
    Arc::clone(self.partitions.entry(key.to_string()).or_default().value())
  }

  pub fn has_partition(&self, key: &str) -> bool {
    self.partitions.contains_key(key)
  }

  /// Drops the partition and everything cached in it.
  pub fn release(&self, key: &str) -> bool {
    self.partitions.remove(key).is_some()
  }
}

/// Releases a partition of the cache when dropped, unless it was disarmed. Nested builds keep
/// one while they run, so a build that is dropped midway leaves no partial partition behind.
pub struct PartitionGuard {
  cache: SharedBuildCache,
  key: Option<String>,
}

impl PartitionGuard {
  pub fn new(cache: SharedBuildCache, key: String) -> Self {
    Self { cache, key: Some(key) }
  }

  pub fn disarm(mut self) {
    self.key = None;
  }
}

impl Drop for PartitionGuard {
  fn drop(&mut self) {
    if let Some(key) = self.key.take() {
      tracing::debug!("Releasing cache partition {key:?}");
      self.cache.release(&key);
    }
  }
}

#[test]
fn test_partition_is_isolated() {
  let cache = BuildCache::default();
  let view = Arc::new(EcmaView::default());
  let id = ModuleId::new("/src/paint.js");
  cache.partition("a").insert(
    id.clone(),
    CachedModule { source_hash: 1, module_type: ModuleType::Js, view: Arc::clone(&view) },
  );

  assert!(cache.get(&id, 1).is_none());
  assert!(cache.partition("a").get(&id, 1).is_some());
  assert!(cache.partition("a").get(&id, 2).is_none());
  assert!(cache.partition("b").get(&id, 1).is_none());
}

#[test]
fn test_guard_releases_partition() {
  let cache = Arc::new(BuildCache::default());
  cache.partition("worklet");
  drop(PartitionGuard::new(Arc::clone(&cache), "worklet".to_string()));
  assert!(!cache.has_partition("worklet"));

  cache.partition("worklet");
  PartitionGuard::new(Arc::clone(&cache), "worklet".to_string()).disarm();
  assert!(cache.has_partition("worklet"));
}
