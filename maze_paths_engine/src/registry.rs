// Per-topology cache memoization.
//
// A `CacheRegistry` hands out `Arc<PathCache>` keyed by `TopologyId`, so
// every match that reuses a maze shares one cache and construction is paid
// once per topology. Lookups take a read lock; construction happens with no
// lock held, and publishing takes the write lock only to insert. Two threads
// may race to build the same topology: both build, the first to publish
// wins, and both get the published `Arc`.
//
// Lock poisoning is recovered rather than propagated: the map only ever
// holds fully built caches, so a panic elsewhere cannot leave it
// half-updated.

use crate::cache::PathCache;
use crate::config::EngineConfig;
use crate::error::BuildError;
use crate::search::{PathOracle, UniformCostOracle};
use maze_paths_topology::{GraphView, TopologyId};
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct CacheRegistry {
    config: EngineConfig,
    caches: RwLock<FxHashMap<TopologyId, Arc<PathCache>>>,
}

impl CacheRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            caches: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get(&self, topology: TopologyId) -> Option<Arc<PathCache>> {
        let caches = self.caches.read().unwrap_or_else(PoisonError::into_inner);
        caches.get(&topology).cloned()
    }

    /// The cache for `graph`'s topology, building it with the stock oracle on
    /// first use.
    pub fn get_or_build<G: GraphView + Sync + ?Sized>(&self, graph: &G) -> Result<Arc<PathCache>, BuildError> {
        self.get_or_build_with(graph, &UniformCostOracle)
    }

    pub fn get_or_build_with<G, O>(&self, graph: &G, oracle: &O) -> Result<Arc<PathCache>, BuildError>
    where
        G: GraphView + Sync + ?Sized,
        O: PathOracle,
    {
        let topology = graph.topology_id();
        if let Some(cache) = self.get(topology) {
            tracing::debug!(%topology, "path cache hit");
            return Ok(cache);
        }
        tracing::debug!(%topology, "path cache miss");

        let built = Arc::new(PathCache::build(graph, oracle, &self.config)?);
        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(caches.entry(topology).or_insert(built)))
    }

    /// Publish a cache (for example one loaded from disk), replacing any
    /// cache already held for its topology. Returns the replaced cache.
    pub fn insert(&self, cache: PathCache) -> Option<Arc<PathCache>> {
        let topology = cache.topology_id();
        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = caches.insert(topology, Arc::new(cache));
        if replaced.is_some() {
            tracing::warn!(%topology, "replaced an existing path cache");
        }
        replaced
    }

    pub fn remove(&self, topology: TopologyId) -> Option<Arc<PathCache>> {
        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
        caches.remove(&topology)
    }

    pub fn len(&self) -> usize {
        self.caches.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.caches.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
