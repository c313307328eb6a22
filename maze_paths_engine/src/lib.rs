// maze_paths_engine: precomputed maze distances under a no-reversal rule.
//
// A maze is decomposed into junctions (nodes offering more than two moves)
// and the corridors between them. Construction builds two tables once per
// topology; queries then stitch stored segments together and never search.
//
// Module overview:
// - `search.rs`:   PathOracle trait + UniformCostOracle, the construction-time search.
// - `approach.rs`: Nearest-junction table: each node's corridor walks to a junction.
// - `junction.rs`: Junction-to-junction table, keyed by exit move, built in parallel.
// - `stitch.rs`:   Query algorithms: undirected and directed path stitching.
// - `cache.rs`:    PathCache, the immutable per-topology value callers query.
// - `registry.rs`: CacheRegistry, `Arc<PathCache>` memoized per topology id.
// - `config.rs`:   EngineConfig, construction knobs loaded from JSON.
// - `error.rs`:    BuildError, QueryError, CacheError, ConfigError.
//
// **Critical constraint: determinism.** Tables are built in canonical move
// order and ascending node order, so ties between equal-length paths always
// resolve the same way, with or without the parallel build.

pub mod approach;
pub mod cache;
pub mod config;
pub mod error;
pub mod junction;
pub mod registry;
pub mod search;
mod stitch;

pub use approach::{JunctionApproach, NodeApproaches};
pub use cache::PathCache;
pub use config::EngineConfig;
pub use error::{BuildError, CacheError, ConfigError, QueryError};
pub use junction::{ExitPaths, Junction, JunctionIndex, JunctionIndexMap, JunctionTable};
pub use registry::CacheRegistry;
pub use search::{PathOracle, UniformCostOracle};
