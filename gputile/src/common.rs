/// A tile size, trip count, or thread budget. Always positive once validated.
pub type TileSize = u64;

/// A dense position within a [crate::space::ConfigSpace].
pub type SpaceIndex = u64;

/// A tile-size assignment, one entry per dimension.
///
/// Entry `0` is the innermost dimension; the last entry is the outermost and is the first one
/// to consume the thread budget.
pub type Tiles = Vec<TileSize>;

/// The default thread budget: the maximum number of threads in a block on the GPUs we target.
pub const GPU_MAX_THREADS: TileSize = 512;
