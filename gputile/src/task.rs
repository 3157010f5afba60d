use log::info;

use crate::common::{SpaceIndex, TileSize, GPU_MAX_THREADS};
use crate::point::ConfigPoint;
use crate::space::{ConfigSpace, DomainError, RangeError};
use crate::utils::{float_product, join_into_string};

/// A thread-tiling problem for one band of a loop nest.
///
/// Holds the [ConfigSpace] of tile assignments for the band's trip counts under a thread budget,
/// and a rough FLOP count used to turn measured times into throughput.
#[derive(Debug, Clone)]
pub struct TileTask {
    name: String,
    space: ConfigSpace,
    flop: f64,
}

impl TileTask {
    /// Builds a task with the [GPU_MAX_THREADS] budget. `band_sizes` are the band's trip counts,
    /// innermost loop first.
    pub fn new(name: impl Into<String>, band_sizes: &[TileSize]) -> Result<Self, DomainError> {
        Self::with_budget(name, band_sizes, GPU_MAX_THREADS)
    }

    pub fn with_budget(
        name: impl Into<String>,
        band_sizes: &[TileSize],
        budget: TileSize,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let space = ConfigSpace::new(budget, band_sizes)?;
        // TODO: Count the statements' actual operations instead of one per iteration.
        let flop = float_product(band_sizes);
        info!(
            "Task {} over band [{}] with budget {} has {} tile configurations",
            name,
            join_into_string(band_sizes, ", "),
            budget,
            space.size()
        );
        Ok(TileTask { name, space, flop })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn space(&self) -> &ConfigSpace {
        &self.space
    }

    pub fn flop(&self) -> f64 {
        self.flop
    }

    pub fn config(&self, index: SpaceIndex) -> Result<ConfigPoint, RangeError> {
        self.space.get(index)
    }
}
