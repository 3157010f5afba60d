use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::common::{SpaceIndex, TileSize, Tiles};
use crate::utils::join_into_string;

/// A tile assignment along with its index in, and the size of, the space it came from.
///
/// This is the unit handed to search policies and written to tuning records. It serializes as
/// a flat record: `{"index": .., "total": .., "tile": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigPoint {
    index: SpaceIndex,
    #[serde(rename = "total")]
    size: u64,
    #[serde(rename = "tile")]
    tiles: Tiles,
}

/// Failure to encode or decode a [ConfigPoint] record.
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("JSON point record error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Binary point record error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Point index {index} is not less than its space size {size}")]
    IndexOutOfRange { index: SpaceIndex, size: u64 },
    #[error("Point has no tile sizes")]
    EmptyTile,
}

impl ConfigPoint {
    pub(crate) fn new(index: SpaceIndex, size: u64, tiles: Tiles) -> Self {
        debug_assert!(index < size);
        ConfigPoint { index, size, tiles }
    }

    pub fn index(&self) -> SpaceIndex {
        self.index
    }

    /// The size of the space this point was drawn from.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Tile sizes, innermost dimension first.
    pub fn tiles(&self) -> &[TileSize] {
        &self.tiles
    }

    pub fn into_tiles(self) -> Tiles {
        self.tiles
    }

    /// Whether the record is self-consistent: its index lies inside its space and it carries at
    /// least one tile size. Points produced by a [crate::space::ConfigSpace] always are.
    pub fn is_valid(&self) -> bool {
        self.index < self.size && !self.tiles.is_empty()
    }

    /// Threads in a block launched with this assignment.
    pub fn threads(&self) -> u64 {
        self.tiles.iter().product()
    }

    /// The point's position in its space, normalized to `[0, 1)`.
    ///
    /// This is the only feature offered to learned search heuristics.
    pub fn feature(&self) -> [f32; 1] {
        [(self.index as f64 / self.size as f64) as f32]
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, RecordError> {
        let point: ConfigPoint = serde_json::from_str(s)?;
        point.validated()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        let point: ConfigPoint = bincode::deserialize(bytes)?;
        point.validated()
    }

    fn validated(self) -> Result<Self, RecordError> {
        if self.index >= self.size {
            return Err(RecordError::IndexOutOfRange {
                index: self.index,
                size: self.size,
            });
        }
        if self.tiles.is_empty() {
            return Err(RecordError::EmptyTile);
        }
        Ok(self)
    }
}

impl Display for ConfigPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] #{}/{}",
            join_into_string(&self.tiles, ", "),
            self.index,
            self.size
        )
    }
}
