use log::trace;
use std::iter::FusedIterator;
use std::ops::Range;

use crate::common::{SpaceIndex, TileSize, Tiles};
use crate::counts::CountTable;
use crate::point::ConfigPoint;
use crate::utils::join_into_string;

/// The legal thread-tile assignments for a loop nest, addressable by a dense index.
///
/// An assignment gives each dimension `i` a tile size `x_i`. Dimensions consume the thread
/// budget from the outermost (`dim - 1`) inward: dimension `dim - 1` sees the whole budget `N`,
/// and each dimension below it sees what remains after floor division by the tile sizes chosen
/// above it. A legal assignment satisfies `1 <= x_i <= min(bounds[i], n_i)` for the budget `n_i`
/// seen by each dimension.
///
/// Indices enumerate assignments with the outermost dimension varying slowest. [Self::unrank]
/// and [Self::rank] convert between the two in `O(dim * log N)` table lookups, so a search
/// policy can address any candidate without enumerating the space.
///
/// A [ConfigSpace] is immutable once built and may be shared freely between threads.
#[derive(Debug, Clone)]
pub struct ConfigSpace {
    table: CountTable,
    size: u64,
}

/// Invalid construction parameters for a [ConfigSpace].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Thread budget must be positive")]
    ZeroBudget,
    #[error("At least one tiling dimension is required")]
    NoDimensions,
    #[error("Bound for dimension {dim} must be positive")]
    ZeroBound { dim: usize },
}

/// An index or tile assignment outside of a [ConfigSpace].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Index {index} is out of range for a space of size {size}")]
    IndexOutOfRange { index: SpaceIndex, size: u64 },
    #[error("Expected {expected} tile sizes but got {got}")]
    WrongRank { expected: usize, got: usize },
    #[error("Tile size {tile} for dimension {dim} is not in 1..={limit}")]
    TileOutOfRange {
        dim: usize,
        tile: TileSize,
        limit: TileSize,
    },
}

/// Iterator over the [ConfigPoint]s of a [ConfigSpace], in index order.
#[derive(Debug, Clone)]
pub struct Points<'a> {
    space: &'a ConfigSpace,
    indices: Range<SpaceIndex>,
}

impl ConfigSpace {
    /// Builds the space of tile assignments for `bounds` (one entry per dimension, innermost
    /// first) under a thread `budget`.
    pub fn new(budget: TileSize, bounds: &[TileSize]) -> Result<Self, DomainError> {
        if budget == 0 {
            return Err(DomainError::ZeroBudget);
        }
        if bounds.is_empty() {
            return Err(DomainError::NoDimensions);
        }
        if let Some(dim) = bounds.iter().position(|&b| b == 0) {
            return Err(DomainError::ZeroBound { dim });
        }

        let table = CountTable::new(budget, bounds);
        let size = table.count(bounds.len() - 1, budget);
        debug_assert!(size >= 1);
        Ok(ConfigSpace { table, size })
    }

    pub fn budget(&self) -> TileSize {
        self.table.budget()
    }

    pub fn bounds(&self) -> &[TileSize] {
        self.table.bounds()
    }

    pub fn dim(&self) -> usize {
        self.table.bounds().len()
    }

    /// The number of legal tile assignments.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn counts(&self) -> &CountTable {
        &self.table
    }

    pub fn contains(&self, index: SpaceIndex) -> bool {
        index < self.size
    }

    /// Returns the tile assignment at `index`.
    pub fn unrank(&self, index: SpaceIndex) -> Result<Tiles, RangeError> {
        if !self.contains(index) {
            return Err(RangeError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        Ok(self.unrank_unchecked(index))
    }

    /// Returns the index of a tile assignment.
    ///
    /// Fails if `tiles` has the wrong number of dimensions or violates a dimension's bound or
    /// the remaining thread budget.
    pub fn rank(&self, tiles: &[TileSize]) -> Result<SpaceIndex, RangeError> {
        if tiles.len() != self.dim() {
            return Err(RangeError::WrongRank {
                expected: self.dim(),
                got: tiles.len(),
            });
        }

        let mut index = 0;
        let mut n = self.budget();
        for (dim, (&tile, &bound)) in tiles.iter().zip(self.bounds()).enumerate().rev() {
            let limit = bound.min(n);
            if tile == 0 || tile > limit {
                return Err(RangeError::TileOutOfRange { dim, tile, limit });
            }
            index += self.table.prefix(dim, n, tile - 1);
            n /= tile;
        }
        debug_assert!(index < self.size);
        Ok(index)
    }

    /// Returns the [ConfigPoint] at `index`.
    pub fn get(&self, index: SpaceIndex) -> Result<ConfigPoint, RangeError> {
        let tiles = self.unrank(index)?;
        Ok(ConfigPoint::new(index, self.size, tiles))
    }

    pub fn iter(&self) -> Points<'_> {
        Points {
            space: self,
            indices: 0..self.size,
        }
    }

    /// Iterates the points with indices in `indices`, clipped to the space.
    pub fn iter_range(&self, indices: Range<SpaceIndex>) -> Points<'_> {
        let end = indices.end.min(self.size);
        Points {
            space: self,
            indices: indices.start.min(end)..end,
        }
    }

    fn unrank_unchecked(&self, index: SpaceIndex) -> Tiles {
        debug_assert!(self.contains(index));
        let mut tiles = vec![0; self.dim()];
        let mut remaining = index;
        let mut n = self.budget();
        for (dim, &bound) in self.bounds().iter().enumerate().rev() {
            // Find the smallest tile whose prefix count exceeds the remaining index.
            let mut lo = 1;
            let mut hi = bound.min(n);
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if self.table.prefix(dim, n, mid) > remaining {
                    hi = mid;
                } else {
                    lo = mid + 1;
                }
            }
            tiles[dim] = lo;
            remaining -= self.table.prefix(dim, n, lo - 1);
            n /= lo;
        }
        debug_assert_eq!(remaining, 0);
        trace!("Unranked {} to [{}]", index, join_into_string(&tiles, ", "));
        tiles
    }
}

impl<'a> IntoIterator for &'a ConfigSpace {
    type Item = ConfigPoint;
    type IntoIter = Points<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Iterator for Points<'_> {
    type Item = ConfigPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        let tiles = self.space.unrank_unchecked(index);
        Some(ConfigPoint::new(index, self.space.size, tiles))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let index = self.indices.nth(n)?;
        let tiles = self.space.unrank_unchecked(index);
        Some(ConfigPoint::new(index, self.space.size, tiles))
    }
}

impl DoubleEndedIterator for Points<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.indices.next_back()?;
        let tiles = self.space.unrank_unchecked(index);
        Some(ConfigPoint::new(index, self.space.size, tiles))
    }
}

impl ExactSizeIterator for Points<'_> {}

impl FusedIterator for Points<'_> {}
