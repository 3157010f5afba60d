use itertools::Itertools;

use crate::common::TileSize;

pub fn join_into_string(c: impl IntoIterator<Item = impl ToString>, separator: &str) -> String {
    c.into_iter().map(|d| d.to_string()).join(separator)
}

/// Multiplies trip counts as floating point, so large loop nests can't overflow.
pub fn float_product(values: &[TileSize]) -> f64 {
    values.iter().map(|&v| v as f64).product()
}
