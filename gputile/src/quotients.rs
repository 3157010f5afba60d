use std::iter::{self, FusedIterator};

use crate::common::TileSize;

/// The distinct values of `n / i` for `i` in `1..=n`, in ascending order.
///
/// There are only `O(sqrt(n))` such values. Because `(n / a) / b == n / (a * b)`, the set is
/// closed under further floor division: every budget reachable from `n` by repeatedly dividing
/// by positive integers (and staying positive) is one of these values. That makes the set a
/// convenient, small key space for memo tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotientBlocks {
    n: TileSize,
    values: Vec<TileSize>,
}

/// Iterator over `(value, multiplicity)` pairs of a [QuotientBlocks].
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    blocks: &'a QuotientBlocks,
    pos: usize,
}

/// Iterates the distinct values of `n / i` for `i` in `1..=n`, ascending, without allocating.
pub fn quotient_values(n: TileSize) -> impl Iterator<Item = TileSize> + Clone {
    // From `cur`, the next value is the smallest quotient at least `cur + 1`.
    iter::successors((n > 0).then_some(1), move |&cur| {
        (cur < n).then(|| n / (n / (cur + 1)))
    })
}

impl QuotientBlocks {
    pub fn new(n: TileSize) -> Self {
        QuotientBlocks {
            n,
            values: quotient_values(n).collect(),
        }
    }

    pub fn n(&self) -> TileSize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The distinct quotient values, ascending.
    pub fn values(&self) -> &[TileSize] {
        &self.values
    }

    pub fn value(&self, position: usize) -> TileSize {
        self.values[position]
    }

    /// Returns the position of `value` among the quotient values, or `None` if `value` is not
    /// `n / i` for any `i`.
    pub fn position(&self, value: TileSize) -> Option<usize> {
        self.values.binary_search(&value).ok()
    }

    pub fn contains(&self, value: TileSize) -> bool {
        self.position(value).is_some()
    }

    /// The number of `i` in `1..=n` for which `n / i == value`.
    ///
    /// Returns 0 for `value == 0` or values which are not quotients of `n`.
    pub fn multiplicity(&self, value: TileSize) -> TileSize {
        if value == 0 {
            return 0;
        }
        self.n / value - self.n / (value + 1)
    }

    pub fn iter(&self) -> Blocks<'_> {
        Blocks {
            blocks: self,
            pos: 0,
        }
    }
}

impl<'a> IntoIterator for &'a QuotientBlocks {
    type Item = (TileSize, TileSize);
    type IntoIter = Blocks<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Iterator for Blocks<'_> {
    type Item = (TileSize, TileSize);

    fn next(&mut self) -> Option<Self::Item> {
        let value = *self.blocks.values.get(self.pos)?;
        self.pos += 1;
        Some((value, self.blocks.multiplicity(value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.blocks.values.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Blocks<'_> {}

impl FusedIterator for Blocks<'_> {}
