use log::debug;

use crate::common::{TileSize, Tiles};
use crate::quotients::QuotientBlocks;

/// Memoized counts of legal tile assignments.
///
/// For a level `k` (the dimensions `0..=k`) and a budget `n` applied at dimension `k`:
///
/// * `count(k, n)` is the number of legal assignments to dimensions `0..=k`, where the value
///   `x` chosen for dimension `k` satisfies `1 <= x <= min(bounds[k], n)` and dimension `k - 1`
///   is then given the budget `n / x`.
/// * `prefix(k, n, x)` is the number of those assignments whose value at dimension `k` is at
///   most `x`. In particular, `prefix(k, n, bounds[k]) == count(k, n)`.
///
/// Both are tabulated at construction for every budget reachable from the initial budget,
/// which are exactly the values of [QuotientBlocks] for that budget. Prefix counts are only
/// tabulated at those same reachable values of `x`; any other `x` is answered from the nearest
/// tabulated prefix plus a single block of equal quotients.
#[derive(Debug, Clone)]
pub struct CountTable {
    bounds: Vec<TileSize>,
    quotients: QuotientBlocks,
    /// `count(k, a_j)` at `k * m + j`.
    totals: Vec<u64>,
    /// `prefix(k, a_j, a_t)` for `t <= j`, stored as one lower triangle per level.
    prefixes: Vec<u64>,
}

impl CountTable {
    pub fn new(budget: TileSize, bounds: &[TileSize]) -> Self {
        let quotients = QuotientBlocks::new(budget);
        let m = quotients.len();
        let dim = bounds.len();
        let mut table = CountTable {
            bounds: bounds.to_vec(),
            quotients,
            totals: vec![0; dim * m],
            prefixes: vec![0; dim * triangle_len(m)],
        };

        // Each level reads only the totals of the level below it, and the prefixes of a level
        // only read that level's prefixes at smaller `t`.
        for k in 0..dim {
            for j in 0..m {
                let n = table.quotients.value(j);
                let total = table.prefix_by_blocks(k, n, n.min(table.bounds[k]));
                table.totals[k * m + j] = total;
            }
            if k == 0 {
                continue;
            }
            for j in 0..m {
                let n = table.quotients.value(j);
                for t in 0..=j {
                    let x = table.quotients.value(t);
                    let p = table.prefix_clamped(k, n, x);
                    let slot = table.prefix_slot(k, j, t);
                    table.prefixes[slot] = p;
                }
            }
        }

        debug!(
            "Built count table for budget {} over {} dimensions: {} reachable budgets, {} totals, {} prefixes",
            budget,
            dim,
            m,
            table.totals.len(),
            table.prefixes.len()
        );
        table
    }

    pub fn budget(&self) -> TileSize {
        self.quotients.n()
    }

    pub fn bounds(&self) -> &[TileSize] {
        &self.bounds
    }

    /// The budgets reachable from [Self::budget] by nested floor division.
    pub fn reachable(&self) -> &QuotientBlocks {
        &self.quotients
    }

    /// The number of legal assignments to dimensions `0..=k` given budget `n` at dimension `k`.
    ///
    /// Returns 0 if `k` is not a dimension or `n == 0`. Budgets which are not reachable from
    /// [Self::budget] are counted on demand.
    pub fn count(&self, k: usize, n: TileSize) -> u64 {
        if k >= self.bounds.len() || n == 0 {
            return 0;
        }
        match self.quotients.position(n) {
            Some(j) => self.totals[k * self.quotients.len() + j],
            None => self.prefix_by_blocks(k, n, n.min(self.bounds[k])),
        }
    }

    /// The number of legal assignments to dimensions `0..=k`, given budget `n` at dimension
    /// `k`, whose value at dimension `k` is at most `x`.
    ///
    /// Non-decreasing in `x`. Returns 0 if `k` is not a dimension, `n == 0`, or `x == 0`.
    pub fn prefix(&self, k: usize, n: TileSize, x: TileSize) -> u64 {
        if k >= self.bounds.len() || n == 0 || x == 0 {
            return 0;
        }
        let x = x.min(n).min(self.bounds[k]);
        if k == 0 {
            return x;
        }
        self.prefix_clamped(k, n, x)
    }

    /// Counts for the dimensions below `k`, given the budget left over for them.
    fn inner_count(&self, k: usize, n: TileSize) -> u64 {
        if k == 0 {
            u64::from(n >= 1)
        } else {
            self.count(k - 1, n)
        }
    }

    /// `prefix` for `k >= 1` and `1 <= x <= n`, ignoring the bound on dimension `k`.
    fn prefix_clamped(&self, k: usize, n: TileSize, x: TileSize) -> u64 {
        debug_assert!(k >= 1 && 1 <= x && x <= n);
        if x == 1 {
            return self.inner_count(k, n);
        }
        // Every `j` in `q + 1..=x` shares the quotient `n / x`, and `q` is a quotient of `n`.
        let v = n / x;
        let q = n / (v + 1);
        self.tabulated_prefix(k, n, q) + (x - q) * self.inner_count(k, v)
    }

    fn tabulated_prefix(&self, k: usize, n: TileSize, x: TileSize) -> u64 {
        match (self.quotients.position(n), self.quotients.position(x)) {
            (Some(j), Some(t)) if t <= j => self.prefixes[self.prefix_slot(k, j, t)],
            _ => self.prefix_by_blocks(k, n, x),
        }
    }

    /// Sums `inner_count(k, n / j)` for `j` in `1..=x`, one block of equal quotients at a time.
    fn prefix_by_blocks(&self, k: usize, n: TileSize, x: TileSize) -> u64 {
        let mut total = 0;
        let mut j = 1;
        while j <= x {
            let v = n / j;
            let block_end = (n / v).min(x);
            total += (block_end - j + 1) * self.inner_count(k, v);
            j = block_end + 1;
        }
        total
    }

    fn prefix_slot(&self, k: usize, j: usize, t: usize) -> usize {
        debug_assert!(t <= j);
        k * triangle_len(self.quotients.len()) + j * (j + 1) / 2 + t
    }
}

fn triangle_len(m: usize) -> usize {
    m * (m + 1) / 2
}

/// Counts legal assignments by direct nested enumeration.
///
/// This is exponential in the number of dimensions; it exists as an oracle for [CountTable].
pub fn brute_force_count(bounds: &[TileSize], n: TileSize) -> u64 {
    match bounds.split_last() {
        None => u64::from(n >= 1),
        Some((&bound, rest)) => (1..=bound.min(n))
            .map(|x| brute_force_count(rest, n / x))
            .sum(),
    }
}

/// Enumerates legal assignments by direct nested enumeration.
///
/// Assignments are returned in index order: the outermost (last) dimension varies slowest.
pub fn brute_force_tiles(bounds: &[TileSize], n: TileSize) -> Vec<Tiles> {
    match bounds.split_last() {
        None if n >= 1 => vec![vec![]],
        None => vec![],
        Some((&bound, rest)) => (1..=bound.min(n))
            .flat_map(|x| {
                brute_force_tiles(rest, n / x).into_iter().map(move |mut t| {
                    t.push(x);
                    t
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds_and_budget_strategy() -> impl Strategy<Value = (Vec<TileSize>, TileSize)> {
        (prop::collection::vec(1u64..=24, 1..=4), 1u64..=200)
    }

    #[test]
    fn test_count_two_by_two() {
        let table = CountTable::new(4, &[2, 2]);
        assert_eq!(table.count(1, 4), 4);
        assert_eq!(table.count(0, 4), 2);
        assert_eq!(table.count(0, 1), 1);
    }

    #[test]
    fn test_count_three_by_four() {
        // Outer values 1..=4 leave 8, 4, 2, 2 threads; inner choices are 3, 3, 2, 2.
        let table = CountTable::new(8, &[3, 4]);
        assert_eq!(table.count(1, 8), 10);
        assert_eq!(table.prefix(1, 8, 0), 0);
        assert_eq!(table.prefix(1, 8, 1), 3);
        assert_eq!(table.prefix(1, 8, 2), 6);
        assert_eq!(table.prefix(1, 8, 3), 8);
        assert_eq!(table.prefix(1, 8, 4), 10);
        assert_eq!(table.prefix(1, 8, 100), 10);
    }

    #[test]
    fn test_zero_budget_and_out_of_range_levels_count_nothing() {
        let table = CountTable::new(16, &[4, 4]);
        assert_eq!(table.count(0, 0), 0);
        assert_eq!(table.count(2, 16), 0);
        assert_eq!(table.prefix(1, 0, 3), 0);
        assert_eq!(table.prefix(1, 16, 0), 0);
        assert_eq!(table.prefix(5, 16, 3), 0);
    }

    #[test]
    fn test_unreachable_budget_falls_back() {
        let table = CountTable::new(64, &[8, 8, 8]);
        assert!(!table.reachable().contains(50));
        assert_eq!(table.count(2, 50), brute_force_count(&[8, 8, 8], 50));
        assert_eq!(table.count(1, 50), brute_force_count(&[8, 8], 50));
        assert_eq!(table.prefix(2, 50, 8), table.count(2, 50));
    }

    #[test]
    fn test_gpu_sized_table_matches_oracle() {
        let bounds = [32, 16, 8];
        let table = CountTable::new(512, &bounds);
        assert_eq!(table.count(2, 512), brute_force_count(&bounds, 512));
    }

    #[test]
    fn test_brute_force_tiles_ordering() {
        assert_eq!(
            brute_force_tiles(&[2, 2], 4),
            vec![vec![1, 1], vec![2, 1], vec![1, 2], vec![2, 2]]
        );
        assert!(brute_force_tiles(&[3], 0).is_empty());
    }

    proptest! {
        #[test]
        fn test_count_matches_brute_force((bounds, n) in bounds_and_budget_strategy()) {
            let table = CountTable::new(n, &bounds);
            for k in 0..bounds.len() {
                for &b in table.reachable().values() {
                    prop_assert_eq!(table.count(k, b), brute_force_count(&bounds[..=k], b));
                }
            }
        }

        #[test]
        fn test_count_matches_brute_force_on_any_budget(
            (bounds, n) in bounds_and_budget_strategy(),
            other in 1u64..=200,
        ) {
            let table = CountTable::new(n, &bounds);
            let top = bounds.len() - 1;
            prop_assert_eq!(table.count(top, other), brute_force_count(&bounds, other));
        }

        #[test]
        fn test_prefix_matches_direct_sum((bounds, n) in bounds_and_budget_strategy()) {
            let table = CountTable::new(n, &bounds);
            for k in 0..bounds.len() {
                for &b in table.reachable().values() {
                    let mut expected = 0;
                    for x in 1..=b.min(bounds[k]) {
                        expected += brute_force_count(&bounds[..k], b / x);
                        prop_assert_eq!(table.prefix(k, b, x), expected);
                    }
                    prop_assert_eq!(table.prefix(k, b, bounds[k]), table.count(k, b));
                }
            }
        }

        #[test]
        fn test_prefix_is_monotone((bounds, n) in bounds_and_budget_strategy()) {
            let table = CountTable::new(n, &bounds);
            let k = bounds.len() - 1;
            for x in 0..=n {
                prop_assert!(table.prefix(k, n, x) <= table.prefix(k, n, x + 1));
            }
        }
    }
}
