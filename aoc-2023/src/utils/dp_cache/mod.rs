//! Memoised evaluation of values that depend on other values
//!
//! A [`DpProblem`] names, for every index, the indices it depends on and how
//! to combine their values. [`DpCache`] resolves dependencies recursively and
//! computes each index once.
//!
//! Dependencies must form a DAG; a cycle recurses until the stack overflows.
//!
//! ```
//! use aoc_2023::utils::dp_cache::{DpCache, DpProblem, VecBackend};
//!
//! /// Ways to climb `n` steps taking 1 or 2 at a time
//! struct Stairs;
//!
//! impl DpProblem<usize, u64> for Stairs {
//!     fn deps(&self, n: &usize) -> Vec<usize> {
//!         if *n <= 1 { vec![] } else { vec![n - 1, n - 2] }
//!     }
//!
//!     fn compute(&self, _n: &usize, deps: Vec<u64>) -> u64 {
//!         if deps.is_empty() { 1 } else { deps[0] + deps[1] }
//!     }
//! }
//!
//! let cache = DpCache::new(VecBackend::new(), Stairs);
//! assert_eq!(cache.get(&10), 89);
//! ```

mod backend;
mod cache;
mod problem;

pub use backend::{Backend, HashMapBackend, VecBackend};
pub use cache::DpCache;
pub use problem::{ClosureProblem, DpProblem};

#[cfg(test)]
mod tests;
