use std::cell::Cell;

use super::*;

struct Fibonacci;

impl DpProblem<usize, u64> for Fibonacci {
    fn deps(&self, n: &usize) -> Vec<usize> {
        if *n <= 1 { vec![] } else { vec![n - 1, n - 2] }
    }

    fn compute(&self, n: &usize, deps: Vec<u64>) -> u64 {
        if *n <= 1 { *n as u64 } else { deps[0] + deps[1] }
    }
}

/// A(0) = B + C, B(1) = 2D, C(2) = 3D, D(3) = 5
struct Diamond {
    computed: Cell<u32>,
}

impl DpProblem<usize, i32> for Diamond {
    fn deps(&self, n: &usize) -> Vec<usize> {
        match *n {
            0 => vec![1, 2],
            1 | 2 => vec![3],
            _ => vec![],
        }
    }

    fn compute(&self, n: &usize, deps: Vec<i32>) -> i32 {
        self.computed.set(self.computed.get() + 1);
        match *n {
            0 => deps[0] + deps[1],
            1 => deps[0] * 2,
            2 => deps[0] * 3,
            _ => 5,
        }
    }
}

#[test]
fn fibonacci_chain() {
    let cache = DpCache::new(VecBackend::new(), Fibonacci);
    assert_eq!(cache.get(&0), 0);
    assert_eq!(cache.get(&10), 55);
    assert_eq!(cache.get(&90), 2_880_067_194_370_816_120);
}

#[test]
fn shared_dependency_computed_once() {
    let cache = DpCache::new(
        VecBackend::new(),
        Diamond {
            computed: Cell::new(0),
        },
    );
    assert_eq!(cache.get(&0), 25);
    assert_eq!(cache.problem().computed.get(), 4);
    assert_eq!(cache.get(&0), 25);
    assert_eq!(cache.get(&2), 15);
    assert_eq!(cache.problem().computed.get(), 4);
}

#[test]
fn tuple_indices_with_closures() {
    // Lattice paths from (0, 0)
    let cache = DpCache::from_fns(
        HashMapBackend::new(),
        |&(r, c): &(usize, usize)| {
            let mut deps = Vec::new();
            if r > 0 {
                deps.push((r - 1, c));
            }
            if c > 0 {
                deps.push((r, c - 1));
            }
            deps
        },
        |_: &(usize, usize), deps: Vec<u64>| if deps.is_empty() { 1 } else { deps.iter().sum::<u64>() },
    );
    assert_eq!(cache.get(&(4, 4)), 70);
    assert_eq!(cache.get(&(16, 16)), 601_080_390);
}
