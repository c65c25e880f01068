use std::cell::RefCell;
use std::marker::PhantomData;

use super::backend::Backend;
use super::problem::{ClosureProblem, DpProblem};

/// Lazily computed, memoised values of a [`DpProblem`].
///
/// Values are cloned out on every [`DpCache::get`]; keep `K` cheap to clone.
pub struct DpCache<I, K, B, P> {
    backend: RefCell<B>,
    problem: P,
    _phantom: PhantomData<fn(&I) -> K>,
}

impl<I, K, B, P> DpCache<I, K, B, P>
where
    I: Clone,
    K: Clone,
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    pub fn new(backend: B, problem: P) -> Self {
        Self {
            backend: RefCell::new(backend),
            problem,
            _phantom: PhantomData,
        }
    }

    /// Value at `index`, computing it and its dependencies on first use
    pub fn get(&self, index: &I) -> K {
        if let Some(value) = self.backend.borrow().get(index) {
            return value.clone();
        }

        let deps: Vec<K> = self
            .problem
            .deps(index)
            .iter()
            .map(|dep| self.get(dep))
            .collect();
        let value = self.problem.compute(index, deps);
        self.backend.borrow_mut().insert(index.clone(), value.clone());
        value
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
}

impl<I, K, B, D, C> DpCache<I, K, B, ClosureProblem<I, K, D, C>>
where
    I: Clone,
    K: Clone,
    B: Backend<I, K>,
    D: Fn(&I) -> Vec<I>,
    C: Fn(&I, Vec<K>) -> K,
{
    pub fn from_fns(backend: B, dep_fn: D, compute_fn: C) -> Self {
        Self::new(backend, ClosureProblem::new(dep_fn, compute_fn))
    }
}
