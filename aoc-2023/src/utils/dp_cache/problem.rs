use std::marker::PhantomData;

/// Dependency structure and combination rule of a DP problem.
///
/// `I` is the index type, `K` the value type.
pub trait DpProblem<I, K> {
    /// Indices `index` depends on; empty for base cases
    fn deps(&self, index: &I) -> Vec<I>;

    /// Value of `index`, given the values of [`DpProblem::deps`] in the same order
    fn compute(&self, index: &I, deps: Vec<K>) -> K;
}

/// A [`DpProblem`] made of two closures
pub struct ClosureProblem<I, K, D, C> {
    dep_fn: D,
    compute_fn: C,
    _phantom: PhantomData<fn(&I) -> K>,
}

impl<I, K, D, C> ClosureProblem<I, K, D, C>
where
    D: Fn(&I) -> Vec<I>,
    C: Fn(&I, Vec<K>) -> K,
{
    pub fn new(dep_fn: D, compute_fn: C) -> Self {
        Self {
            dep_fn,
            compute_fn,
            _phantom: PhantomData,
        }
    }
}

impl<I, K, D, C> DpProblem<I, K> for ClosureProblem<I, K, D, C>
where
    D: Fn(&I) -> Vec<I>,
    C: Fn(&I, Vec<K>) -> K,
{
    fn deps(&self, index: &I) -> Vec<I> {
        (self.dep_fn)(index)
    }

    fn compute(&self, index: &I, deps: Vec<K>) -> K {
        (self.compute_fn)(index, deps)
    }
}
