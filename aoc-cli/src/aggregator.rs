//! Puts results from parallel workers back into (year, day, part) order
//!
//! Results are held back until every expected key before them has arrived.

use crate::executor::SolverResult;
use std::collections::{BTreeMap, BTreeSet};

/// Key for ordering results (year, day, part) - ordered ascending
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

pub struct ResultAggregator {
    expected: BTreeSet<ResultKey>,
    pending: BTreeMap<ResultKey, SolverResult>,
}

impl ResultAggregator {
    pub fn new(expected_keys: impl IntoIterator<Item = ResultKey>) -> Self {
        Self {
            expected: expected_keys.into_iter().collect(),
            pending: BTreeMap::new(),
        }
    }

    /// Add a result and return any results ready for output (in order)
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.insert(ResultKey::from(&result), result);

        let mut ready = Vec::new();
        while let Some(&next) = self.expected.first() {
            let Some(result) = self.pending.remove(&next) else {
                break;
            };
            self.expected.remove(&next);
            ready.push(result);
        }
        ready
    }

    /// Whatever is still buffered, in order
    pub fn drain(&mut self) -> Vec<SolverResult> {
        std::mem::take(&mut self.pending).into_values().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.expected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn key(year: u16, day: u8, part: u8) -> ResultKey {
        ResultKey { year, day, part }
    }

    fn make_result(year: u16, day: u8, part: u8) -> SolverResult {
        SolverResult {
            year,
            day,
            part,
            answer: Ok(format!("{year}_{day}_{part}")),
            parse_duration: Some(TimeDelta::milliseconds(5)),
            solve_duration: TimeDelta::milliseconds(10),
        }
    }

    fn keys(results: &[SolverResult]) -> Vec<ResultKey> {
        results.iter().map(ResultKey::from).collect()
    }

    #[test]
    fn in_order_results() {
        let mut agg = ResultAggregator::new([key(2023, 1, 1), key(2023, 1, 2)]);

        assert_eq!(keys(&agg.add(make_result(2023, 1, 1))), [key(2023, 1, 1)]);
        assert_eq!(keys(&agg.add(make_result(2023, 1, 2))), [key(2023, 1, 2)]);
        assert!(agg.is_complete());
    }

    #[test]
    fn out_of_order_results() {
        let mut agg =
            ResultAggregator::new([key(2023, 2, 1), key(2023, 1, 2), key(2023, 1, 1)]);

        assert!(agg.add(make_result(2023, 1, 2)).is_empty());
        assert!(agg.add(make_result(2023, 2, 1)).is_empty());

        let ready = agg.add(make_result(2023, 1, 1));
        assert_eq!(keys(&ready), [key(2023, 1, 1), key(2023, 1, 2), key(2023, 2, 1)]);
        assert!(agg.is_complete());
    }

    #[test]
    fn drain_remaining() {
        let mut agg = ResultAggregator::new([key(2023, 1, 1), key(2023, 1, 2)]);
        assert!(agg.add(make_result(2023, 1, 2)).is_empty());

        assert_eq!(keys(&agg.drain()), [key(2023, 1, 2)]);
        assert!(!agg.is_complete());
        assert!(agg.drain().is_empty());
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_is_emitted_sorted(
            order in Just((1..=25u8).flat_map(|d| [(d, 1u8), (d, 2u8)]).collect::<Vec<_>>()).prop_shuffle(),
        ) {
            let mut agg = ResultAggregator::new(order.iter().map(|&(d, p)| key(2023, d, p)));
            let mut emitted = Vec::new();
            for &(day, part) in &order {
                emitted.extend(keys(&agg.add(make_result(2023, day, part))));
            }
            prop_assert!(agg.is_complete());
            prop_assert_eq!(emitted.len(), 50);
            prop_assert!(emitted.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
