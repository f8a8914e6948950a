//! Append-only store of half-open intervals
//!
//! Maps `[low, high)` ranges over simulation time to values. Ranges may
//! overlap freely; a point query returns every value whose range contains
//! the point, in the order the records were appended.
//!
//! ```text
//! 0  1  2  3  4  5  6  7  8  9
//! [A      )[B)            [E)
//! [C   )[D   )
//!        ^       ^        ^  ^
//! ```
//!
//! Querying 2.1 yields `[A, D]`, 8 yields `[E]`, while 5 and 9 match nothing.

pub mod reader;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

pub use reader::{merge_right_biased, CausalReader};

/// One stored record. Serializes as `[low, high, value]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    into = "(f64, f64, V)",
    try_from = "(f64, f64, V)",
    bound(serialize = "V: Clone + Serialize", deserialize = "V: Deserialize<'de>")
)]
pub struct Interval<V> {
    low: f64,
    high: f64,
    value: V,
}

impl<V> Interval<V> {
    /// Build a record, rejecting anything but `low < high`
    pub fn new(low: f64, high: f64, value: V) -> Result<Self> {
        // NaN bounds fail this comparison too
        if !(low < high) {
            return Err(SimError::InvalidRange { low, high });
        }
        Ok(Self { low, high, value })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Left-inclusive, right-exclusive containment
    pub fn contains(&self, point: f64) -> bool {
        self.low <= point && point < self.high
    }
}

impl<V> From<Interval<V>> for (f64, f64, V) {
    fn from(interval: Interval<V>) -> Self {
        (interval.low, interval.high, interval.value)
    }
}

impl<V> TryFrom<(f64, f64, V)> for Interval<V> {
    type Error = SimError;

    fn try_from((low, high, value): (f64, f64, V)) -> Result<Self> {
        Interval::new(low, high, value)
    }
}

/// Append-only interval index. Records are never removed or changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(serialize = "V: Clone + Serialize", deserialize = "V: Deserialize<'de>"))]
pub struct IntervalStore<V> {
    records: Vec<Interval<V>>,
}

impl<V> Default for IntervalStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntervalStore<V> {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Append `[low, high) -> value`. Fails with `InvalidRange` unless `low < high`.
    pub fn append(&mut self, low: f64, high: f64, value: V) -> Result<()> {
        let interval = Interval::new(low, high, value)?;
        self.records.push(interval);
        Ok(())
    }

    /// Values of every interval containing `point`, in append order.
    ///
    /// Fails with `NotFound` when nothing matches; that is an expected
    /// outcome at the edges of recorded history.
    pub fn query(&self, point: f64) -> Result<Vec<&V>> {
        let matches = self.try_query(point);
        if matches.is_empty() {
            return Err(SimError::NotFound { point });
        }
        Ok(matches)
    }

    /// Like `query`, but an empty result is just empty
    pub fn try_query(&self, point: f64) -> Vec<&V> {
        self.records
            .iter()
            .filter(|record| record.contains(point))
            .map(|record| &record.value)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in append order
    pub fn records(&self) -> &[Interval<V>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval<V>> {
        self.records.iter()
    }
}
