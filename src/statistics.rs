//! Per-move and per-component search statistics.
//!
//! Both tables are plain sums, accumulated thread-locally and merged once
//! per worker, so merge order does not matter.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::moves::MoveKind;

/// Counters for one move kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MoveRecord {
    pub attempts: u64,
    pub successes: u64,
    pub total_gain: f64,
    pub total_time_ns: u64,
}

impl MoveRecord {
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }

    /// Average gain per successful attempt.
    pub fn average_gain(&self) -> f64 {
        if self.successes == 0 {
            0.0
        } else {
            self.total_gain / self.successes as f64
        }
    }

    pub fn average_time_ns(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.total_time_ns as f64 / self.attempts as f64
        }
    }

    fn merge(&mut self, other: &MoveRecord) {
        self.attempts += other.attempts;
        self.successes += other.successes;
        self.total_gain += other.total_gain;
        self.total_time_ns += other.total_time_ns;
    }
}

/// Attempts, successes, gains and time per neighborhood.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MoveStatistics {
    records: BTreeMap<MoveKind, MoveRecord>,
}

impl MoveStatistics {
    pub fn new() -> Self {
        MoveStatistics::default()
    }

    /// Record one neighborhood step. `gain` is `Some` when it improved the
    /// solution.
    pub fn record(&mut self, kind: MoveKind, elapsed: Duration, gain: Option<f64>) {
        let record = self.records.entry(kind).or_default();
        record.attempts += 1;
        record.total_time_ns += nanos(elapsed);
        if let Some(gain) = gain {
            record.successes += 1;
            record.total_gain += gain;
        }
    }

    pub fn get(&self, kind: MoveKind) -> MoveRecord {
        self.records.get(&kind).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoveKind, &MoveRecord)> {
        self.records.iter().map(|(kind, record)| (*kind, record))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn merge(&mut self, other: &MoveStatistics) {
        for (kind, record) in &other.records {
            self.records.entry(*kind).or_default().merge(record);
        }
    }
}

/// Phases of one GRASP iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Component {
    ConstructiveHeuristic,
    LocalSearch,
    PathRelinking,
}

/// Counters for one component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComponentRecord {
    pub calls: u64,
    pub total_time_ns: u64,
    /// Sum of revenue after minus revenue before each call
    pub total_gain: f64,
}

impl ComponentRecord {
    pub fn average_gain(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_gain / self.calls as f64
        }
    }
}

/// How much time each component takes and how much revenue it adds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComponentEfficacy {
    records: BTreeMap<Component, ComponentRecord>,
}

impl ComponentEfficacy {
    pub fn new() -> Self {
        ComponentEfficacy::default()
    }

    pub fn record(&mut self, component: Component, elapsed: Duration, gain: f64) {
        let record = self.records.entry(component).or_default();
        record.calls += 1;
        record.total_time_ns += nanos(elapsed);
        record.total_gain += gain;
    }

    pub fn get(&self, component: Component) -> ComponentRecord {
        self.records.get(&component).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, &ComponentRecord)> {
        self.records.iter().map(|(component, record)| (*component, record))
    }

    pub fn merge(&mut self, other: &ComponentEfficacy) {
        for (component, record) in &other.records {
            let entry = self.records.entry(*component).or_default();
            entry.calls += record.calls;
            entry.total_time_ns += record.total_time_ns;
            entry.total_gain += record.total_gain;
        }
    }
}

fn nanos(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}
