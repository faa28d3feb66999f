//! Shared test infrastructure for strike-clock integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use strike_clock::{
    AnimationState, Breakdown, BreakdownSink, CountUpSink, Millis, PhaseObserver, Snapshot,
    SnapshotSink, TimeInstant, TimeSource, Timestamp,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock wall clock with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<Timestamp>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::at(Timestamp::EPOCH)
    }

    pub fn at(time: Timestamp) -> Self {
        Self {
            current_time: core::cell::Cell::new(time),
        }
    }

    /// Starts at an ISO-8601 instant
    pub fn at_iso(input: &str) -> Self {
        Self::at(iso(input))
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time
            .set(current.checked_add(Millis(millis)).expect("test clock overflow"));
    }

    pub fn set_time(&self, time: Timestamp) {
        self.current_time.set(time);
    }
}

impl TimeSource<Timestamp> for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.current_time.get()
    }
}

pub fn iso(input: &str) -> Timestamp {
    Timestamp::parse_iso8601(input).expect("valid test timestamp")
}

// ============================================================================
// Recording sinks
// ============================================================================

/// Records every published breakdown
#[derive(Default)]
pub struct BreakdownLog(pub Vec<Breakdown>);

impl BreakdownSink for BreakdownLog {
    fn publish(&mut self, breakdown: Breakdown) {
        self.0.push(breakdown);
    }
}

/// Records count-up steps and completions
#[derive(Default)]
pub struct CountUpSpy {
    pub steps: Vec<u64>,
    pub completions: usize,
}

impl CountUpSink for CountUpSpy {
    fn on_step(&mut self, displayed: u64) {
        self.steps.push(displayed);
    }

    fn on_complete(&mut self) {
        self.completions += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent<P> {
    Enter(P),
    Exit(P),
}

/// Records phase transitions
pub struct PhaseLog<P>(pub Vec<PhaseEvent<P>>);

impl<P> Default for PhaseLog<P> {
    fn default() -> Self {
        PhaseLog(Vec::new())
    }
}

impl<P: Copy> PhaseObserver<P> for PhaseLog<P> {
    fn on_enter(&mut self, label: &P) {
        self.0.push(PhaseEvent::Enter(*label));
    }

    fn on_exit(&mut self, label: &P) {
        self.0.push(PhaseEvent::Exit(*label));
    }
}

/// Records every published snapshot
#[derive(Default)]
pub struct SnapshotLog(pub Vec<Snapshot>);

impl SnapshotLog {
    pub fn last(&self) -> &Snapshot {
        self.0.last().expect("at least one snapshot")
    }

    pub fn animations(&self) -> impl Iterator<Item = AnimationState> + '_ {
        self.0.iter().filter_map(|s| s.animation)
    }
}

impl SnapshotSink for SnapshotLog {
    fn publish(&mut self, snapshot: &Snapshot) {
        self.0.push(*snapshot);
    }
}
