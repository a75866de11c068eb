use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Interval in which an operation may start, in the problem's time unit.
#[derive(Deserialize, Debug, Serialize, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    #[serde(default)]
    start: f64,
    #[serde(default = "unbounded_end")]
    end: f64,
}

fn unbounded_end() -> f64 {
    f64::MAX
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        TimeWindow { start, end }
    }

    pub fn unbounded() -> Self {
        TimeWindow {
            start: 0.0,
            end: f64::MAX,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn is_satisfied(&self, arrival: f64) -> bool {
        arrival <= self.end
    }

    pub fn overtime(&self, arrival: f64) -> f64 {
        (arrival - self.end).max(0.0)
    }
}

/// Ordered set of time windows. An empty set means no restriction.
#[derive(Deserialize, Debug, Serialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct TimeWindows(SmallVec<[TimeWindow; 1]>);

impl TimeWindows {
    pub fn new(mut time_windows: Vec<TimeWindow>) -> Self {
        time_windows.sort_by(|a, b| a.start.total_cmp(&b.start));
        TimeWindows(SmallVec::from_vec(time_windows))
    }

    pub fn single(start: f64, end: f64) -> Self {
        TimeWindows(SmallVec::from_elem(TimeWindow::new(start, end), 1))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeWindow> {
        self.0.iter()
    }

    pub fn earliest(&self) -> f64 {
        self.0.first().map_or(0.0, |tw| tw.start)
    }

    /// Latest moment an operation may start.
    pub fn latest(&self) -> f64 {
        self.0
            .iter()
            .map(|tw| tw.end)
            .reduce(f64::max)
            .unwrap_or(f64::MAX)
    }

    /// Start of the operation for a given arrival, picking the first window that is still open.
    /// Returns `None` when every window closed before `arrival`.
    pub fn operation_start(&self, arrival: f64) -> Option<f64> {
        if self.0.is_empty() {
            return Some(arrival);
        }

        self.0
            .iter()
            .find(|tw| tw.end >= arrival)
            .map(|tw| arrival.max(tw.start))
    }

    /// Start of the operation ignoring lateness: waits for the next window or starts late after the
    /// last one.
    pub fn operation_start_or_late(&self, arrival: f64) -> f64 {
        self.operation_start(arrival).unwrap_or(arrival)
    }
}

#[derive(Default)]
pub struct TimeWindowsBuilder {
    time_windows: Vec<TimeWindow>,
}

impl TimeWindowsBuilder {
    pub fn add_time_window(&mut self, start: f64, end: f64) -> &mut TimeWindowsBuilder {
        self.time_windows.push(TimeWindow::new(start, end));
        self
    }

    pub fn build(self) -> TimeWindows {
        TimeWindows::new(self.time_windows)
    }
}
