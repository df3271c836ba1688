use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An interval during which an operation may start. Open ends are unbounded.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeWindow {
    start: Option<f64>,
    end: Option<f64>,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        TimeWindow {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn start(&self) -> f64 {
        self.start.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn end(&self) -> f64 {
        self.end.unwrap_or(f64::INFINITY)
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_satisfied(&self, time: f64) -> bool {
        time >= self.start() && time <= self.end()
    }
}

#[derive(Default)]
pub struct TimeWindowBuilder {
    start: Option<f64>,
    end: Option<f64>,
}

impl TimeWindowBuilder {
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn build(self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }
}

/// The allowed operation windows of a stop, kept sorted by start.
///
/// No window at all means the stop can be served at any time.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct TimeWindows(SmallVec<[TimeWindow; 1]>);

impl TimeWindows {
    pub fn new(mut windows: Vec<TimeWindow>) -> Self {
        windows.retain(|window| !window.is_empty());
        windows.sort_by(|a, b| a.start().total_cmp(&b.start()));
        TimeWindows(SmallVec::from_vec(windows))
    }

    pub fn single(start: f64, end: f64) -> Self {
        TimeWindows::new(vec![TimeWindow::new(start, end)])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeWindow> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Earliest time any window opens.
    pub fn earliest_start(&self) -> f64 {
        self.0
            .first()
            .map(|window| window.start())
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// Latest time any window still allows an operation to start.
    pub fn latest_end(&self) -> f64 {
        if self.0.is_empty() {
            return f64::INFINITY;
        }

        self.0
            .iter()
            .map(|window| window.end())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// When the operation starts given an arrival at `arrival`, waiting for the next window if needed.
    /// `None` when every window has already closed.
    pub fn operation_start(&self, arrival: f64) -> Option<f64> {
        if self.0.is_empty() {
            return Some(arrival);
        }

        self.0
            .iter()
            .find(|window| window.end() >= arrival)
            .map(|window| arrival.max(window.start()))
    }

    /// Latest operation start that is not after `limit`, `None` if every window opens after it.
    pub fn latest_start_before(&self, limit: f64) -> Option<f64> {
        if self.0.is_empty() {
            return Some(limit);
        }

        self.0
            .iter()
            .filter(|window| window.start() <= limit)
            .map(|window| window.end().min(limit))
            .reduce(f64::max)
    }
}

impl From<Vec<TimeWindow>> for TimeWindows {
    fn from(windows: Vec<TimeWindow>) -> Self {
        TimeWindows::new(windows)
    }
}
