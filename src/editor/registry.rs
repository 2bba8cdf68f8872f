//! Pause registry
//!
//! In-memory ordered collection of candidate pause intervals. Order is
//! insertion order from detection; the splice engine does its own sorting.

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::detect::PauseStamp;

/// A candidate pause interval, toggleable between "will be removed" and
/// "will be kept".
///
/// Serialized field names match the persisted project record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseInterval {
    /// Stable unique identifier assigned at detection time.
    pub id: Uuid,
    /// Start of the interval in seconds.
    pub start: f64,
    /// End of the interval in seconds.
    pub end: f64,
    /// Whether the interval is currently marked for removal.
    #[serde(rename = "toBeRemoved")]
    pub marked_for_removal: bool,
}

impl PauseInterval {
    /// Build an interval from a detector stamp, marked for removal by
    /// default (detected pauses default to "will be removed").
    pub fn from_stamp(stamp: PauseStamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: stamp.start,
            end: stamp.end,
            marked_for_removal: true,
        }
    }
}

/// Ordered set of pause intervals for one editing session.
#[derive(Debug, Clone, Default)]
pub struct PauseRegistry {
    intervals: Vec<PauseInterval>,
}

impl PauseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full set with freshly detected stamps.
    ///
    /// Every interval starts marked for removal.
    pub fn load(&mut self, stamps: Vec<PauseStamp>) {
        self.intervals = stamps.into_iter().map(PauseInterval::from_stamp).collect();
    }

    /// Replace the full set with previously persisted intervals, keeping
    /// their ids and removal flags.
    pub fn restore(&mut self, intervals: Vec<PauseInterval>) {
        self.intervals = intervals;
    }

    /// Flip the removal flag of the interval with the given id.
    ///
    /// A missing id indicates a stale reference from the UI, not a caller
    /// error; the call is a silent no-op.
    pub fn toggle(&mut self, id: Uuid) {
        match self.intervals.iter_mut().find(|p| p.id == id) {
            Some(interval) => interval.marked_for_removal = !interval.marked_for_removal,
            None => debug!("toggle for unknown pause id {}, ignoring", id),
        }
    }

    /// Current ordered sequence, for rendering and splicing.
    pub fn snapshot(&self) -> &[PauseInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// How many intervals are currently marked for removal.
    pub fn marked_count(&self) -> usize {
        self.intervals.iter().filter(|p| p.marked_for_removal).count()
    }
}
