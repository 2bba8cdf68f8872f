//! Splice engine
//!
//! Computes the retained complement of the removal-marked intervals and
//! copies those regions, channel by channel, into a brand-new buffer. The
//! input buffer is never mutated and never aliased by the output, so
//! "start over" and "undo splice" remain possible.

use log::debug;

use crate::audio::SampleBuffer;
use crate::editor::registry::PauseInterval;

/// A time interval of the original buffer that survives the splice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetainedSegment {
    pub start: f64,
    pub end: f64,
}

/// Compute the retained segments for a buffer of the given duration.
///
/// Intervals not marked for removal are ignored. The sweep sorts by start
/// and tracks the furthest removal end seen, which merges overlapping and
/// out-of-order removal intervals without emitting negative-length or
/// duplicate segments.
pub fn retained_segments(intervals: &[PauseInterval], duration: f64) -> Vec<RetainedSegment> {
    let mut removals: Vec<&PauseInterval> = intervals
        .iter()
        .filter(|p| p.marked_for_removal)
        .collect();
    removals.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut segments = Vec::with_capacity(removals.len() + 1);
    let mut last_end = 0.0f64;

    for removal in removals {
        if removal.start > last_end {
            segments.push(RetainedSegment {
                start: last_end,
                end: removal.start.min(duration),
            });
        }
        last_end = last_end.max(removal.end);
    }
    if last_end < duration {
        segments.push(RetainedSegment {
            start: last_end,
            end: duration,
        });
    }

    segments
}

/// Splice the retained regions of `buffer` into a new contiguous buffer.
///
/// Segment boundaries map to frames via `round(t * sample_rate)`, applied
/// identically for every channel. If everything is marked for removal the
/// result is a valid zero-frame buffer; if nothing is, the result has the
/// same content as the input, recomputed through the same path.
pub fn splice(buffer: &SampleBuffer, intervals: &[PauseInterval]) -> SampleBuffer {
    let sample_rate = buffer.sample_rate() as f64;
    let frame_count = buffer.frame_count();

    let frame_ranges: Vec<(usize, usize)> = retained_segments(intervals, buffer.duration())
        .iter()
        .map(|seg| {
            let start = ((seg.start * sample_rate).round() as usize).min(frame_count);
            let end = ((seg.end * sample_rate).round() as usize).min(frame_count);
            (start, end.max(start))
        })
        .collect();

    let total_frames: usize = frame_ranges.iter().map(|(s, e)| e - s).sum();
    debug!(
        "splicing {} retained segment(s), {} of {} frames kept",
        frame_ranges.len(),
        total_frames,
        frame_count
    );

    let mut channels = Vec::with_capacity(buffer.channel_count());
    for source in buffer.channels() {
        let mut out = Vec::with_capacity(total_frames);
        for &(start, end) in &frame_ranges {
            out.extend_from_slice(&source[start..end]);
        }
        channels.push(out);
    }

    // Shape invariants hold by construction: same channel count, equal
    // per-channel lengths.
    SampleBuffer::from_channels(channels, buffer.sample_rate())
        .unwrap_or_else(|_| SampleBuffer::new(buffer.channel_count(), 0, buffer.sample_rate()))
}
