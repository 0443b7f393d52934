//! Loop expansion: turns keyframes plus a track duration into the ordered
//! playback sequence the resolver walks.
//!
//! A loop-start/loop-end pair marks a span of entries. When the end marker is
//! reached the span is replayed back to back, starting at the end keyframe's
//! time, until the next replay would reach the following keyframe (or the
//! track duration for the final keyframe). Spans nest: an outer replay copies
//! the already-expanded inner replays.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::keyframe::Keyframe;
use crate::time::Tick;

/// One playback event derived from a source keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopEntry {
    /// Index into the track's keyframes (and every channel's keys).
    pub source_index: usize,
    /// When this entry plays, in ticks.
    pub playback_time: Tick,
    /// Number of loop spans enclosing the source keyframe.
    pub loop_depth: usize,
    /// How many replay levels produced this entry (0 for the first pass).
    pub looping_depth: usize,
}

/// Expanded, time-sorted playback sequence. Rebuilt whole on every mutation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopTable {
    entries: Vec<LoopEntry>,
}

impl LoopTable {
    /// Expand `keyframes` over `[0, duration)`.
    ///
    /// `max_entries` bounds the output; tiling stops once it is reached.
    pub fn build(keyframes: &[Keyframe], duration: Tick, max_entries: usize) -> Self {
        let mut entries: Vec<LoopEntry> = Vec::with_capacity(keyframes.len());
        let mut open_starts: Vec<usize> = Vec::new();

        for (index, keyframe) in keyframes.iter().enumerate() {
            if entries.len() >= max_entries {
                warn!(
                    max_entries,
                    source_index = index,
                    "loop table entry cap reached; remaining keyframes dropped"
                );
                break;
            }

            let mut replay_start = None;
            if keyframe.is_loop_end() {
                match open_starts.pop() {
                    Some(start_entry) => {
                        let boundary = keyframes
                            .get(index + 1)
                            .map(|next| next.time)
                            .unwrap_or(duration);
                        let first = entries.len();
                        let emitted = replay_span(
                            &mut entries,
                            start_entry,
                            keyframe.time,
                            boundary,
                            index + 1 == keyframes.len(),
                            max_entries,
                        );
                        if emitted > 0 {
                            replay_start = Some(first);
                        }
                    }
                    None => debug!(source_index = index, "loop end without open start; ignored"),
                }
            }

            match replay_start {
                Some(first) => {
                    // A keyframe that both ends and starts a loop opens the
                    // new span at its first replayed entry.
                    if keyframe.is_loop_start() {
                        open_starts.push(first);
                    }
                }
                None => {
                    if keyframe.is_loop_start() {
                        open_starts.push(entries.len());
                    }
                    let loop_depth = open_starts.len();
                    entries.push(LoopEntry {
                        source_index: index,
                        playback_time: keyframe.time,
                        loop_depth,
                        looping_depth: loop_depth.saturating_sub(1),
                    });
                }
            }
        }

        if !open_starts.is_empty() {
            debug!(unclosed = open_starts.len(), "loop starts without matching end");
        }
        debug!(
            keyframes = keyframes.len(),
            entries = entries.len(),
            duration = duration.get(),
            "rebuilt loop table"
        );
        Self { entries }
    }

    /// Borrow the entries.
    #[inline]
    pub fn entries(&self) -> &[LoopEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&LoopEntry> {
        self.entries.get(index)
    }

    /// Playback times in order; handy for assertions and debugging.
    pub fn playback_times(&self) -> Vec<Tick> {
        self.entries.iter().map(|e| e.playback_time).collect()
    }

    /// Rightmost entry whose playback time is `<= time`, clamped to entry 0
    /// for times before the table starts.
    pub fn entry_index_at(&self, time: Tick) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let after = self.entries.partition_point(|e| e.playback_time <= time);
        Some(after.saturating_sub(1))
    }
}

/// Replay `entries[start..]` from `end_time` until `boundary`. Returns the
/// number of entries appended.
///
/// When the replay is the one closing out the final keyframe, one more entry
/// follows the last entry that fits: the next entry of the cycle at its own
/// replay time, which can lie past `boundary`. It gives the resolver a right
/// bracket for the last segment. It is skipped when nothing was replayed or
/// when it would repeat the source of the last emitted entry, and it is not
/// counted in the return value.
fn replay_span(
    entries: &mut Vec<LoopEntry>,
    start: usize,
    end_time: Tick,
    boundary: Tick,
    is_last_keyframe: bool,
    max_entries: usize,
) -> usize {
    let span: Vec<LoopEntry> = entries[start.min(entries.len())..].to_vec();
    let Some(origin) = span.first().map(|e| e.playback_time) else {
        return 0;
    };
    let period = end_time - origin;
    let single_pass = period <= Tick::ZERO;
    if single_pass {
        debug!(
            start_time = origin.get(),
            "zero-length loop span; replaying once"
        );
    }

    let mut emitted = 0usize;
    let mut pass: i64 = 0;
    let mut next_candidate: Option<LoopEntry> = None;

    'tiling: loop {
        let pass_offset = end_time + period * pass;
        for entry in &span {
            let playback_time = pass_offset + (entry.playback_time - origin);
            let replayed = LoopEntry {
                source_index: entry.source_index,
                playback_time,
                loop_depth: entry.loop_depth,
                looping_depth: entry.looping_depth + 1,
            };
            if playback_time >= boundary {
                next_candidate = Some(replayed);
                break 'tiling;
            }
            if entries.len() >= max_entries {
                warn!(max_entries, "loop table entry cap reached while tiling");
                return emitted;
            }
            entries.push(replayed);
            emitted += 1;
        }
        if single_pass {
            break;
        }
        pass += 1;
    }

    if is_last_keyframe && emitted > 0 && entries.len() < max_entries {
        if let (Some(closing), Some(last)) = (next_candidate, entries.last()) {
            if closing.source_index != last.source_index {
                entries.push(closing);
            }
        }
    }

    emitted
}
