//! A set of tracks seeked together.

use tracing::trace;

use crate::resolver::Resolution;
use crate::time::{FrameRate, Ratio, Tempo, Tick};
use crate::track::Track;

/// Tracks sharing one playhead. Each track keeps its own resolution; seeking
/// evaluates them one after another.
#[derive(Debug, Default)]
pub struct Timeline {
    frame_rate: FrameRate,
    tempo: Tempo,
    tracks: Vec<Track>,
    position: Tick,
}

impl Timeline {
    pub fn new(frame_rate: FrameRate, tempo: Tempo) -> Self {
        Self {
            frame_rate,
            tempo,
            tracks: Vec::new(),
            position: Tick::ZERO,
        }
    }

    /// Add a track and return its index.
    pub fn add_track(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    /// Move the playhead to `time` and update every track.
    pub fn seek(&mut self, time: Tick) -> Vec<Option<Resolution>> {
        self.position = time;
        trace!(tick = time.get(), tracks = self.tracks.len(), "seek");
        self.tracks.iter_mut().map(|t| t.update(time)).collect()
    }

    pub fn seek_frame(&mut self, frame: i64) -> Vec<Option<Resolution>> {
        self.seek(self.frame_rate.frame_to_tick(frame))
    }

    pub fn seek_seconds(&mut self, seconds: Ratio) -> Vec<Option<Resolution>> {
        self.seek(Tick::from_seconds(seconds))
    }

    pub fn seek_beat(&mut self, beat: Ratio) -> Vec<Option<Resolution>> {
        self.seek(self.tempo.beat_to_tick(beat))
    }

    #[inline]
    pub fn position(&self) -> Tick {
        self.position
    }

    /// Frame containing the playhead.
    #[inline]
    pub fn current_frame(&self) -> i64 {
        self.frame_rate.tick_to_frame(self.position)
    }

    #[inline]
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    #[inline]
    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[inline]
    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    #[inline]
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframe;

    fn second_track(values: [f64; 2]) -> Track {
        let kfs = vec![Keyframe::new(0), Keyframe::new(Tick::from_whole_seconds(1))];
        let mut track = Track::new(kfs, Tick::from_whole_seconds(2)).unwrap();
        track.add_channel("v", values.to_vec()).unwrap();
        track
    }

    #[test]
    fn seek_updates_every_track() {
        let mut timeline = Timeline::default();
        let a = timeline.add_track(second_track([0.0, 10.0]));
        let b = timeline.add_track(second_track([5.0, 5.0]));
        let results = timeline.seek_frame(12);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(Option::is_some));
        assert_eq!(timeline.position(), Tick(Tick::PER_SECOND / 2));
        let va = *timeline.track(a).unwrap().value::<f64>("v").unwrap();
        assert!((va - 5.0).abs() < 1e-12);
        assert_eq!(timeline.track(b).unwrap().value::<f64>("v"), Some(&5.0));
        assert_eq!(timeline.current_frame(), 12);
    }

    #[test]
    fn seconds_and_beats_land_on_same_tick() {
        let mut timeline = Timeline::default();
        timeline.add_track(second_track([0.0, 1.0]));
        timeline.seek_seconds(Ratio::new(1, 2).unwrap());
        let by_seconds = timeline.position();
        // One beat at 120 bpm is half a second.
        timeline.seek_beat(Ratio::from_integer(1));
        assert_eq!(timeline.position(), by_seconds);
        assert!(timeline.track(3).is_none());
    }
}
