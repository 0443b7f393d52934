//! Exact timeline arithmetic.
//!
//! Keyframe times are integer ticks. Frames, seconds and beats are converted
//! through reduced rationals in i128 so that no conversion ever rounds until an
//! explicit floor back onto the tick grid.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// A moment on the timeline in exact integer ticks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(pub i64);

impl Tick {
    /// Ticks in one second. Divisible by 24, 25, 30, 48, 50, 60, 90, 100, 120,
    /// 30000/1001 frame periods and the usual audio sample rates.
    pub const PER_SECOND: i64 = 705_600_000;

    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub const fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whole seconds as ticks.
    #[inline]
    pub fn from_whole_seconds(seconds: i64) -> Self {
        Self(seconds.saturating_mul(Self::PER_SECOND))
    }

    /// Convert an exact number of seconds, flooring onto the tick grid.
    pub fn from_seconds(seconds: Ratio) -> Self {
        Self(saturate(
            (seconds.numer * Self::PER_SECOND as i128).div_euclid(seconds.denom),
        ))
    }

    /// Exact seconds for this tick.
    #[inline]
    pub fn to_seconds(self) -> Ratio {
        Ratio::reduced(self.0 as i128, Self::PER_SECOND as i128)
    }

    /// Approximate seconds, for display and diagnostics only.
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / Self::PER_SECOND as f64
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    #[inline]
    pub fn saturating_sub(self, other: Tick) -> Tick {
        Tick(self.0.saturating_sub(other.0))
    }

    #[inline]
    pub fn clamp_to(self, min: Tick, max: Tick) -> Tick {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}t", self.0)
    }
}

impl Add for Tick {
    type Output = Tick;

    fn add(self, other: Tick) -> Tick {
        Tick(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Tick {
    fn add_assign(&mut self, other: Tick) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Tick {
    type Output = Tick;

    fn sub(self, other: Tick) -> Tick {
        Tick(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Tick {
    fn sub_assign(&mut self, other: Tick) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Tick {
    type Output = Tick;

    fn mul(self, rhs: i64) -> Tick {
        Tick(self.0.saturating_mul(rhs))
    }
}

impl From<i64> for Tick {
    fn from(ticks: i64) -> Self {
        Tick(ticks)
    }
}

impl From<Tick> for i64 {
    fn from(tick: Tick) -> Self {
        tick.0
    }
}

#[inline]
fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Reduced rational with a strictly positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RatioRaw")]
pub struct Ratio {
    numer: i128,
    denom: i128,
}

impl Ratio {
    /// Build a reduced ratio. Returns `None` for a zero denominator.
    pub fn new(numer: i128, denom: i128) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Self::reduced(numer, denom))
    }

    #[inline]
    pub fn from_integer(value: i128) -> Self {
        Self {
            numer: value,
            denom: 1,
        }
    }

    // Callers guarantee `denom != 0`.
    fn reduced(numer: i128, denom: i128) -> Self {
        let sign = if denom < 0 { -1 } else { 1 };
        let g = gcd(numer, denom).max(1);
        Self {
            numer: sign * numer / g,
            denom: sign * denom / g,
        }
    }

    #[inline]
    pub fn numer(&self) -> i128 {
        self.numer
    }

    #[inline]
    pub fn denom(&self) -> i128 {
        self.denom
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.numer > 0
    }

    /// Largest integer not greater than this ratio.
    #[inline]
    pub fn floor(&self) -> i128 {
        self.numer.div_euclid(self.denom)
    }

    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    pub fn checked_mul(self, other: Ratio) -> Option<Ratio> {
        let numer = self.numer.checked_mul(other.numer)?;
        let denom = self.denom.checked_mul(other.denom)?;
        Some(Self::reduced(numer, denom))
    }

    pub fn checked_div(self, other: Ratio) -> Option<Ratio> {
        if other.numer == 0 {
            return None;
        }
        let numer = self.numer.checked_mul(other.denom)?;
        let denom = self.denom.checked_mul(other.numer)?;
        Some(Self::reduced(numer, denom))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// Frames per second as an exact ratio (e.g. 24/1 or 30000/1001).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FrameRateRaw")]
pub struct FrameRate {
    numerator: i64,
    denominator: i64,
}

impl FrameRate {
    pub const FPS_24: FrameRate = FrameRate {
        numerator: 24,
        denominator: 1,
    };

    pub fn new(numerator: i64, denominator: i64) -> Result<Self, AnimationError> {
        if numerator <= 0 || denominator <= 0 {
            return Err(AnimationError::InvalidFrameRate {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    #[inline]
    pub fn fps(&self) -> Ratio {
        Ratio::reduced(self.numerator as i128, self.denominator as i128)
    }

    /// Exact length of one frame in ticks.
    #[inline]
    pub fn ticks_per_frame(&self) -> Ratio {
        Ratio::reduced(
            Tick::PER_SECOND as i128 * self.denominator as i128,
            self.numerator as i128,
        )
    }

    /// Start tick of `frame`, floored onto the tick grid.
    pub fn frame_to_tick(&self, frame: i64) -> Tick {
        let per_frame = self.ticks_per_frame();
        Tick(saturate(
            (frame as i128 * per_frame.numer).div_euclid(per_frame.denom),
        ))
    }

    /// Frame containing `tick`.
    pub fn tick_to_frame(&self, tick: Tick) -> i64 {
        saturate(self.tick_to_frame_ratio(tick).floor())
    }

    /// Exact (fractional) frame position of `tick`.
    pub fn tick_to_frame_ratio(&self, tick: Tick) -> Ratio {
        Ratio::reduced(
            tick.0 as i128 * self.numerator as i128,
            Tick::PER_SECOND as i128 * self.denominator as i128,
        )
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_24
    }
}

/// Musical tempo used to place keyframes on beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TempoRaw")]
pub struct Tempo {
    beats_per_minute: Ratio,
}

impl Tempo {
    pub fn new(beats_per_minute: Ratio) -> Result<Self, AnimationError> {
        if !beats_per_minute.is_positive() {
            return Err(AnimationError::InvalidTempo);
        }
        Ok(Self { beats_per_minute })
    }

    #[inline]
    pub fn beats_per_minute(&self) -> Ratio {
        self.beats_per_minute
    }

    /// Exact ticks in one beat.
    #[inline]
    fn ticks_per_beat(&self) -> Ratio {
        Ratio::reduced(
            60 * Tick::PER_SECOND as i128 * self.beats_per_minute.denom,
            self.beats_per_minute.numer,
        )
    }

    /// Tick at which `beat` starts, floored onto the tick grid.
    pub fn beat_to_tick(&self, beat: Ratio) -> Tick {
        let per_beat = self.ticks_per_beat();
        match beat.checked_mul(per_beat) {
            Some(ticks) => Tick(saturate(ticks.floor())),
            None => Tick(if beat.numer < 0 { i64::MIN } else { i64::MAX }),
        }
    }

    /// Exact beat position of `tick`.
    pub fn tick_to_beat(&self, tick: Tick) -> Ratio {
        Ratio::reduced(
            tick.0 as i128 * self.beats_per_minute.numer,
            60 * Tick::PER_SECOND as i128 * self.beats_per_minute.denom,
        )
    }
}

impl Default for Tempo {
    /// 120 beats per minute.
    fn default() -> Self {
        Self {
            beats_per_minute: Ratio::from_integer(120),
        }
    }
}

// Serde goes through the validating constructors so a zero denominator, frame
// rate or tempo never reaches the conversion math.

#[derive(Deserialize)]
struct RatioRaw {
    numer: i128,
    denom: i128,
}

impl TryFrom<RatioRaw> for Ratio {
    type Error = AnimationError;

    fn try_from(raw: RatioRaw) -> Result<Self, Self::Error> {
        Ratio::new(raw.numer, raw.denom).ok_or(AnimationError::InvalidRatio)
    }
}

#[derive(Deserialize)]
struct FrameRateRaw {
    numerator: i64,
    denominator: i64,
}

impl TryFrom<FrameRateRaw> for FrameRate {
    type Error = AnimationError;

    fn try_from(raw: FrameRateRaw) -> Result<Self, Self::Error> {
        FrameRate::new(raw.numerator, raw.denominator)
    }
}

#[derive(Deserialize)]
struct TempoRaw {
    beats_per_minute: Ratio,
}

impl TryFrom<TempoRaw> for Tempo {
    type Error = AnimationError;

    fn try_from(raw: TempoRaw) -> Result<Self, Self::Error> {
        Tempo::new(raw.beats_per_minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_reduces_and_normalizes_sign() {
        let r = Ratio::new(6, -8).unwrap();
        assert_eq!(r.numer(), -3);
        assert_eq!(r.denom(), 4);
        assert!(Ratio::new(1, 0).is_none());
        assert_eq!(r.floor(), -1);
    }

    #[test]
    fn seconds_roundtrip_is_exact() {
        let third = Ratio::new(1, 3).unwrap();
        let tick = Tick::from_seconds(third);
        assert_eq!(tick, Tick(Tick::PER_SECOND / 3));
        assert_eq!(tick.to_seconds(), third);
    }

    #[test]
    fn frame_conversion_24fps() {
        let rate = FrameRate::FPS_24;
        assert_eq!(rate.frame_to_tick(24), Tick::from_whole_seconds(1));
        assert_eq!(rate.tick_to_frame(Tick::from_whole_seconds(1)), 24);
        // One tick before frame 1 is still frame 0.
        let frame_one = rate.frame_to_tick(1);
        assert_eq!(rate.tick_to_frame(frame_one - Tick(1)), 0);
        assert_eq!(rate.tick_to_frame(Tick(-1)), -1);
    }

    #[test]
    fn ntsc_frames_stay_exact_over_long_timelines() {
        let rate = FrameRate::new(30000, 1001).unwrap();
        let frame = 10_000_000;
        let tick = rate.frame_to_tick(frame);
        assert_eq!(rate.tick_to_frame(tick), frame);
        assert_eq!(
            rate.tick_to_frame_ratio(tick),
            Ratio::from_integer(frame as i128)
        );
    }

    #[test]
    fn invalid_rates_rejected() {
        assert!(FrameRate::new(0, 1).is_err());
        assert!(FrameRate::new(24, -1).is_err());
        assert!(Tempo::new(Ratio::from_integer(0)).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let err = serde_json::from_str::<FrameRate>(r#"{"numerator":0,"denominator":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid frame rate"));
        assert!(serde_json::from_str::<FrameRate>(r#"{"numerator":24,"denominator":-1}"#).is_err());
        assert!(serde_json::from_str::<Ratio>(r#"{"numer":1,"denom":0}"#).is_err());
        assert!(serde_json::from_str::<Tempo>(
            r#"{"beats_per_minute":{"numer":0,"denom":1}}"#
        )
        .is_err());

        let rate: FrameRate =
            serde_json::from_str(r#"{"numerator":30000,"denominator":1001}"#).unwrap();
        assert_eq!(rate, FrameRate::new(30000, 1001).unwrap());
        let ratio: Ratio = serde_json::from_str(r#"{"numer":6,"denom":-8}"#).unwrap();
        assert_eq!(ratio, Ratio::new(-3, 4).unwrap());
        let tempo = Tempo::default();
        let back: Tempo = serde_json::from_value(serde_json::to_value(tempo).unwrap()).unwrap();
        assert_eq!(back, tempo);
    }

    #[test]
    fn tempo_beats() {
        let tempo = Tempo::new(Ratio::from_integer(120)).unwrap();
        let half_second = Tick::PER_SECOND / 2;
        assert_eq!(tempo.beat_to_tick(Ratio::from_integer(1)), Tick(half_second));
        assert_eq!(
            tempo.tick_to_beat(Tick::from_whole_seconds(3)),
            Ratio::from_integer(6)
        );
    }
}
