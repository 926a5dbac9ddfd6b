//! Tempo bounds and beat interval math.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Inclusive bounds for a valid tempo, mirroring the tempo slider's min/max.
///
/// Always `1 <= min <= max`; deserialized values go through [`TempoRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTempoRange")]
pub struct TempoRange {
    min: u16,
    max: u16,
}

#[derive(Deserialize)]
struct RawTempoRange {
    min: u16,
    max: u16,
}

impl From<RawTempoRange> for TempoRange {
    fn from(raw: RawTempoRange) -> Self {
        Self::new(raw.min, raw.max)
    }
}

impl Default for TempoRange {
    fn default() -> Self {
        Self { min: 40, max: 240 }
    }
}

impl TempoRange {
    /// Build a range, normalizing so `min >= 1` and `max >= min`.
    pub fn new(min: u16, max: u16) -> Self {
        let min = min.max(1);
        Self { min, max: max.max(min) }
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    pub fn contains(&self, bpm: u16) -> bool {
        (self.min..=self.max).contains(&bpm)
    }

    pub fn clamp(&self, bpm: u16) -> u16 {
        bpm.clamp(self.min, self.max)
    }

    /// Accept an in-range tempo, reject anything else.
    pub fn validate(&self, bpm: u16) -> Result<u16, String> {
        if self.contains(bpm) {
            Ok(bpm)
        } else {
            Err(format!("tempo {} outside {}-{} BPM", bpm, self.min, self.max))
        }
    }

    /// Apply a signed step, stopping at the bounds the way a slider does.
    pub fn step(&self, bpm: u16, delta: i32) -> u16 {
        let stepped = (bpm as i32 + delta).clamp(self.min as i32, self.max as i32);
        stepped as u16
    }

    /// Position of `bpm` within the range, 0.0 at min and 1.0 at max.
    pub fn fraction(&self, bpm: u16) -> f32 {
        let span = (self.max - self.min) as f32;
        if span <= 0.0 {
            return 0.0;
        }
        (self.clamp(bpm) - self.min) as f32 / span
    }

    /// Inverse of [`fraction`](Self::fraction), rounded to the nearest bpm.
    pub fn from_fraction(&self, fraction: f32) -> u16 {
        let span = (self.max - self.min) as f32;
        let offset = (fraction.clamp(0.0, 1.0) * span).round() as u16;
        self.min + offset
    }
}

/// Milliseconds per quarter-note beat: `1000 / (bpm / 60)`.
pub fn beat_interval_ms(bpm: u16) -> f64 {
    let beats_per_second = bpm as f64 / 60.0;
    1000.0 / beats_per_second
}

/// [`beat_interval_ms`] as a `Duration`. A zero bpm is treated as 1 bpm.
pub fn beat_interval(bpm: u16) -> Duration {
    Duration::from_secs_f64(beat_interval_ms(bpm.max(1)) / 1000.0)
}

/// Parse user-typed tempo text. Non-numeric and out-of-range input is rejected.
pub fn parse_bpm(text: &str, range: &TempoRange) -> Result<u16, String> {
    let trimmed = text.trim();
    let bpm: u16 = trimmed
        .parse()
        .map_err(|_| format!("'{}' is not a tempo", trimmed))?;
    range.validate(bpm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_matches_formula() {
        assert!((beat_interval_ms(180) - 333.333).abs() < 0.01);
        assert_eq!(beat_interval_ms(60), 1000.0);
        assert_eq!(beat_interval_ms(120), 500.0);
        for bpm in 1..=400u16 {
            let expected = 1000.0 / (bpm as f64 / 60.0);
            assert!((beat_interval_ms(bpm) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn interval_duration() {
        assert_eq!(beat_interval(60), Duration::from_secs(1));
        assert_eq!(beat_interval(120), Duration::from_millis(500));
        let d = beat_interval(180).as_secs_f64() * 1000.0;
        assert!((d - 333.333).abs() < 0.01);
    }

    #[test]
    fn range_normalizes() {
        let r = TempoRange::new(0, 0);
        assert_eq!((r.min(), r.max()), (1, 1));
        let r = TempoRange::new(200, 100);
        assert_eq!((r.min(), r.max()), (200, 200));
    }

    #[test]
    fn inverted_bounds_from_toml_are_normalized() {
        #[derive(Deserialize)]
        struct Holder {
            range: TempoRange,
        }
        let holder: Holder = toml::from_str("[range]\nmin = 200\nmax = 100\n").unwrap();
        let r = holder.range;
        assert_eq!((r.min(), r.max()), (200, 200));
        assert_eq!(r.fraction(150), 0.0);
        assert_eq!(r.from_fraction(1.0), 200);
        assert_eq!(r.step(150, 5), 200);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let r = TempoRange::new(40, 240);
        assert_eq!(r.validate(40), Ok(40));
        assert_eq!(r.validate(240), Ok(240));
        assert!(r.validate(39).is_err());
        assert!(r.validate(241).is_err());
    }

    #[test]
    fn step_stops_at_bounds() {
        let r = TempoRange::new(40, 240);
        assert_eq!(r.step(100, 5), 105);
        assert_eq!(r.step(238, 10), 240);
        assert_eq!(r.step(42, -10), 40);
    }

    #[test]
    fn fraction_round_trips_endpoints() {
        let r = TempoRange::new(40, 240);
        assert_eq!(r.fraction(40), 0.0);
        assert_eq!(r.fraction(240), 1.0);
        assert_eq!(r.from_fraction(0.5), 140);
        assert_eq!(r.from_fraction(2.0), 240);
    }

    #[test]
    fn parse_bpm_input() {
        let r = TempoRange::new(40, 240);
        assert_eq!(parse_bpm(" 120 ", &r), Ok(120));
        assert!(parse_bpm("fast", &r).is_err());
        assert!(parse_bpm("", &r).is_err());
        assert!(parse_bpm("-5", &r).is_err());
        assert!(parse_bpm("999", &r).is_err());
    }
}
