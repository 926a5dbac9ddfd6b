#![allow(dead_code)]
//! Test doubles for metronome integration tests.

use std::time::{Duration, Instant};

use tactus_core::{
    Metronome, MetronomeSettings, TimerFired, TimerHandle, TimerPurpose, TimerQueue, TimerService,
    ToneSynth,
};
use tactus_types::ToneSpec;

/// Synth spy that records every requested tone.
#[derive(Debug, Default)]
pub struct RecordingSynth {
    pub tones: Vec<ToneSpec>,
    pub fail: bool,
}

impl RecordingSynth {
    pub fn frequencies(&self) -> Vec<f32> {
        self.tones.iter().map(|t| t.frequency_hz).collect()
    }
}

impl ToneSynth for RecordingSynth {
    fn play(&mut self, tone: &ToneSpec) -> Result<(), String> {
        if self.fail {
            return Err("audio context refused".to_string());
        }
        self.tones.push(*tone);
        Ok(())
    }
}

/// Timer service spy: a real `TimerQueue` plus counters on every arm/cancel.
#[derive(Debug)]
pub struct CountingTimers {
    pub queue: TimerQueue,
    pub repeating_armed: usize,
    pub once_armed: usize,
    pub cancelled: Vec<TimerHandle>,
    pub intervals: Vec<Duration>,
}

impl CountingTimers {
    pub fn new(now: Instant) -> Self {
        Self {
            queue: TimerQueue::new(now),
            repeating_armed: 0,
            once_armed: 0,
            cancelled: Vec::new(),
            intervals: Vec::new(),
        }
    }

    /// Beat timers still armed.
    pub fn active_beat_timers(&self) -> usize {
        self.queue.count(TimerPurpose::Beat)
    }
}

impl TimerService for CountingTimers {
    fn arm_repeating(&mut self, purpose: TimerPurpose, interval: Duration) -> TimerHandle {
        self.repeating_armed += 1;
        self.intervals.push(interval);
        self.queue.arm_repeating(purpose, interval)
    }

    fn arm_once(&mut self, purpose: TimerPurpose, delay: Duration) -> TimerHandle {
        self.once_armed += 1;
        self.queue.arm_once(purpose, delay)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.cancelled.push(handle);
        self.queue.cancel(handle);
    }
}

pub fn settings(bpm: u16) -> MetronomeSettings {
    MetronomeSettings { bpm, ..Default::default() }
}

pub fn metronome(bpm: u16) -> (Metronome<TimerQueue, RecordingSynth>, Instant) {
    let t0 = Instant::now();
    let m = Metronome::new(settings(bpm), TimerQueue::new(t0), RecordingSynth::default());
    (m, t0)
}

pub fn counting_metronome(bpm: u16) -> (Metronome<CountingTimers, RecordingSynth>, Instant) {
    let t0 = Instant::now();
    let m = Metronome::new(settings(bpm), CountingTimers::new(t0), RecordingSynth::default());
    (m, t0)
}

/// Drive a spy-backed metronome to `now`, collecting beat numbers.
pub fn drive(m: &mut Metronome<CountingTimers, RecordingSynth>, now: Instant) -> Vec<u8> {
    let mut beats = Vec::new();
    loop {
        let fired: Option<TimerFired> = m.timers_mut().queue.pop_due(now);
        match fired {
            Some(f) => {
                if let Some(ev) = m.fire(f) {
                    beats.push(ev.beat);
                }
            }
            None => break,
        }
    }
    beats
}

pub fn ms(n: f64) -> Duration {
    Duration::from_secs_f64(n / 1000.0)
}
