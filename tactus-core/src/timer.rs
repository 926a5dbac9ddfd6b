//! Timer service seam and the deadline queue that implements it.
//!
//! The metronome never sleeps or spawns threads. It arms timers through
//! [`TimerService`], and whoever drives the event loop pulls due timers out of
//! the [`TimerQueue`] and hands them back via `Metronome::fire`. Callbacks are
//! therefore serialized: one fired timer is fully handled before the next one
//! is popped.

use std::time::{Duration, Instant};

/// Opaque handle to an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// What a timer is for. The beat timer and the flash-clear timers have
/// different cancellation rules, so they are never conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// Main repeating beat timer
    Beat,
    /// One-shot "clear the active highlight" timer
    ClearFlash,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub handle: TimerHandle,
    pub purpose: TimerPurpose,
}

/// Host timer primitives consumed by the metronome.
pub trait TimerService {
    /// Arm a timer that fires every `interval`, first after one interval.
    fn arm_repeating(&mut self, purpose: TimerPurpose, interval: Duration) -> TimerHandle;

    /// Arm a timer that fires once after `delay`.
    fn arm_once(&mut self, purpose: TimerPurpose, delay: Duration) -> TimerHandle;

    /// Cancel a timer. Unknown or already-finished handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// A repeating timer further behind than this many periods is re-anchored
/// instead of firing a burst of catch-up beats.
const MAX_CATCH_UP_PERIODS: u32 = 4;

#[derive(Debug, Clone)]
struct TimerEntry {
    handle: TimerHandle,
    purpose: TimerPurpose,
    deadline: Instant,
    period: Option<Duration>,
}

/// Deadline-ordered timer queue driven by an external clock.
///
/// `now` only moves forward when the owner calls [`pop_due`](Self::pop_due),
/// which makes the queue usable with virtual time in tests.
#[derive(Debug)]
pub struct TimerQueue {
    now: Instant,
    next_id: u64,
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// The queue's notion of the current time.
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of armed timers with the given purpose.
    pub fn count(&self, purpose: TimerPurpose) -> usize {
        self.entries.iter().filter(|e| e.purpose == purpose).count()
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Earliest pending deadline, if any timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Advance the clock to `now` and pop the earliest timer that is due.
    ///
    /// Repeating timers are rescheduled one period later before being
    /// returned, so calling this in a loop fires every missed period in order.
    pub fn pop_due(&mut self, now: Instant) -> Option<TimerFired> {
        if now > self.now {
            self.now = now;
        }
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= self.now)
            .min_by_key(|(_, e)| (e.deadline, e.handle.0))
            .map(|(i, _)| i)?;

        let fired = TimerFired {
            handle: self.entries[index].handle,
            purpose: self.entries[index].purpose,
        };

        match self.entries[index].period {
            Some(period) => {
                let now = self.now;
                let entry = &mut self.entries[index];
                entry.deadline += period;
                if now.saturating_duration_since(entry.deadline) > period * MAX_CATCH_UP_PERIODS {
                    log::warn!(target: "timer", "timer {} fell behind, re-anchoring", entry.handle.0);
                    entry.deadline = now + period;
                }
            }
            None => {
                self.entries.swap_remove(index);
            }
        }

        Some(fired)
    }

    fn allocate(&mut self) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        handle
    }
}

impl TimerService for TimerQueue {
    fn arm_repeating(&mut self, purpose: TimerPurpose, interval: Duration) -> TimerHandle {
        let handle = self.allocate();
        // A zero period would make pop_due spin forever
        let period = interval.max(Duration::from_millis(1));
        self.entries.push(TimerEntry {
            handle,
            purpose,
            deadline: self.now + period,
            period: Some(period),
        });
        handle
    }

    fn arm_once(&mut self, purpose: TimerPurpose, delay: Duration) -> TimerHandle {
        let handle = self.allocate();
        self.entries.push(TimerEntry {
            handle,
            purpose,
            deadline: self.now + delay,
            period: None,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn once_fires_once() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new(t0);
        let h = q.arm_once(TimerPurpose::ClearFlash, ms(100));

        assert_eq!(q.pop_due(t0 + ms(99)), None);
        let fired = q.pop_due(t0 + ms(100)).unwrap();
        assert_eq!(fired.handle, h);
        assert_eq!(fired.purpose, TimerPurpose::ClearFlash);
        assert!(q.is_empty());
        assert_eq!(q.pop_due(t0 + ms(500)), None);
    }

    #[test]
    fn repeating_fires_every_period() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new(t0);
        let h = q.arm_repeating(TimerPurpose::Beat, ms(250));

        let mut fired = 0;
        for step in 1..=8u64 {
            while let Some(f) = q.pop_due(t0 + ms(250 * step)) {
                assert_eq!(f.handle, h);
                fired += 1;
            }
            assert_eq!(fired, step);
        }
        assert!(q.is_armed(h));
    }

    #[test]
    fn catches_up_missed_periods_in_order() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new(t0);
        q.arm_repeating(TimerPurpose::Beat, ms(100));
        let flash = q.arm_once(TimerPurpose::ClearFlash, ms(150));

        let order: Vec<TimerPurpose> = std::iter::from_fn(|| q.pop_due(t0 + ms(300)))
            .map(|f| f.purpose)
            .collect();
        assert_eq!(
            order,
            vec![TimerPurpose::Beat, TimerPurpose::ClearFlash, TimerPurpose::Beat, TimerPurpose::Beat]
        );
        assert!(!q.is_armed(flash));
    }

    #[test]
    fn reanchors_when_far_behind() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new(t0);
        q.arm_repeating(TimerPurpose::Beat, ms(100));

        let burst = std::iter::from_fn(|| q.pop_due(t0 + ms(10_000))).count();
        assert_eq!(burst, 1);
        assert_eq!(q.next_deadline(), Some(t0 + ms(10_100)));
    }

    #[test]
    fn cancel_removes_timer() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new(t0);
        let h = q.arm_repeating(TimerPurpose::Beat, ms(100));
        q.cancel(h);
        q.cancel(h);
        assert!(q.is_empty());
        assert_eq!(q.pop_due(t0 + ms(1000)), None);
    }

    #[test]
    fn handles_are_unique() {
        let mut q = TimerQueue::new(Instant::now());
        let a = q.arm_once(TimerPurpose::ClearFlash, ms(1));
        let b = q.arm_once(TimerPurpose::ClearFlash, ms(1));
        let c = q.arm_repeating(TimerPurpose::Beat, ms(1));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(q.count(TimerPurpose::ClearFlash), 2);
        assert_eq!(q.count(TimerPurpose::Beat), 1);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new(t0);
        q.pop_due(t0 + ms(500));
        q.pop_due(t0 + ms(100));
        assert_eq!(q.now(), t0 + ms(500));
    }
}
