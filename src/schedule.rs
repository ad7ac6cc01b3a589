// Copyright (c) 2026 rezky_nightky

//! "Run on the next display refresh" as an injectable capability.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Hands out a handle whose frame is due. Each handle fires at most once.
    fn poll_due(&mut self) -> Option<FrameHandle>;
}

/// Every pending request is due on the next poll, oldest first.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let h = FrameHandle(self.next_id);
        self.pending.push(h);
        h
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|&p| p != handle);
    }

    fn poll_due(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0))
    }
}

/// Fixed-rate stand-in for the display's refresh signal.
#[derive(Debug)]
pub struct RefreshClock {
    period: Duration,
    next_id: u64,
    pending: Option<(FrameHandle, Instant)>,
    last_due: Option<Instant>,
}

impl RefreshClock {
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self {
            period: Duration::from_secs_f64(1.0 / fps),
            next_id: 0,
            pending: None,
            last_due: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// `None` while nothing is scheduled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(_, due)| due.saturating_duration_since(now))
    }

    pub fn request_frame_at(&mut self, now: Instant) -> FrameHandle {
        self.next_id += 1;
        let h = FrameHandle(self.next_id);
        let due = match self.last_due {
            Some(last) => (last + self.period).max(now),
            None => now,
        };
        self.pending = Some((h, due));
        h
    }

    pub fn poll_due_at(&mut self, now: Instant) -> Option<FrameHandle> {
        let (h, due) = self.pending?;
        if now < due {
            return None;
        }
        self.pending = None;
        // Late frames snap forward instead of bursting to catch up.
        self.last_due = Some(if now > due + self.period { now } else { due });
        Some(h)
    }
}

impl FrameScheduler for RefreshClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.request_frame_at(Instant::now())
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.is_some_and(|(h, _)| h == handle) {
            self.pending = None;
        }
    }

    fn poll_due(&mut self) -> Option<FrameHandle> {
        self.poll_due_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_fires_in_request_order() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_eq!(s.pending(), 2);
        assert_eq!(s.poll_due(), Some(a));
        assert_eq!(s.poll_due(), Some(b));
        assert_eq!(s.poll_due(), None);
        assert_eq!(s.requested(), 2);
    }

    #[test]
    fn manual_scheduler_cancel_removes_pending() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        s.cancel_frame(a);
        s.cancel_frame(a);
        assert_eq!(s.pending(), 0);
        assert_eq!(s.poll_due(), None);
    }

    #[test]
    fn refresh_clock_first_frame_is_due_immediately() {
        let mut c = RefreshClock::new(50.0);
        let t0 = Instant::now();
        let h = c.request_frame_at(t0);
        assert_eq!(c.time_until_due(t0), Some(Duration::ZERO));
        assert_eq!(c.poll_due_at(t0), Some(h));
        assert_eq!(c.poll_due_at(t0), None);
    }

    #[test]
    fn refresh_clock_paces_subsequent_frames() {
        let mut c = RefreshClock::new(50.0);
        let t0 = Instant::now();
        c.request_frame_at(t0);
        c.poll_due_at(t0);

        let h = c.request_frame_at(t0);
        assert_eq!(c.time_until_due(t0), Some(Duration::from_millis(20)));
        assert_eq!(c.poll_due_at(t0 + Duration::from_millis(10)), None);
        assert_eq!(c.poll_due_at(t0 + Duration::from_millis(20)), Some(h));
    }

    #[test]
    fn refresh_clock_snaps_forward_when_late() {
        let mut c = RefreshClock::new(50.0);
        let t0 = Instant::now();
        c.request_frame_at(t0);
        let late = t0 + Duration::from_secs(1);
        c.poll_due_at(late);

        c.request_frame_at(late);
        assert_eq!(c.time_until_due(late), Some(Duration::from_millis(20)));
    }

    #[test]
    fn refresh_clock_cancel_ignores_foreign_handles() {
        let mut c = RefreshClock::new(60.0);
        let t0 = Instant::now();
        let a = c.request_frame_at(t0);
        c.cancel_frame(FrameHandle(a.id() + 100));
        assert!(c.is_pending());
        c.cancel_frame(a);
        assert!(!c.is_pending());
        assert_eq!(c.time_until_due(t0), None);
    }
}
