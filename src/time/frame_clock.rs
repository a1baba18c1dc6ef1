//=========================================================================
// Frame Clock
//=========================================================================
//
// Frame timing for the render loop: clamped delta time, total running
// time, and a once-per-second report window.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== FrameTime ===========================================================

/// Timing snapshot of one rendered frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped.
    pub dt: f32,

    /// Seconds of rendered time accumulated since the first frame.
    pub running_time: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

//=== FrameReport =========================================================

/// Emitted once per elapsed second of running time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub frames: u32,
    pub running_time: f64,
}

//=== FrameClock ==========================================================

/// Per-loop frame clock.
///
/// Delta time is clamped so a long pause (backgrounded app, debugger)
/// does not show up as one enormous step when rendering resumes.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    running_time: f64,
    window_time: f64,
    window_frames: u32,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: None,
            frame_index: 0,
            running_time: 0.0,
            window_time: 0.0,
            window_frames: 0,
            dt_min,
            dt_max,
        }
    }

    /// Forgets the previous frame timestamp, so the next tick starts a
    /// fresh delta (used when leaving Paused).
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Advances the clock by one frame.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).clamp(self.dt_min, self.dt_max),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let dt = dt.as_secs_f64();
        self.running_time += dt;
        self.window_time += dt;
        self.window_frames += 1;

        let ft = FrameTime {
            dt: dt as f32,
            running_time: self.running_time,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Returns a report if at least one second of running time has
    /// accumulated since the last report.
    pub fn take_report(&mut self) -> Option<FrameReport> {
        if self.window_time < 1.0 {
            return None;
        }

        let report = FrameReport {
            frames: self.window_frames,
            running_time: self.running_time,
        };
        self.window_time -= 1.0;
        self.window_frames = 0;
        Some(report)
    }

    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    pub fn running_time(&self) -> f64 {
        self.running_time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
