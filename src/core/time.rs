//! Frame timing

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How far back the rolling statistics look
const HISTORY_SPAN: Duration = Duration::from_secs(15);

/// FPS statistics for a time window
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct FpsWindow {
    pub avg: f32,
    pub min: f32,
    pub max: f32,
}

/// Rolling FPS statistics over multiple time windows
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct FpsStats {
    pub one_sec: FpsWindow,
    pub five_sec: FpsWindow,
    pub fifteen_sec: FpsWindow,
    pub current_fps: f32,
    pub frame_count: u64,
}

/// Wall-clock timer for the render loop.
///
/// `elapsed_secs` plays the role of the platform "time since init" value the
/// airplane orbit is driven by; `delta_secs` is reported but the simulation
/// steps per frame.
pub struct FrameTimer {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    fps_timer: Instant,
    fps: f32,
    fps_frame_count: u32,
    /// (timestamp, frame time in seconds)
    history: VecDeque<(Instant, f32)>,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            fps_timer: now,
            fps: 0.0,
            fps_frame_count: 0,
            history: VecDeque::new(),
        }
    }

    /// Call once per frame
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.record_frame(now);
    }

    fn record_frame(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        self.history.push_back((now, self.delta.as_secs_f32()));
        while let Some(&(stamp, _)) = self.history.front() {
            if now.saturating_duration_since(stamp) > HISTORY_SPAN {
                self.history.pop_front();
            } else {
                break;
            }
        }

        let since_fps = now.saturating_duration_since(self.fps_timer);
        if since_fps >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / since_fps.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = now;
        }
    }

    /// Seconds since the timer was created, as of the last tick
    pub fn elapsed_secs(&self) -> f32 {
        self.last_frame.saturating_duration_since(self.start).as_secs_f32()
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Rolling FPS statistics over 1s, 5s, and 15s windows
    pub fn fps_stats(&self) -> FpsStats {
        FpsStats {
            one_sec: self.window_stats(Duration::from_secs(1)),
            five_sec: self.window_stats(Duration::from_secs(5)),
            fifteen_sec: self.window_stats(HISTORY_SPAN),
            current_fps: self.fps,
            frame_count: self.frame_count,
        }
    }

    fn window_stats(&self, window: Duration) -> FpsWindow {
        let frames: Vec<f32> = self
            .history
            .iter()
            .filter(|(stamp, _)| self.last_frame.saturating_duration_since(*stamp) <= window)
            .map(|&(_, dt)| dt)
            .collect();

        let total: f32 = frames.iter().sum();
        if frames.is_empty() || total <= 0.0 {
            return FpsWindow::default();
        }

        let rates = frames.iter().filter(|dt| **dt > 0.0).map(|dt| 1.0 / dt);
        let (min, max) = rates.fold((f32::INFINITY, 0.0f32), |(lo, hi), fps| (lo.min(fps), hi.max(fps)));

        FpsWindow {
            avg: frames.len() as f32 / total,
            min: if min.is_finite() { min } else { 0.0 },
            max,
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
