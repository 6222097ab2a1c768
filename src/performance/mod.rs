//! # Frame Statistics
//!
//! Tracks frame intervals and scene counts for the on-screen statistics
//! overlay. Purely observational: nothing here feeds back into a demo.
//!
//! ## Usage
//!
//! ```rust
//! use cubist::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//!
//! // Once per redraw
//! monitor.record_frame();
//! // ... render frame ...
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::gfx::scene::scene::SceneStatistics;

/// Performance metrics shown in the overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceMetrics {
    /// Current frames per second
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Minimum frame time in the current window
    pub min_frame_time_ms: f32,
    /// Maximum frame time in the current window
    pub max_frame_time_ms: f32,
    /// Objects drawn in the last frame
    pub draw_calls: u32,
    /// Triangles in the visible objects
    pub triangle_count: u32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            draw_calls: 0,
            triangle_count: 0,
        }
    }
}

/// Performance monitoring system
pub struct PerformanceMonitor {
    /// Ring buffer of recent frame intervals for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum number of frame times to keep for averaging
    max_samples: usize,
    last_frame: Option<Instant>,
    /// Current performance metrics
    current_metrics: PerformanceMetrics,
    /// Last time metrics were updated
    last_update: Option<Instant>,
    /// Update interval for metrics calculation
    update_interval: Duration,
}

impl PerformanceMonitor {
    /// Create a new performance monitor
    pub fn new() -> Self {
        Self::with_samples(120) // ~2 seconds at 60fps
    }

    pub fn with_samples(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_frame: None,
            current_metrics: PerformanceMetrics::default(),
            last_update: None,
            update_interval: Duration::from_millis(100), // 10 times per second
        }
    }

    /// Records the time since the previous call
    pub fn record_frame(&mut self) {
        self.record_frame_at(Instant::now());
    }

    pub fn record_frame_at(&mut self, now: Instant) {
        if let Some(previous) = self.last_frame.replace(now) {
            self.add_frame_time(now.saturating_duration_since(previous));
        }

        let due = self
            .last_update
            .map_or(true, |last| now.saturating_duration_since(last) >= self.update_interval);
        if due {
            self.update_metrics();
            self.last_update = Some(now);
        }
    }

    /// Forgets the previous frame so a pause is not counted as a frame
    pub fn pause(&mut self) {
        self.last_frame = None;
    }

    fn add_frame_time(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time_ms =
            total_time.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    /// Update render statistics
    pub fn update_render_stats(&mut self, stats: SceneStatistics) {
        self.current_metrics.draw_calls = stats.visible_count as u32;
        self.current_metrics.triangle_count = stats.total_triangles;
    }

    /// Get current performance metrics
    pub fn get_metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    /// Get frame time history for graphing
    pub fn get_frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Render a compact statistics overlay in the top-left corner
    pub fn render_overlay(&self, ui: &imgui::Ui) {
        let metrics = &self.current_metrics;

        ui.window("Stats")
            .position([10.0, 10.0], imgui::Condition::Always)
            .always_auto_resize(true)
            .no_decoration()
            .no_inputs()
            .bg_alpha(0.35)
            .build(|| {
                ui.text(format!("{:.0} FPS", metrics.fps));
                ui.text(format!(
                    "{:.1} ms ({:.1}-{:.1})",
                    metrics.frame_time_ms, metrics.min_frame_time_ms, metrics.max_frame_time_ms
                ));
                ui.text(format!(
                    "{} draws, {} tris",
                    metrics.draw_calls, metrics.triangle_count
                ));

                let history = self.get_frame_time_history();
                if !history.is_empty() {
                    ui.plot_lines("##frame_times", &history)
                        .graph_size([160.0, 40.0])
                        .scale_min(0.0)
                        .scale_max(50.0) // 50ms max for good visibility
                        .build();
                }
            });
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_from_steady_frames() {
        let mut monitor = PerformanceMonitor::new();
        let start = Instant::now();
        for frame in 0..=20 {
            monitor.record_frame_at(start + Duration::from_millis(20 * frame));
        }

        let metrics = monitor.get_metrics();
        assert!((metrics.frame_time_ms - 20.0).abs() < 0.01);
        assert!((metrics.fps - 50.0).abs() < 0.1);
    }

    #[test]
    fn test_pause_skips_the_gap() {
        let mut monitor = PerformanceMonitor::new();
        let start = Instant::now();
        monitor.record_frame_at(start);
        monitor.record_frame_at(start + Duration::from_millis(10));
        monitor.pause();
        monitor.record_frame_at(start + Duration::from_secs(5));

        let history = monitor.get_frame_time_history();
        assert_eq!(history.len(), 1);
        assert!((history[0] - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut monitor = PerformanceMonitor::with_samples(4);
        let start = Instant::now();
        for frame in 0..10 {
            monitor.record_frame_at(start + Duration::from_millis(16 * frame));
        }
        assert_eq!(monitor.get_frame_time_history().len(), 4);
    }
}
