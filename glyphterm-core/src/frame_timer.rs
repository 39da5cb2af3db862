use std::collections::VecDeque;

/// Sliding-window average of frame times.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    samples_ms: VecDeque<f32>,
}

impl FrameTimer {
    /// Number of frames averaged.
    pub const WINDOW: usize = 5;

    /// Creates a timer with no samples.
    pub fn new() -> Self {
        Self { samples_ms: VecDeque::with_capacity(Self::WINDOW + 1) }
    }

    /// Records a frame time, evicting the oldest sample once the window is
    /// full, and returns the new average in milliseconds.
    pub fn record(&mut self, delta_seconds: f32) -> f32 {
        self.samples_ms.push_back(delta_seconds * 1000.0);
        if self.samples_ms.len() > Self::WINDOW {
            self.samples_ms.pop_front();
        }

        self.average_ms()
    }

    /// Mean of the samples in the window, or zero before the first frame.
    pub fn average_ms(&self) -> f32 {
        if self.samples_ms.is_empty() {
            return 0.0;
        }

        self.samples_ms.iter().sum::<f32>() / self.samples_ms.len() as f32
    }

    /// Number of samples currently in the window.
    pub fn len(&self) -> usize {
        self.samples_ms.len()
    }

    /// True before the first recorded frame.
    pub fn is_empty(&self) -> bool {
        self.samples_ms.is_empty()
    }

    /// The status line drawn by [`crate::LayerManager::update`].
    pub fn status_string(&self) -> String {
        format!(" frame total: {:>10.4}ms", self.average_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_over_a_strict_window() {
        let mut timer = FrameTimer::new();
        for _ in 0..5 {
            timer.record(0.010);
        }
        assert!((timer.average_ms() - 10.0).abs() < 1e-4);

        // a sixth frame evicts the first
        let avg = timer.record(0.040);
        assert_eq!(timer.len(), FrameTimer::WINDOW);
        assert!((avg - 16.0).abs() < 1e-4);
    }

    #[test]
    fn status_string_has_fixed_width() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.status_string(), " frame total:     0.0000ms");

        timer.record(0.016_666);
        assert_eq!(timer.status_string(), " frame total:    16.6660ms");
        assert_eq!(timer.status_string().len(), 26);
    }
}
