use compact_str::{CompactString, format_compact};
use glyphterm_data::{Rgb, codes};

const COLD: [f32; 3] = [0.57, 0.00, 0.29];
const MIDPOINT: [f32; 3] = [0.74, 0.59, 0.17];
const DONE: [f32; 3] = [0.15, 0.60, 0.05];

/// State of a labelled progress bar.
///
/// Rendered as `label[████░░░░] 50.0%`; the filled portion uses the
/// full-block glyph and the remainder the light-shade glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    /// Text before the bar
    pub label: CompactString,
    /// Units of work in total
    pub total: u64,
    /// Units of work completed
    pub done: u64,
    /// Bar width in cells, excluding brackets
    pub bar_width: usize,
}

impl ProgressBar {
    /// Bar width used by [`ProgressBar::new`].
    pub const DEFAULT_BAR_WIDTH: usize = 20;

    /// Creates an empty progress bar over `total` units.
    pub fn new(label: impl Into<CompactString>, total: u64) -> Self {
        Self {
            label: label.into(),
            total,
            done: 0,
            bar_width: Self::DEFAULT_BAR_WIDTH,
        }
    }

    /// Sets the bar width in cells.
    #[must_use]
    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }

    /// Records `units` more completed work, saturating at `total`.
    pub fn advance(&mut self, units: u64) {
        self.done = self.done.saturating_add(units).min(self.total);
    }

    /// Completed fraction in `[0.0, 1.0]`; a bar with no work is complete.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }

        (self.done as f64 / self.total as f64).clamp(0.0, 1.0) as f32
    }

    fn filled_cells(&self) -> usize {
        ((self.fraction() * self.bar_width as f32) as usize).min(self.bar_width)
    }

    /// The filled part of the bar.
    pub fn filled_portion(&self) -> String {
        char::from(codes::FILL_100)
            .to_string()
            .repeat(self.filled_cells())
    }

    /// The unfilled part of the bar.
    pub fn empty_portion(&self) -> String {
        char::from(codes::FILL_25)
            .to_string()
            .repeat(self.bar_width - self.filled_cells())
    }

    /// Completed percentage with one decimal, right-aligned to five columns.
    pub fn percentage_string(&self) -> CompactString {
        format_compact!("{:5.1}", self.fraction() * 100.0)
    }

    /// The full rendered text: label, bracketed bar and percentage.
    pub fn current_state(&self) -> String {
        format!(
            "{}[{}{}] {}%",
            self.label,
            self.filled_portion(),
            self.empty_portion(),
            self.percentage_string()
        )
    }

    /// Width of [`ProgressBar::current_state`] in cells.
    pub fn display_width(&self) -> usize {
        self.label.chars().count() + self.bar_width + 3 + self.percentage_string().len() + 1
    }

    /// Color of the bar: magenta through gold at half way to green when done.
    pub fn color(&self) -> Rgb {
        bar_color(self.fraction())
    }
}

/// Two-segment interpolation from the cold end over gold to green.
pub fn bar_color(fraction: f32) -> Rgb {
    let [r, g, b] = if fraction < 0.5 {
        mix(COLD, MIDPOINT, fraction * 2.0)
    } else {
        mix(MIDPOINT, DONE, (fraction - 0.5) * 2.0)
    };
    Rgb::from_unit(r, g, b)
}

fn mix(x: [f32; 3], y: [f32; 3], a: f32) -> [f32; 3] {
    [0, 1, 2].map(|i| x[i] * (1.0 - a) + y[i] * a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_interpolates_through_gold() {
        assert_eq!(bar_color(0.0), Rgb::new(145, 0, 73));
        assert_eq!(bar_color(0.5), Rgb::new(188, 150, 43));
        assert_eq!(bar_color(1.0), Rgb::new(38, 153, 12));

        // cold end leans magenta, done end leans green
        let cold = bar_color(0.0);
        assert!(cold.r > cold.g && cold.b > cold.g);
        let done = bar_color(1.0);
        assert!(done.g > done.r && done.g > done.b);
    }

    #[test]
    fn rendered_state_matches_display_width() {
        let mut bar = ProgressBar::new("build ", 8).with_bar_width(8);
        bar.advance(3);

        assert_eq!(bar.filled_portion().chars().count(), 3);
        assert_eq!(bar.empty_portion().chars().count(), 5);
        assert_eq!(bar.percentage_string(), " 37.5");
        assert_eq!(bar.current_state().chars().count(), bar.display_width());
        assert!(bar.current_state().starts_with("build ["));
        assert!(bar.current_state().ends_with("]  37.5%"));
    }

    #[test]
    fn advance_saturates_at_total() {
        let mut bar = ProgressBar::new("", 10);
        bar.advance(7);
        bar.advance(7);

        assert_eq!(bar.done, 10);
        assert_eq!(bar.fraction(), 1.0);
        assert_eq!(bar.empty_portion(), "");
        assert_eq!(bar.percentage_string(), "100.0");
    }

    #[test]
    fn empty_work_is_complete() {
        let bar = ProgressBar::new("idle", 0);
        assert_eq!(bar.fraction(), 1.0);
        assert_eq!(bar.filled_portion().chars().count(), ProgressBar::DEFAULT_BAR_WIDTH);
    }
}
