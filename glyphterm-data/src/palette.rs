use crate::Rgb;

/// Named colors used by the overlay's built-in widgets.
#[rustfmt::skip]
pub mod colors {
    use crate::Rgb;

    /// Progress bar midpoint, status accents
    pub const GOLD: Rgb    = Rgb::new(191, 146,  23);
    /// Positive status
    pub const GREEN: Rgb   = Rgb::new(100, 186,  20);
    /// Informational status
    pub const BLUE: Rgb    = Rgb::new( 50, 103, 184);
    /// Errors
    pub const RED: Rgb     = Rgb::new(255,   0,   0);
    /// Default status text
    pub const WHITE: Rgb   = Rgb::new(255, 255, 255);
    /// Hex dump addresses
    pub const GREY: Rgb    = Rgb::new(169, 169, 169);
    /// Hex dump separators
    pub const GREY_D: Rgb  = Rgb::new(100, 100, 100);
    /// Dim decorations
    pub const GREY_DD: Rgb = Rgb::new( 50,  50,  50);
    /// Opaque strip behind status strings
    pub const BLACK: Rgb   = Rgb::new( 16,  16,  16);
    /// Text of the line being edited
    pub const INPUT: Rgb   = Rgb::new(166, 166, 166);
}

/// A five-entry terminal color scheme.
///
/// | Slot | Use                                 |
/// |------|-------------------------------------|
/// | 0    | terminal background                 |
/// | 1    | history text, timestamp brackets    |
/// | 2    | secondary text                      |
/// | 3    | prompt, cursor, timestamp digits    |
/// | 4    | neutral grey                        |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminalPalette {
    /// The five palette slots
    pub slots: [Rgb; 5],
}

impl TerminalPalette {
    /// Slot index of the background color.
    pub const BACKGROUND: usize = 0;
    /// Slot index of the regular text color.
    pub const TEXT: usize = 1;
    /// Slot index of the secondary text color.
    pub const SECONDARY: usize = 2;
    /// Slot index of the highlight color.
    pub const HIGHLIGHT: usize = 3;
    /// Slot index of the neutral grey.
    pub const NEUTRAL: usize = 4;

    /// The built-in schemes: green, red, blue and pink.
    #[rustfmt::skip]
    pub const PRESETS: [TerminalPalette; 4] = [
        TerminalPalette { slots: [
            Rgb::new( 17,  35,  24),
            Rgb::new( 72, 120,  40),
            Rgb::new(137, 162,  87),
            Rgb::new(191, 146,  23),
            Rgb::new(166, 166, 166),
        ] },
        TerminalPalette { slots: [
            Rgb::new( 58,   0,   0),
            Rgb::new(124,   3,   0),
            Rgb::new(224,  66,  23),
            Rgb::new(242, 109,  31),
            Rgb::new(166, 166, 166),
        ] },
        TerminalPalette { slots: [
            Rgb::new(  7,   8,  16),
            Rgb::new( 82, 165, 222),
            Rgb::new(172, 214, 246),
            Rgb::new(235, 249, 255),
            Rgb::new(166, 166, 166),
        ] },
        TerminalPalette { slots: [
            Rgb::new( 19,   2,   8),
            Rgb::new( 70,  14,  43),
            Rgb::new(213,  60, 106),
            Rgb::new(255, 130, 116),
            Rgb::new(166, 166, 166),
        ] },
    ];

    /// Returns the built-in palette at `index`, wrapping around the preset list.
    pub fn preset(index: usize) -> Self {
        Self::PRESETS[index % Self::PRESETS.len()]
    }

    /// Returns the color in `slot`; out-of-range slots yield the neutral grey.
    pub fn color(&self, slot: usize) -> Rgb {
        self.slots
            .get(slot)
            .copied()
            .unwrap_or(self.slots[Self::NEUTRAL])
    }

    /// Background color.
    pub fn background(&self) -> Rgb {
        self.slots[Self::BACKGROUND]
    }

    /// Regular text color.
    pub fn text(&self) -> Rgb {
        self.slots[Self::TEXT]
    }

    /// Prompt and cursor color.
    pub fn highlight(&self) -> Rgb {
        self.slots[Self::HIGHLIGHT]
    }
}

impl Default for TerminalPalette {
    fn default() -> Self {
        Self::PRESETS[0]
    }
}
