// accentctl/src/swatches.rs
// The fixed accent grid. Each tile shows one color and applies its R/B
// reversal, matching how the registry fields reinterpret the channel order.

use crate::color::{Color, HOVER_DARKEN_FACTOR};

const DISPLAY_COLORS: [Color; 20] = [
    Color::new(0xf2, 0x50, 0x50),
    Color::new(0x7f, 0x36, 0xc0),
    Color::new(0xfc, 0xd1, 0x16),
    Color::new(0x16, 0xc6, 0x0c),
    Color::new(0x3a, 0x96, 0xdd),
    Color::new(0x00, 0x78, 0xd7),
    Color::new(0x6b, 0x69, 0xd6),
    Color::new(0xb1, 0x46, 0xc2),
    Color::new(0xff, 0x8c, 0x00),
    Color::new(0xe7, 0x48, 0x56),
    Color::new(0x00, 0x99, 0xbc),
    Color::new(0x7a, 0x75, 0x74),
    Color::new(0x76, 0x76, 0x76),
    Color::new(0x4c, 0x4a, 0x48),
    Color::new(0x00, 0x00, 0x00),
    Color::new(0x11, 0x88, 0x11),
    Color::new(0x11, 0x88, 0x99),
    Color::new(0x99, 0x11, 0x88),
    Color::new(0xaa, 0x55, 0x00),
    Color::new(0x00, 0x55, 0xaa),
];

pub const GRID_COLUMNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub index: usize,
    pub display: Color,
}

impl Swatch {
    /// Color handed to the applier when this tile is picked.
    pub fn apply_color(&self) -> Color {
        self.display.reverse_channels()
    }

    pub fn hover_color(&self) -> Color {
        self.display.darken(HOVER_DARKEN_FACTOR)
    }

    pub fn grid_position(&self) -> (usize, usize) {
        (self.index / GRID_COLUMNS, self.index % GRID_COLUMNS)
    }
}

pub fn all() -> impl Iterator<Item = Swatch> {
    DISPLAY_COLORS.iter().enumerate().map(|(index, &display)| Swatch { index, display })
}

/// 1-based lookup, as shown to the user.
pub fn by_number(number: usize) -> Option<Swatch> {
    number.checked_sub(1).and_then(|index| {
        DISPLAY_COLORS.get(index).map(|&display| Swatch { index, display })
    })
}
