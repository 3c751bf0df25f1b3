use crossterm::style::{Color, Stylize};

use std::fmt;

/// Represents a tile of the field, which is either background or part of the road.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Untouched background.
    #[default]
    Grass,
    /// A cell carved into the road.
    Road,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const TILE_WIDTH: u16 = 2;

    /// Plain-text symbol used when the field is printed outside the terminal UI.
    pub fn symbol(&self) -> char {
        match self {
            Tile::Grass => '.',
            Tile::Road => '#',
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Grass => "🟩".with(Color::Green),
            Tile::Road => "🟫".with(Color::DarkYellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::TILE_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}
