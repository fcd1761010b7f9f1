use std::fmt;

use serde::{Serialize, Serializer};

use folio_core::{RowStyle, Shade};

use crate::config::Theme;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GREY: Rgb = Rgb(128, 128, 128);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Colours for every row style of a table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Palette {
    /// Fill behind the whole page, if it is not left blank.
    pub page_background: Option<Rgb>,
    pub header_fill: Rgb,
    pub header_text: Rgb,
    pub body_text: Rgb,
    pub primary_fill: [Rgb; 2],
    pub secondary_fill: [Rgb; 2],
    pub grid: Rgb,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        page_background: None,
        header_fill: Rgb(211, 211, 211),
        header_text: Rgb::BLACK,
        body_text: Rgb::BLACK,
        primary_fill: [Rgb(245, 245, 245), Rgb(235, 235, 235)],
        secondary_fill: [Rgb(253, 253, 240), Rgb(248, 248, 230)],
        grid: Rgb::GREY,
    };

    pub const DARK: Palette = Palette {
        page_background: Some(Rgb(28, 29, 34)),
        header_fill: Rgb(28, 29, 34),
        header_text: Rgb(245, 245, 245),
        body_text: Rgb::WHITE,
        primary_fill: [Rgb(36, 36, 51), Rgb(64, 64, 87)],
        secondary_fill: [Rgb(64, 64, 87), Rgb(64, 64, 87)],
        grid: Rgb::GREY,
    };

    pub fn fill(&self, style: RowStyle) -> Rgb {
        match style {
            RowStyle::Header => self.header_fill,
            RowStyle::Primary(shade) => self.primary_fill[index(shade)],
            RowStyle::Secondary(shade) => self.secondary_fill[index(shade)],
        }
    }

    pub fn text(&self, style: RowStyle) -> Rgb {
        match style {
            RowStyle::Header => self.header_text,
            _ => self.body_text,
        }
    }
}

fn index(shade: Shade) -> usize {
    match shade {
        Shade::Even => 0,
        Shade::Odd => 1,
    }
}

impl Theme {
    pub fn palette(&self) -> &'static Palette {
        match self {
            Theme::Light => &Palette::LIGHT,
            Theme::Dark => &Palette::DARK,
        }
    }
}
