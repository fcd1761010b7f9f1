use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::RenderError;
use crate::flatten::Flattener;
use crate::layout::CellMetrics;

/// Points per millimetre.
pub const MM: f64 = 72.0 / 25.4;

/// ISO A4 portrait, in points.
pub const A4: (f64, f64) = (210.0 * MM, 297.0 * MM);

/// How big the page is.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageGeometry {
    /// A standard page; the table is scaled to its printable width.
    Fixed { width: f64, height: f64 },
    /// The page is as wide as the table needs.
    Computed { height: f64 },
}

impl PageGeometry {
    pub fn a4_portrait() -> Self {
        PageGeometry::Fixed {
            width: A4.0,
            height: A4.1,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(margin: f64) -> Self {
        Margins {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}', expected 'light' or 'dark'", other)),
        }
    }
}

/// How sub-transaction rows are shaded.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryShading {
    /// Every sub-transaction row gets the same shade.
    Fixed,
    /// Shades alternate within each holding's sub-transactions.
    #[default]
    Alternating,
}

/// Everything that varies between table variants.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct RenderConfig {
    #[builder(default = PageGeometry::a4_portrait())]
    pub page_geometry: PageGeometry,

    #[builder(default = Margins::uniform(20.0))]
    pub margins: Margins,

    #[builder(default)]
    pub theme: Theme,

    #[builder(default = 5.5)]
    pub font_size: f64,

    /// Horizontal padding per column, in points.
    #[builder(default = 2.0)]
    pub padding: f64,

    #[builder(default = 0.55)]
    pub char_width_factor: f64,

    /// Vertical padding above and below cell text, in points.
    #[builder(default = 2.0)]
    pub cell_padding: f64,

    #[builder(default)]
    pub secondary_shading: SecondaryShading,

    /// Column whose cell shows the user name on sub-transaction rows.
    #[builder(default = "symbol".to_string(), setter(into))]
    pub identity_column: String,

    #[builder(default, setter(strip_option, into))]
    pub secondary_marker: Option<String>,

    /// Document names are `<file_prefix>_<timestamp>.pdf`.
    #[builder(default = "portfolio".to_string(), setter(into))]
    pub file_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig::a4_portrait()
    }
}

impl RenderConfig {
    /// Page as wide as the table, 210mm tall.
    pub fn landscape() -> Self {
        RenderConfig::builder()
            .page_geometry(PageGeometry::Computed { height: 210.0 * MM })
            .margins(Margins::uniform(10.0))
            .font_size(7.0)
            .padding(5.0)
            .char_width_factor(0.6)
            .cell_padding(4.0)
            .file_prefix("portfolio_summary")
            .build()
    }

    /// Table squeezed onto A4 portrait.
    pub fn a4_portrait() -> Self {
        RenderConfig::builder()
            .file_prefix("portfolio_A4portrait")
            .build()
    }

    /// A4 portrait on a dark page.
    pub fn dark_a4() -> Self {
        RenderConfig::builder()
            .theme(Theme::Dark)
            .secondary_shading(SecondaryShading::Fixed)
            .file_prefix("darkcolored")
            .build()
    }

    pub fn metrics(&self) -> CellMetrics {
        CellMetrics::builder()
            .font_size(self.font_size)
            .padding(self.padding)
            .char_width_factor(self.char_width_factor)
            .build()
    }

    /// Total width the columns must add up to, if the page size is fixed.
    pub fn target_width(&self) -> Option<f64> {
        match self.page_geometry {
            PageGeometry::Fixed { width, .. } => Some(width - self.margins.horizontal()),
            PageGeometry::Computed { .. } => None,
        }
    }

    /// Page size for a table with the given column widths.
    pub fn page_size(&self, column_widths: &[f64]) -> (f64, f64) {
        match self.page_geometry {
            PageGeometry::Fixed { width, height } => (width, height),
            PageGeometry::Computed { height } => {
                (column_widths.iter().sum::<f64>() + self.margins.horizontal(), height)
            }
        }
    }

    pub fn flattener(&self) -> Flattener {
        Flattener {
            secondary_shading: self.secondary_shading,
            secondary_marker: self.secondary_marker.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let positive = [
            ("font_size", self.font_size),
            ("padding", self.padding),
            ("char_width_factor", self.char_width_factor),
        ];
        for (name, value) in positive.iter() {
            if !value.is_finite() || *value <= 0.0 {
                return Err(RenderError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let margins = [self.margins.top, self.margins.right, self.margins.bottom, self.margins.left];
        if margins.iter().chain([self.cell_padding].iter()).any(|m| !m.is_finite() || *m < 0.0) {
            return Err(RenderError::InvalidConfig(
                "margins and cell padding may not be negative".to_string(),
            ));
        }

        let (width, height) = match self.page_geometry {
            PageGeometry::Fixed { width, height } => (width, height),
            PageGeometry::Computed { height } => (f64::INFINITY, height),
        };
        if !height.is_finite() || height <= 0.0 || width <= self.margins.horizontal() {
            return Err(RenderError::InvalidConfig(format!(
                "page geometry {:?} leaves no room for the table",
                self.page_geometry
            )));
        }

        if self.identity_column.is_empty() {
            return Err(RenderError::InvalidConfig("identity column may not be empty".to_string()));
        }
        Ok(())
    }

    /// Applies every override that is set.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(geometry) = overrides.page_geometry {
            self.page_geometry = geometry;
        }
        if let Some(margins) = overrides.margins {
            self.margins = margins;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        if let Some(font_size) = overrides.font_size {
            self.font_size = font_size;
        }
        if let Some(padding) = overrides.padding {
            self.padding = padding;
        }
        if let Some(factor) = overrides.char_width_factor {
            self.char_width_factor = factor;
        }
        if let Some(cell_padding) = overrides.cell_padding {
            self.cell_padding = cell_padding;
        }
        if let Some(shading) = overrides.secondary_shading {
            self.secondary_shading = shading;
        }
        if let Some(identity) = &overrides.identity_column {
            self.identity_column = identity.clone();
        }
        if let Some(marker) = &overrides.secondary_marker {
            self.secondary_marker = Some(marker.clone());
        }
        if let Some(prefix) = &overrides.file_prefix {
            self.file_prefix = prefix.clone();
        }
    }
}

/// A partial [`RenderConfig`], as read from a config file or the command line.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub page_geometry: Option<PageGeometry>,
    pub margins: Option<Margins>,
    pub theme: Option<Theme>,
    pub font_size: Option<f64>,
    pub padding: Option<f64>,
    pub char_width_factor: Option<f64>,
    pub cell_padding: Option<f64>,
    pub secondary_shading: Option<SecondaryShading>,
    pub identity_column: Option<String>,
    pub secondary_marker: Option<String>,
    pub file_prefix: Option<String>,
}

/// The built-in table variants.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Preset {
    Landscape,
    A4Portrait,
    DarkA4,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Landscape, Preset::A4Portrait, Preset::DarkA4];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Landscape => "landscape",
            Preset::A4Portrait => "a4-portrait",
            Preset::DarkA4 => "dark-a4",
        }
    }

    pub fn config(&self) -> RenderConfig {
        match self {
            Preset::Landscape => RenderConfig::landscape(),
            Preset::A4Portrait => RenderConfig::a4_portrait(),
            Preset::DarkA4 => RenderConfig::dark_a4(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Preset::ALL.iter().map(Preset::name).collect();
                format!("unknown preset '{}', expected one of {}", s, names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for preset in Preset::ALL.iter() {
            preset.config().validate().unwrap();
            assert_eq!(preset.to_string().parse::<Preset>(), Ok(*preset));
        }
        assert!("letter".parse::<Preset>().is_err());
    }

    #[test]
    fn fixed_geometry_targets_printable_width() {
        let config = RenderConfig::a4_portrait();
        let target = config.target_width().unwrap();
        assert!((target - (A4.0 - 40.0)).abs() < 1e-9);
        assert_eq!(config.page_size(&[10.0, 20.0]), A4);
    }

    #[test]
    fn computed_geometry_follows_the_table() {
        let config = RenderConfig::landscape();
        assert_eq!(config.target_width(), None);
        let (width, height) = config.page_size(&[100.0, 50.5]);
        assert!((width - 170.5).abs() < 1e-9);
        assert!((height - 595.275590551).abs() < 1e-6);
    }

    #[test]
    fn dark_preset_uses_one_secondary_shade() {
        let config = RenderConfig::dark_a4();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.flattener().secondary_shading, SecondaryShading::Fixed);
    }

    #[test]
    fn validation_rejects_nonsense() {
        let mut config = RenderConfig::default();
        config.font_size = 0.0;
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        let mut config = RenderConfig::default();
        config.padding = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.margins = Margins::uniform(400.0);
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.identity_column.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_layer_over_a_preset() {
        let overrides: ConfigOverrides = serde_json::from_str(
            r#"{"theme": "dark", "font_size": 8, "page_geometry": {"computed": {"height": 500}}}"#,
        )
        .unwrap();
        let mut config = RenderConfig::a4_portrait();
        config.apply(&overrides);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.font_size, 8.0);
        assert_eq!(config.page_geometry, PageGeometry::Computed { height: 500.0 });
        assert_eq!(config.padding, 2.0);
        assert_eq!(config.file_prefix, "portfolio_A4portrait");
    }

    #[test]
    fn fixed_page_and_margins_from_json() {
        let overrides: ConfigOverrides = serde_json::from_str(
            r#"{"page_geometry": {"fixed": {"width": 612, "height": 792.5}},
                "margins": {"top": 1, "right": 2, "bottom": 3, "left": 4}}"#,
        )
        .unwrap();
        let mut config = RenderConfig::landscape();
        config.apply(&overrides);
        assert_eq!(
            config.page_geometry,
            PageGeometry::Fixed {
                width: 612.0,
                height: 792.5
            }
        );
        assert_eq!(config.target_width(), Some(606.0));
    }

    #[test]
    fn unknown_override_fields_are_rejected() {
        assert!(serde_json::from_str::<ConfigOverrides>(r#"{"colour": "red"}"#).is_err());
    }
}
