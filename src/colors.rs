use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AnnotateError, Result};

// SVG named colors with the whites, greys, blacks, browns, and beiges
// removed. The default list is rearranged to avoid consecutive similar
// shades; dark, light, and medium are alphabetical.
pub const DEFAULT_COLORS: &[&str] = &[
    "maroon",
    "goldenrod",
    "blue",
    "coral",
    "orchid",
    "limegreen",
    "indigo",
    "red",
    "gold",
    "royalblue",
    "salmon",
    "plum",
    "yellowgreen",
    "midnightblue",
    "firebrick",
    "yellow",
    "steelblue",
    "orange",
    "blueviolet",
    "green",
    "purple",
    "orangered",
    "chartreuse",
    "cornflowerblue",
    "indianred",
    "violet",
    "magenta",
    "seagreen",
    "crimson",
    "greenyellow",
    "cyan",
    "deeppink",
    "slateblue",
    "hotpink",
    "springgreen",
    "tomato",
    "lawngreen",
    "dodgerblue",
    "pink",
    "lime",
    "deepskyblue",
    "olivedrab",
    "cadetblue",
    "navy",
    "darkorange",
    "turquoise",
    "teal",
    "skyblue",
    "forestgreen",
];

pub const DARK_COLORS: &[&str] = &[
    "darkblue",
    "darkcyan",
    "darkgoldenrod",
    "darkgreen",
    "darkmagenta",
    "darkorange",
    "darkorchid",
    "darkred",
    "darksalmon",
    "darkseagreen",
    "darkslateblue",
    "darkturquoise",
    "darkviolet",
];

pub const LIGHT_COLORS: &[&str] = &[
    "lightblue",
    "lightcoral",
    "lightgreen",
    "lightpink",
    "lightsalmon",
    "lightseagreen",
    "lightskyblue",
    "lightsteelblue",
    "palegreen",
    "paleturquoise",
    "palevioletred",
];

pub const MEDIUM_COLORS: &[&str] = &[
    "mediumaquamarine",
    "mediumblue",
    "mediumorchid",
    "mediumpurple",
    "mediumseagreen",
    "mediumslateblue",
    "mediumspringgreen",
    "mediumturquoise",
    "mediumvioletred",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKind {
    #[default]
    Default,
    Light,
    Dark,
    Medium,
    All,
    AllRandom,
    Custom,
    CustomRandom,
}

impl PaletteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteKind::Default => "default",
            PaletteKind::Light => "light",
            PaletteKind::Dark => "dark",
            PaletteKind::Medium => "medium",
            PaletteKind::All => "all",
            PaletteKind::AllRandom => "all_random",
            PaletteKind::Custom => "custom",
            PaletteKind::CustomRandom => "custom_random",
        }
    }

    fn is_custom(self) -> bool {
        matches!(self, PaletteKind::Custom | PaletteKind::CustomRandom)
    }

    fn is_shuffled(self) -> bool {
        matches!(self, PaletteKind::AllRandom | PaletteKind::CustomRandom)
    }
}

impl FromStr for PaletteKind {
    type Err = AnnotateError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "default" => Ok(PaletteKind::Default),
            "light" => Ok(PaletteKind::Light),
            "dark" => Ok(PaletteKind::Dark),
            "medium" => Ok(PaletteKind::Medium),
            "all" => Ok(PaletteKind::All),
            "all_random" => Ok(PaletteKind::AllRandom),
            "custom" => Ok(PaletteKind::Custom),
            "custom_random" => Ok(PaletteKind::CustomRandom),
            other => Err(AnnotateError::UnknownPalette(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default)]
    pub palette: PaletteKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl PaletteConfig {
    pub fn custom(colors: Vec<String>) -> Self {
        Self {
            palette: PaletteKind::Custom,
            colors: Some(colors),
        }
    }

    /// Check the configuration without building a generator, so a bad
    /// palette is reported before any matching or placement work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.palette.is_custom() {
            return Ok(());
        }

        let colors = self
            .colors
            .as_deref()
            .filter(|colors| !colors.is_empty())
            .ok_or(AnnotateError::MissingColorList {
                palette: self.palette.as_str(),
            })?;

        for color in colors {
            if !is_recognized_color(color) {
                return Err(AnnotateError::InvalidColor {
                    palette: self.palette.as_str(),
                    color: color.clone(),
                });
            }
        }

        Ok(())
    }
}

/// A recognized color is an SVG color name or a `#rgb`/`#rrggbb` hex code.
pub fn is_recognized_color(value: &str) -> bool {
    if palette::named::from_str(value).is_some() {
        return true;
    }
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.parse::<palette::Srgb<u8>>().is_ok())
}

/// Infinite cyclic color sequence drawn from the configured palette.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    colors: Vec<String>,
    cursor: usize,
}

impl ColorCycle {
    pub fn new(config: &PaletteConfig) -> Result<Self> {
        config.validate()?;

        let mut colors: Vec<String> = match config.palette {
            PaletteKind::Default => owned(DEFAULT_COLORS),
            PaletteKind::Light => owned(LIGHT_COLORS),
            PaletteKind::Dark => owned(DARK_COLORS),
            PaletteKind::Medium => owned(MEDIUM_COLORS),
            PaletteKind::All | PaletteKind::AllRandom => DEFAULT_COLORS
                .iter()
                .chain(DARK_COLORS)
                .chain(LIGHT_COLORS)
                .chain(MEDIUM_COLORS)
                .map(|color| color.to_string())
                .collect(),
            PaletteKind::Custom | PaletteKind::CustomRandom => {
                config.colors.clone().unwrap_or_default()
            }
        };

        // Shuffled palettes are shuffled exactly once; the cycle repeats the
        // same order forever afterwards.
        if config.palette.is_shuffled() {
            colors.shuffle(&mut rand::rng());
        }

        Ok(Self { colors, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn next(&mut self) -> String {
        let color = self.colors[self.cursor % self.colors.len()].clone();
        self.cursor += 1;
        color
    }
}

fn owned(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|color| color.to_string()).collect()
}
