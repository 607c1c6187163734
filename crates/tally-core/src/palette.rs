use serde::{Deserialize, Serialize};

pub const DEFAULT_COLORS: &[&str] = &[
    "#F44336", "#E91E63", "#9C27B0", "#673AB7", "#3F51B5", "#2196F3", "#03A9F4", "#00BCD4",
    "#009688", "#4CAF50", "#8BC34A", "#CDDC39", "#FFEB3B", "#FFC107", "#FF9800", "#FF5722",
    "#795548", "#9E9E9E", "#607D8B",
];

pub const DEFAULT_ICONS: &[&str] = &[
    "cutlery", "car", "home", "shopping-cart", "heartbeat", "graduation-cap", "plane", "gamepad",
    "gift", "paw", "tshirt", "bolt", "wifi", "phone", "film", "book", "dumbbell", "coffee",
    "money-bill", "piggy-bank",
];

/// Option sets offered by the color and icon pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<String>,
    pub icons: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|s| s.to_string()).collect(),
            icons: DEFAULT_ICONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Palette {
    /// Replace either set, keeping the default for whichever is `None` or empty.
    pub fn with_overrides(colors: Option<Vec<String>>, icons: Option<Vec<String>>) -> Self {
        let mut palette = Self::default();
        if let Some(colors) = colors.filter(|c| !c.is_empty()) {
            palette.colors = colors;
        }
        if let Some(icons) = icons.filter(|i| !i.is_empty()) {
            palette.icons = icons;
        }
        palette
    }
}

/// Parse a `#RRGGBB` token into its components.
pub fn parse_hex_color(token: &str) -> Option<(u8, u8, u8)> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
