use serde::{Deserialize, Serialize};
use crate::models::DEFAULT_QUADRANT_NAMES;

/// Appearance settings for the matrix view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub background_color: String,
    pub text_color: String,
    /// Background opacity in percent (0-100)
    pub opacity: u8,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            background_color: "#646464".to_string(),
            text_color: "#FFFFFF".to_string(),
            opacity: 95,
        }
    }
}

impl Appearance {
    /// Background as a CSS-style `rgba(r, g, b, a)` string
    ///
    /// Returns None if the background color is not `#RRGGBB`.
    pub fn rgba(&self) -> Option<String> {
        let (r, g, b) = parse_hex_color(&self.background_color)?;
        Some(format!("rgba({}, {}, {}, {})", r, g, b, f64::from(self.opacity) / 100.0))
    }
}

/// Quadrant display names, in matrix order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantNames {
    pub names: Vec<String>,
}

impl Default for QuadrantNames {
    fn default() -> Self {
        Self {
            names: DEFAULT_QUADRANT_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// The persisted settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub appearance: Appearance,
    pub quadrants: QuadrantNames,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            appearance: Appearance::default(),
            quadrants: QuadrantNames::default(),
            theme: "dark".to_string(),
        }
    }
}

impl Settings {
    /// Display name of the quadrant at `index` (0-based), falling back to the default
    pub fn quadrant_name(&self, index: usize) -> &str {
        self.quadrants
            .names
            .get(index)
            .map(String::as_str)
            .or_else(|| DEFAULT_QUADRANT_NAMES.get(index).copied())
            .unwrap_or("")
    }

    /// Check the document before it is written
    pub fn validate(&self) -> Result<(), String> {
        if self.appearance.opacity > 100 {
            return Err(format!(
                "Invalid opacity: {}. Opacity must be between 0 and 100.",
                self.appearance.opacity
            ));
        }
        for (field, color) in [
            ("background color", &self.appearance.background_color),
            ("text color", &self.appearance.text_color),
        ] {
            if parse_hex_color(color).is_none() {
                return Err(format!("Invalid {}: '{}'. Use the form #RRGGBB.", field, color));
            }
        }
        if self.quadrants.names.len() != DEFAULT_QUADRANT_NAMES.len() {
            return Err(format!(
                "Expected {} quadrant names, found {}",
                DEFAULT_QUADRANT_NAMES.len(),
                self.quadrants.names.len()
            ));
        }
        if self.quadrants.names.iter().any(|n| n.trim().is_empty()) {
            return Err("Quadrant names cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Parse `#RRGGBB` into its components
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
