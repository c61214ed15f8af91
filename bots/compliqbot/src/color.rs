// SPDX-License-Identifier: PMPL-1.0-or-later
//! CSS color parsing and normalization.
//!
//! Accepts the color notations authors write (`#rgb`, `#rrggbb`, `rgb()`,
//! `rgba()`, a handful of named colors, `transparent`) and renders them in the
//! `rgb(r, g, b)` / `rgba(r, g, b, a)` form browsers report for computed styles.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*([\d.]+)\s*)?\)$")
        .expect("valid regex")
});

/// An sRGB color with optional alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in `0.0..=1.0`; `None` means fully opaque.
    pub alpha: Option<f32>,
}

impl Rgb {
    /// Opaque color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: None }
    }

    /// Color with an explicit alpha channel.
    pub fn with_alpha(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha: Some(alpha.clamp(0.0, 1.0)) }
    }

    /// Whether the color is drawn fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.alpha.map_or(true, |a| a >= 1.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alpha {
            Some(a) if a < 1.0 => write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, a),
            _ => write!(f, "rgb({}, {}, {})", self.r, self.g, self.b),
        }
    }
}

/// Parse a CSS hex color (#rgb, #rrggbb) into an opaque color
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

/// Parse an `rgb()` or `rgba()` color. Channels above 255 are clamped.
pub fn parse_rgb_function(value: &str) -> Option<Rgb> {
    let caps = RGB_FUNCTION.captures(value)?;
    let channel = |i: usize| -> Option<u8> {
        let v: u32 = caps[i].parse().ok()?;
        Some(v.min(255) as u8)
    };
    let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);
    match caps.get(4) {
        Some(a) => Some(Rgb::with_alpha(r, g, b, a.as_str().parse().ok()?)),
        None => Some(Rgb::new(r, g, b)),
    }
}

/// Parse a named CSS color
pub fn parse_named_color(name: &str) -> Option<Rgb> {
    let rgb = match name {
        "transparent" => return Some(Rgb::with_alpha(0, 0, 0, 0.0)),
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "lime" => (0, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "fuchsia" | "magenta" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "whitesmoke" => (245, 245, 245),
        "ivory" => (255, 255, 240),
        "snow" => (255, 250, 250),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "gainsboro" => (220, 220, 220),
        _ => return None,
    };
    Some(Rgb::new(rgb.0, rgb.1, rgb.2))
}

/// Parse any supported CSS color value
pub fn parse_color(value: &str) -> Option<Rgb> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.starts_with('#') {
        parse_hex_color(&trimmed)
    } else if trimmed.starts_with("rgb") {
        parse_rgb_function(&trimmed)
    } else {
        parse_named_color(&trimmed)
    }
}
