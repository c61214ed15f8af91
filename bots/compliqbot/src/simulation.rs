// SPDX-License-Identifier: PMPL-1.0-or-later
//! Impairment simulation state.
//!
//! Toggling a simulation is a pure transition: a [`Command`] applied to a
//! [`SimulationState`] yields the next state, and an [`Overlay`] is then asked
//! to make the target match that state. Rendering overlays is left to hosts.
//!
//! The color-vision matrices are the ones the overlay filters use, so
//! [`ColorBlindness::simulate`] shows what a single color turns into.

use crate::color::Rgb;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Color-vision deficiency to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBlindness {
    /// Red-blind
    #[default]
    Protanopia,
    /// Green-blind
    Deuteranopia,
    /// Blue-blind
    Tritanopia,
    /// No color perception
    Achromatopsia,
}

impl ColorBlindness {
    pub const ALL: [ColorBlindness; 4] = [
        ColorBlindness::Protanopia,
        ColorBlindness::Deuteranopia,
        ColorBlindness::Tritanopia,
        ColorBlindness::Achromatopsia,
    ];

    /// Row-major RGB transform
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        match self {
            ColorBlindness::Protanopia => {
                [[0.567, 0.433, 0.0], [0.558, 0.442, 0.0], [0.0, 0.242, 0.758]]
            }
            ColorBlindness::Deuteranopia => {
                [[0.625, 0.375, 0.0], [0.7, 0.3, 0.0], [0.0, 0.3, 0.7]]
            }
            ColorBlindness::Tritanopia => {
                [[0.95, 0.05, 0.0], [0.0, 0.433, 0.567], [0.0, 0.475, 0.525]]
            }
            ColorBlindness::Achromatopsia => {
                [[0.299, 0.587, 0.114], [0.299, 0.587, 0.114], [0.299, 0.587, 0.114]]
            }
        }
    }

    /// How `color` appears under this deficiency. Alpha is kept.
    pub fn simulate(&self, color: Rgb) -> Rgb {
        let input = [color.r as f64, color.g as f64, color.b as f64];
        let m = self.matrix();
        let channel = |row: usize| -> u8 {
            let v: f64 = (0..3).map(|col| m[row][col] * input[col]).sum();
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: channel(0),
            g: channel(1),
            b: channel(2),
            alpha: color.alpha,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBlindness::Protanopia => "protanopia",
            ColorBlindness::Deuteranopia => "deuteranopia",
            ColorBlindness::Tritanopia => "tritanopia",
            ColorBlindness::Achromatopsia => "achromatopsia",
        }
    }
}

impl std::fmt::Display for ColorBlindness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColorBlindness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorBlindness::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown color blindness type: {}", s))
    }
}

/// Color-blindness toggle plus the selected deficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorBlindnessState {
    pub active: bool,
    #[serde(rename = "type")]
    pub kind: ColorBlindness,
}

/// Which simulations are on. Everything is off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationState {
    pub keyboard_navigation: bool,
    pub screen_reader: bool,
    pub low_vision: bool,
    // Tables serialize after plain values in TOML
    pub color_blindness: ColorBlindnessState,
}

/// A discrete state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetColorBlindness(bool),
    SetColorBlindnessType(ColorBlindness),
    SetKeyboardNavigation(bool),
    SetScreenReader(bool),
    SetLowVision(bool),
    Reset,
}

impl SimulationState {
    /// Next state after `command`
    pub fn apply(self, command: Command) -> Self {
        let mut next = self;
        match command {
            Command::SetColorBlindness(on) => next.color_blindness.active = on,
            Command::SetColorBlindnessType(kind) => next.color_blindness.kind = kind,
            Command::SetKeyboardNavigation(on) => next.keyboard_navigation = on,
            Command::SetScreenReader(on) => next.screen_reader = on,
            Command::SetLowVision(on) => next.low_vision = on,
            Command::Reset => next = SimulationState::default(),
        }
        next
    }

    pub fn any_active(&self) -> bool {
        self.color_blindness.active || self.keyboard_navigation || self.screen_reader || self.low_vision
    }

    /// Names of the simulations that are on
    pub fn active_simulations(&self) -> Vec<&'static str> {
        [
            (self.color_blindness.active, "color-blindness"),
            (self.keyboard_navigation, "keyboard-navigation"),
            (self.screen_reader, "screen-reader"),
            (self.low_vision, "low-vision"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// A target that can be brought in line with a simulation state.
///
/// `apply` must be idempotent: applying the same state twice leaves the
/// target as applying it once did.
pub trait Overlay {
    fn apply(&mut self, state: &SimulationState);
}

/// Transition `state` by `command` and sync `overlay` with the result.
pub fn dispatch<O: Overlay + ?Sized>(
    overlay: &mut O,
    state: SimulationState,
    command: Command,
) -> SimulationState {
    let next = state.apply(command);
    debug!(?command, active = ?next.active_simulations(), "Simulation state updated");
    overlay.apply(&next);
    next
}
