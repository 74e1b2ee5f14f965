// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Brightness bands derived from the raw light level

use std::fmt;
use serde::{Deserialize, Serialize};

/// Brightness band, ordered from darkest to brightest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Brightness {
    VeryDark,
    Dark,
    Dim,
    Moderate,
    Bright,
    VeryBright,
}

impl Brightness {
    /// Classify a raw 0-1023 light reading
    pub fn from_raw(light: u32) -> Self {
        match light {
            0..=99 => Brightness::VeryDark,
            100..=199 => Brightness::Dark,
            200..=399 => Brightness::Dim,
            400..=599 => Brightness::Moderate,
            600..=799 => Brightness::Bright,
            _ => Brightness::VeryBright,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Brightness::VeryDark => "Very Dark",
            Brightness::Dark => "Dark",
            Brightness::Dim => "Dim",
            Brightness::Moderate => "Moderate",
            Brightness::Bright => "Bright",
            Brightness::VeryBright => "Very Bright",
        }
    }

    /// Lighting is too low to work comfortably
    pub fn is_poor(&self) -> bool {
        matches!(self, Brightness::VeryDark | Brightness::Dark)
    }

    /// Short advisory used in summaries, empty when lighting is fine
    pub fn warning(&self) -> Option<String> {
        if self.is_poor() {
            Some(format!("Lighting {} - need more light.", self.label().to_lowercase()))
        } else if *self == Brightness::VeryBright {
            Some(format!("Lighting {} - too bright.", self.label().to_lowercase()))
        } else {
            None
        }
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
