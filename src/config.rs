//! Render options, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::device::Color;
use crate::error::ConfigError;

/// Smallest interline a staff size class may derive.
pub const MIN_INTERLINE: i32 = 2;

/// A rational scale factor, applied as `value * num / den`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub num: i32,
    pub den: i32,
}

impl Ratio {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    pub const ONE: Ratio = Ratio::new(1, 1);

    pub fn apply(self, value: i32) -> i32 {
        value * self.num / self.den
    }

    fn validate(self, name: &'static str) -> Result<(), ConfigError> {
        if self.den == 0 || self.num <= 0 || self.den < 0 {
            return Err(ConfigError::InvalidRatio {
                name,
                num: self.num,
                den: self.den,
            });
        }
        Ok(())
    }
}

/// Highlight colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub normal: Color,
    /// Element currently selected for editing
    pub selected: Color,
    /// First apparatus reading
    pub first_reading: Color,
    /// Every other apparatus reading
    pub other_reading: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            normal: Color::BLACK,
            selected: Color::RED,
            first_reading: Color::GREEN,
            other_reading: Color::BLUE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Distance between two staff lines on a normal staff, in logical units
    pub interline: i32,
    /// Scale of a small staff relative to a normal one
    pub small_staff_ratio: Ratio,
    /// Scale of cue-sized notes
    pub grace_ratio: Ratio,
    pub stem_width: i32,
    pub staff_line_width: i32,
    /// Logical to device scale
    pub zoom: Ratio,
    /// Page height in logical units, used to flip the y axis
    pub page_height: i32,
    pub colors: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            interline: 20,
            small_staff_ratio: Ratio::new(16, 20),
            grace_ratio: Ratio::new(3, 4),
            stem_width: 2,
            staff_line_width: 2,
            zoom: Ratio::ONE,
            page_height: 2970,
            colors: Palette::default(),
        }
    }
}

impl RenderOptions {
    /// Parse options from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<RenderOptions, ConfigError> {
        let options: RenderOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.small_staff_ratio.validate("small_staff_ratio")?;
        self.grace_ratio.validate("grace_ratio")?;
        self.zoom.validate("zoom")?;
        // Every size class needs a non-zero half interline
        let sizes = [
            ("normal", self.interline),
            ("small", self.small_staff_ratio.apply(self.interline)),
        ];
        for (size, interline) in sizes {
            if interline < MIN_INTERLINE {
                return Err(ConfigError::InvalidInterline { size, interline });
            }
        }
        Ok(())
    }
}
