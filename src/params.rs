//! Tunable galaxy parameters and the ranges the debug panel enforces.
//!
//! [`GalaxyParams`] is a plain value passed into the generator and owned by
//! the debug panel. Every numeric field has a [`ParamRange`]; all setters go
//! through [`ParamRange::snap`], so a `GalaxyParams` built through this API
//! never holds an out-of-range value.
//!
//! ```
//! use galaxy::{GalaxyParams, ParamField};
//!
//! let params = GalaxyParams::default()
//!     .with_count(1234)          // snapped to the 100-step
//!     .with_branch_count(1);     // clamped to the 2-branch minimum
//!
//! assert_eq!(params.count, 1200);
//! assert_eq!(params.branch_count, 2);
//! assert!(ParamField::Count.range().is_some());
//! ```

use crate::color::Rgb;

/// `[min, max, step]` bounds of a numeric control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Round `value` to the nearest step counted from `min`, then clamp.
    ///
    /// Non-finite input falls back to `min`.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let steps = ((value - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // Trim accumulated binary noise such as 0.30000000000000004.
        let snapped = (snapped * 1e12).round() / 1e12;
        snapped.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Identifies one entry of the parameter store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamField {
    Count,
    Size,
    Radius,
    BranchCount,
    BranchSpin,
    BranchRandomness,
    BranchRandomnessPower,
    InsideColor,
    OutsideColor,
}

impl ParamField {
    /// Every field, in panel order.
    pub const ALL: [ParamField; 9] = [
        ParamField::Count,
        ParamField::Size,
        ParamField::Radius,
        ParamField::BranchCount,
        ParamField::BranchSpin,
        ParamField::BranchRandomness,
        ParamField::BranchRandomnessPower,
        ParamField::InsideColor,
        ParamField::OutsideColor,
    ];

    /// Label shown next to the control.
    pub fn label(self) -> &'static str {
        match self {
            ParamField::Count => "systemCount",
            ParamField::Size => "systemSize",
            ParamField::Radius => "galaxyRadius",
            ParamField::BranchCount => "galaxyBranchCount",
            ParamField::BranchSpin => "galaxyBranchSpin",
            ParamField::BranchRandomness => "galaxyBranchRandomness",
            ParamField::BranchRandomnessPower => "galaxyBranchRandomnessPower",
            ParamField::InsideColor => "galaxyInsideColor",
            ParamField::OutsideColor => "galaxyOutsideColor",
        }
    }

    /// Declared range for numeric fields, `None` for colors.
    pub fn range(self) -> Option<ParamRange> {
        let range = match self {
            ParamField::Count => ParamRange::new(100.0, 1_000_000.0, 100.0),
            ParamField::Size => ParamRange::new(0.001, 0.1, 0.001),
            ParamField::Radius => ParamRange::new(0.01, 20.0, 0.01),
            ParamField::BranchCount => ParamRange::new(2.0, 20.0, 1.0),
            ParamField::BranchSpin => ParamRange::new(-5.0, 5.0, 0.001),
            ParamField::BranchRandomness => ParamRange::new(0.0, 2.0, 0.001),
            ParamField::BranchRandomnessPower => ParamRange::new(1.0, 10.0, 1.0),
            ParamField::InsideColor | ParamField::OutsideColor => return None,
        };
        Some(range)
    }

    pub fn is_color(self) -> bool {
        matches!(self, ParamField::InsideColor | ParamField::OutsideColor)
    }

    /// Whether the control only takes whole numbers.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ParamField::Count | ParamField::BranchCount | ParamField::BranchRandomnessPower
        )
    }
}

/// The full set of galaxy generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyParams {
    /// Number of particles.
    pub count: u32,
    /// Point size in world units (attenuated by distance).
    pub size: f32,
    /// Outer radius of the disc.
    pub radius: f32,
    /// Number of spiral arms.
    pub branch_count: u32,
    /// Extra angle per unit of radius, producing the spiral twist.
    pub branch_spin: f32,
    /// Maximum per-axis scatter around the arm.
    pub branch_randomness: f32,
    /// Exponent concentrating the scatter near the arm. Higher is tighter.
    pub branch_randomness_power: u32,
    /// Color at the center.
    pub inside_color: Rgb,
    /// Color at the rim.
    pub outside_color: Rgb,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 10.0,
            branch_count: 3,
            branch_spin: 0.5,
            branch_randomness: 1.0,
            branch_randomness_power: 3,
            inside_color: Rgb::from_hex(0xdb3f0f),
            outside_color: Rgb::from_hex(0x8aa8f4),
        }
    }
}

impl GalaxyParams {
    /// Read a numeric field. Returns `None` for color fields.
    pub fn numeric(&self, field: ParamField) -> Option<f64> {
        let value = match field {
            ParamField::Count => self.count as f64,
            ParamField::Size => self.size as f64,
            ParamField::Radius => self.radius as f64,
            ParamField::BranchCount => self.branch_count as f64,
            ParamField::BranchSpin => self.branch_spin as f64,
            ParamField::BranchRandomness => self.branch_randomness as f64,
            ParamField::BranchRandomnessPower => self.branch_randomness_power as f64,
            ParamField::InsideColor | ParamField::OutsideColor => return None,
        };
        Some(value)
    }

    /// Write a numeric field through its range.
    ///
    /// Returns the stored (snapped) value, or `None` if `field` is a color.
    pub fn set_numeric(&mut self, field: ParamField, value: f64) -> Option<f64> {
        let v = field.range()?.snap(value);
        match field {
            ParamField::Count => self.count = v as u32,
            ParamField::Size => self.size = v as f32,
            ParamField::Radius => self.radius = v as f32,
            ParamField::BranchCount => self.branch_count = v as u32,
            ParamField::BranchSpin => self.branch_spin = v as f32,
            ParamField::BranchRandomness => self.branch_randomness = v as f32,
            ParamField::BranchRandomnessPower => self.branch_randomness_power = v as u32,
            ParamField::InsideColor | ParamField::OutsideColor => unreachable!(),
        }
        Some(v)
    }

    pub fn color(&self, field: ParamField) -> Option<Rgb> {
        match field {
            ParamField::InsideColor => Some(self.inside_color),
            ParamField::OutsideColor => Some(self.outside_color),
            _ => None,
        }
    }

    /// Write a color field, clamping channels to `[0, 1]`.
    /// Returns `false` if `field` is not a color.
    pub fn set_color(&mut self, field: ParamField, color: Rgb) -> bool {
        let color = Rgb::new(
            color.r.clamp(0.0, 1.0),
            color.g.clamp(0.0, 1.0),
            color.b.clamp(0.0, 1.0),
        );
        match field {
            ParamField::InsideColor => self.inside_color = color,
            ParamField::OutsideColor => self.outside_color = color,
            _ => return false,
        }
        true
    }

    /// Copy one field's value from `other`.
    pub fn copy_field(&mut self, field: ParamField, other: &GalaxyParams) {
        if let Some(c) = other.color(field) {
            self.set_color(field, c);
        } else if let Some(v) = other.numeric(field) {
            self.set_numeric(field, v);
        }
    }

    /// Re-snap every field into its declared range.
    pub fn validated(mut self) -> Self {
        for field in ParamField::ALL {
            if let Some(c) = self.color(field) {
                self.set_color(field, c);
            } else if let Some(v) = self.numeric(field) {
                self.set_numeric(field, v);
            }
        }
        self
    }

    /// Whether every numeric field sits inside its range.
    pub fn is_valid(&self) -> bool {
        ParamField::ALL.iter().all(|&f| match (f.range(), self.numeric(f)) {
            (Some(range), Some(v)) => range.contains(v),
            _ => true,
        })
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.set_numeric(ParamField::Count, count as f64);
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.set_numeric(ParamField::Size, size as f64);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.set_numeric(ParamField::Radius, radius as f64);
        self
    }

    pub fn with_branch_count(mut self, branches: u32) -> Self {
        self.set_numeric(ParamField::BranchCount, branches as f64);
        self
    }

    pub fn with_branch_spin(mut self, spin: f32) -> Self {
        self.set_numeric(ParamField::BranchSpin, spin as f64);
        self
    }

    pub fn with_branch_randomness(mut self, randomness: f32) -> Self {
        self.set_numeric(ParamField::BranchRandomness, randomness as f64);
        self
    }

    pub fn with_branch_randomness_power(mut self, power: u32) -> Self {
        self.set_numeric(ParamField::BranchRandomnessPower, power as f64);
        self
    }

    pub fn with_colors(mut self, inside: Rgb, outside: Rgb) -> Self {
        self.set_color(ParamField::InsideColor, inside);
        self.set_color(ParamField::OutsideColor, outside);
        self
    }
}
