use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Dimension of a dialog value. Lengths stay in the dialog's own unit and are
/// never converted; only angles change representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitType {
    Length,
    Angle,
    Count,
}

impl UnitType {
    /// Label the dialog prints next to values of this dimension.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Length => "cm",
            Self::Angle => "deg",
            Self::Count => "pcs",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert value to radians (the model's angle unit)
    pub fn to_radians(&self, value: f64) -> f64 {
        match self {
            Self::Degrees => value * PI / 180.0,
            Self::Radians => value,
        }
    }

    pub fn from_radians(&self, radians: f64) -> f64 {
        match self {
            Self::Degrees => radians * 180.0 / PI,
            Self::Radians => radians,
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrees => write!(f, "deg"),
            Self::Radians => write!(f, "rad"),
        }
    }
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Decimal text that keeps a trailing `.0` on whole values, so `40.0` prints
/// as `40.0` rather than `40`.
pub fn decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Round half away from zero to a fixed number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
