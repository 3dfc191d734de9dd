//! Flow-valve parameter model.
//!
//! Holds the five dialog-editable inputs and the two quantities derived from
//! them:
//! - transducer distance `P = D / cos(π/2 − θ)`
//! - main pipe wall thickness `WT = D / 10`
//!
//! Derived values are recomputed eagerly on every accepted write. A rejected
//! write leaves the spec untouched.

pub mod defaults;
pub mod spec;


pub use defaults::FlowValveDefaults;
pub use spec::FlowValveSpec;

use std::fmt;
use thiserror::Error;

/// The individually validated fields of a [`FlowValveSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    HoleCount,
    HoleRadius,
    Angle,
    MainDiameter,
    Length,
    SensorPipeDiameter,
    AngleEpsilon,
}

impl ParameterField {
    fn requirement(&self) -> &'static str {
        match self {
            Self::HoleCount => "must be a whole number of at least 1",
            Self::SensorPipeDiameter => "must exceed the flange bolt inset",
            Self::AngleEpsilon => "must be finite and non-negative",
            _ => "must be finite and greater than zero",
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HoleCount => "hole count",
            Self::HoleRadius => "hole radius",
            Self::Angle => "angle",
            Self::MainDiameter => "main diameter",
            Self::Length => "length",
            Self::SensorPipeDiameter => "sensor pipe diameter",
            Self::AngleEpsilon => "angle epsilon",
        };
        write!(f, "{}", name)
    }
}

/// Validation failures raised at the setter boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Degenerate angle {:.4} deg: transducer distance must be finite and positive", .angle.to_degrees())]
    DegenerateAngle { angle: f64 },

    #[error("Invalid {field} {value}: {}", .field.requirement())]
    InvalidDimension { field: ParameterField, value: f64 },
}

pub type ParameterResult<T> = Result<T, ParameterError>;
