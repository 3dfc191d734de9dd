//! Dialog input identifiers and values.

use super::CommandError;
use crate::params::FlowValveSpec;
use crate::units::{decimal, round_to, AngleUnit, UnitType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dialog field ids. Declaration order is the order inputs are applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputId {
    #[serde(rename = "theta")]
    Theta,
    #[serde(rename = "D")]
    MainDiameter,
    #[serde(rename = "L")]
    Length,
    #[serde(rename = "RH")]
    HoleRadius,
    #[serde(rename = "H")]
    HoleCount,
    #[serde(rename = "P")]
    TransducerDistance,
    #[serde(rename = "WT")]
    WallThickness,
}

impl InputId {
    pub const ALL: [InputId; 7] = [
        Self::Theta,
        Self::MainDiameter,
        Self::Length,
        Self::HoleRadius,
        Self::HoleCount,
        Self::TransducerDistance,
        Self::WallThickness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theta => "theta",
            Self::MainDiameter => "D",
            Self::Length => "L",
            Self::HoleRadius => "RH",
            Self::HoleCount => "H",
            Self::TransducerDistance => "P",
            Self::WallThickness => "WT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Theta => "Angle (θ)",
            Self::MainDiameter => "Main Pipe Outer Diameter (D)",
            Self::Length => "Length (L)",
            Self::HoleRadius => "Screw hole radius",
            Self::HoleCount => "Number of screw holes",
            Self::TransducerDistance => "Transducer distance (P)",
            Self::WallThickness => "Wall thickness (WT)",
        }
    }

    pub fn unit(&self) -> UnitType {
        match self {
            Self::Theta => UnitType::Angle,
            Self::HoleCount => UnitType::Count,
            _ => UnitType::Length,
        }
    }

    /// Computed displays the operator cannot edit.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::TransducerDistance | Self::WallThickness)
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InputId {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CommandError::UnknownInput(s.to_string()))
    }
}

/// A value read from one dialog field. Angles are in degrees, everything
/// else in the dialog's own unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DialogInput {
    pub id: InputId,
    pub value: f64,
}

impl DialogInput {
    pub fn new(id: InputId, value: f64) -> Self {
        Self { id, value }
    }

    pub fn parse(id: &str, value: f64) -> Result<Self, CommandError> {
        Ok(Self::new(id.parse()?, value))
    }
}

/// The two read-only displays, formatted the way the dialog shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readouts {
    #[serde(rename = "P")]
    pub transducer_distance: String,
    #[serde(rename = "WT")]
    pub wall_thickness: String,
}

impl Readouts {
    pub fn new(transducer_distance: f64, wall_thickness: f64) -> Self {
        let unit = UnitType::Length;
        Self {
            transducer_distance: format!("~ {} {}", decimal(round_to(transducer_distance, 2)), unit),
            wall_thickness: format!("~ {} {}", round_to(wall_thickness, 0), unit),
        }
    }
}

/// One row of the command dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogField {
    pub id: InputId,
    pub label: String,
    pub unit: UnitType,
    pub value: f64,
    pub read_only: bool,
}

/// Current dialog contents for a spec, editable fields first.
pub fn dialog_fields(spec: &FlowValveSpec) -> Vec<DialogField> {
    InputId::ALL
        .into_iter()
        .map(|id| {
            let value = match id {
                InputId::Theta => AngleUnit::Degrees.from_radians(spec.angle()),
                InputId::MainDiameter => spec.main_diameter(),
                InputId::Length => spec.length(),
                InputId::HoleRadius => spec.hole_radius(),
                InputId::HoleCount => spec.hole_count() as f64,
                InputId::TransducerDistance => spec.transducer_distance(),
                InputId::WallThickness => spec.wall_thickness(),
            };
            DialogField {
                id,
                label: id.label().to_string(),
                unit: id.unit(),
                value,
                read_only: id.is_read_only(),
            }
        })
        .collect()
}
