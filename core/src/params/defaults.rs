//! Default values for a new flow valve, loadable from JSON.

use super::ParameterResult;
use super::FlowValveSpec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOLE_COUNT: u32 = 6;
pub const DEFAULT_HOLE_RADIUS: f64 = 3.0;
pub const DEFAULT_ANGLE_DEGREES: f64 = 70.0;
pub const DEFAULT_MAIN_DIAMETER: f64 = 40.0;
pub const DEFAULT_LENGTH: f64 = 100.0;
/// The sensor pipe diameter has no dialog input.
pub const DEFAULT_SENSOR_PIPE_DIAMETER: f64 = 15.0;
/// Below this `|cos(π/2 − θ)|` the transducer distance is treated as undefined.
pub const DEFAULT_ANGLE_EPSILON: f64 = 1e-6;

/// Starting values for every [`FlowValveSpec`] created by a command session.
///
/// Missing fields in a config file fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowValveDefaults {
    /// Stored as a real number, the way the dialog reports it.
    pub hole_count: f64,
    pub hole_radius: f64,
    pub angle_degrees: f64,
    pub main_diameter: f64,
    pub length: f64,
    pub sensor_pipe_diameter: f64,
    pub angle_epsilon: f64,
}

impl Default for FlowValveDefaults {
    fn default() -> Self {
        Self {
            hole_count: DEFAULT_HOLE_COUNT as f64,
            hole_radius: DEFAULT_HOLE_RADIUS,
            angle_degrees: DEFAULT_ANGLE_DEGREES,
            main_diameter: DEFAULT_MAIN_DIAMETER,
            length: DEFAULT_LENGTH,
            sensor_pipe_diameter: DEFAULT_SENSOR_PIPE_DIAMETER,
            angle_epsilon: DEFAULT_ANGLE_EPSILON,
        }
    }
}

impl FlowValveDefaults {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build a spec from these values, validating each one through the
    /// regular setters.
    pub fn build(&self) -> ParameterResult<FlowValveSpec> {
        FlowValveSpec::from_defaults(self)
    }
}
