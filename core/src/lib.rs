//! Parametric model of a flow-valve assembly.
//!
//! Five dialog parameters (sensor angle, main pipe diameter, length, bolt
//! hole radius and count) drive every dimension of the assembly: main pipe,
//! angled sensor pipe, bolted flanges, a ball valve and its lever. The crate
//! derives those dimensions and hands them to a construction service; it
//! does not model solids itself.

pub mod command;
pub mod construction;
pub mod geometry;
pub mod params;
pub mod units;

pub use command::{CommandError, CommandSession, DialogInput, InputId, Readouts};
pub use construction::{ConstructionPlan, ConstructionService, ConstructionStep, RecordingService};
pub use geometry::GeometryParameters;
pub use params::{FlowValveDefaults, FlowValveSpec, ParameterError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
