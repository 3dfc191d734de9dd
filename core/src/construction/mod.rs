//! Construction plan and the seam to the CAD kernel.
//!
//! The plan lists the valve's components in build order. A
//! [`ConstructionService`] turns each step into sketches, extrudes, patterns
//! and revolves in whatever host it wraps; this crate never talks to a kernel
//! itself.

mod recorder;

pub use recorder::RecordingService;

use crate::geometry::{
    Ball, Boss, CircularCut, Extent, Flange, GeometryParameters, HandleProfile, MainPipe,
    PipeSection, Plane, Point3, SensorPipe,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("Kernel rejected the operation: {0}")]
    Rejected(String),

    #[error("Step {index} ({step}) failed: {reason}")]
    StepFailed {
        index: usize,
        step: String,
        reason: String,
    },
}

pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// One component of the assembly, with everything needed to build it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ConstructionStep {
    SensorPipe(SensorPipe),
    Flange(Flange),
    MainPipeClearing(CircularCut),
    MainPipe(MainPipe),
    SensorBore(CircularCut),
    ValvePipe(PipeSection),
    ValveHousing(PipeSection),
    Ball(Ball),
    LeverBase {
        plane: Plane,
        center: Point3,
        stem: Boss,
        pin: Boss,
    },
    LeverHandle {
        plane: Plane,
        profile: HandleProfile,
        extent: Extent,
    },
}

impl ConstructionStep {
    pub fn label(&self) -> &str {
        match self {
            Self::SensorPipe(_) => "sensor pipe",
            Self::Flange(flange) => &flange.label,
            Self::MainPipeClearing(_) => "main pipe clearing",
            Self::MainPipe(_) => "main pipe",
            Self::SensorBore(_) => "sensor bore",
            Self::ValvePipe(_) => "valve pipe",
            Self::ValveHousing(_) => "valve housing",
            Self::Ball(_) => "ball",
            Self::LeverBase { .. } => "lever base",
            Self::LeverHandle { .. } => "lever handle",
        }
    }
}

/// Executes construction steps against a host kernel.
pub trait ConstructionService {
    fn apply(&mut self, step: &ConstructionStep) -> ConstructionResult<()>;
}

/// Ordered list of components to build into one new component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionPlan {
    pub component_name: String,
    pub steps: Vec<ConstructionStep>,
}

impl ConstructionPlan {
    pub fn from_parameters(params: &GeometryParameters) -> Self {
        let [sensor_top, sensor_bottom] = params.sensor_flanges.clone();
        let [main_right, main_left] = params.main_flanges.clone();
        let valve = &params.ball_valve;
        let lever = &params.lever;

        let steps = vec![
            ConstructionStep::SensorPipe(params.sensor_pipe.clone()),
            ConstructionStep::Flange(sensor_top),
            ConstructionStep::Flange(sensor_bottom),
            ConstructionStep::MainPipeClearing(params.main_clearing.clone()),
            ConstructionStep::MainPipe(params.main_pipe.clone()),
            ConstructionStep::SensorBore(params.sensor_bore.clone()),
            ConstructionStep::Flange(main_right),
            ConstructionStep::Flange(main_left),
            ConstructionStep::Flange(valve.lower_flange.clone()),
            ConstructionStep::ValvePipe(valve.pipe.clone()),
            ConstructionStep::ValveHousing(valve.housing.clone()),
            ConstructionStep::Ball(valve.ball.clone()),
            ConstructionStep::Flange(valve.upper_flange.clone()),
            ConstructionStep::LeverBase {
                plane: lever.base_plane,
                center: lever.base_center,
                stem: lever.stem,
                pin: lever.pin,
            },
            ConstructionStep::LeverHandle {
                plane: lever.handle_plane,
                profile: lever.handle.clone(),
                extent: lever.handle_extent,
            },
        ];
        Self {
            component_name: params.component_name.clone(),
            steps,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(ConstructionStep::label).collect()
    }

    /// Apply every step in order, stopping at the first failure.
    /// Returns the number of steps applied.
    pub fn execute<S>(&self, service: &mut S) -> ConstructionResult<usize>
    where
        S: ConstructionService + ?Sized,
    {
        info!(
            "Building {} with {} steps",
            self.component_name,
            self.steps.len()
        );
        for (index, step) in self.steps.iter().enumerate() {
            debug!("Applying step {}: {}", index, step.label());
            if let Err(e) = service.apply(step) {
                warn!("Construction stopped at step {} ({}): {}", index, step.label(), e);
                return Err(ConstructionError::StepFailed {
                    index,
                    step: step.label().to_string(),
                    reason: e.to_string(),
                });
            }
        }
        Ok(self.steps.len())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
