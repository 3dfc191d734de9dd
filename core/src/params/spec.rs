use super::defaults::*;
use super::{FlowValveDefaults, ParameterError, ParameterField, ParameterResult};
use crate::geometry::{GeometryParameters, SENSOR_BOLT_INSET};
use crate::units::normalize_angle;
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, info, warn};

/// Editable parameter set of one flow valve.
///
/// Fields are private so the derived values can never go stale; every write
/// goes through a validating setter. Handing the spec to construction with
/// [`FlowValveSpec::into_construction_parameters`] consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowValveSpec {
    hole_count: u32,
    hole_radius: f64,
    /// Radians, normalised to `[0, 2π)`.
    angle: f64,
    main_diameter: f64,
    length: f64,
    sensor_pipe_diameter: f64,
    angle_epsilon: f64,
    transducer_distance: f64,
    wall_thickness: f64,
}

impl Default for FlowValveSpec {
    fn default() -> Self {
        let angle = DEFAULT_ANGLE_DEGREES.to_radians();
        Self {
            hole_count: DEFAULT_HOLE_COUNT,
            hole_radius: DEFAULT_HOLE_RADIUS,
            angle,
            main_diameter: DEFAULT_MAIN_DIAMETER,
            length: DEFAULT_LENGTH,
            sensor_pipe_diameter: DEFAULT_SENSOR_PIPE_DIAMETER,
            angle_epsilon: DEFAULT_ANGLE_EPSILON,
            transducer_distance: DEFAULT_MAIN_DIAMETER / (FRAC_PI_2 - angle).cos(),
            wall_thickness: wall_thickness(DEFAULT_MAIN_DIAMETER),
        }
    }
}

/// `D / cos(π/2 − θ)`, rejected when the cosine is within `epsilon` of zero
/// or negative. Angles in (π, 2π) would place the transducers a negative
/// distance apart.
fn transducer_distance(main_diameter: f64, angle: f64, epsilon: f64) -> ParameterResult<f64> {
    let projection = (FRAC_PI_2 - angle).cos();
    if projection <= epsilon {
        return Err(ParameterError::DegenerateAngle { angle });
    }
    Ok(main_diameter / projection)
}

/// `D/2 − (D/2 − D/10)` reduces to `D/10` for every diameter.
// TODO: confirm with the valve designers whether the wall thickness was meant to depend on θ.
fn wall_thickness(main_diameter: f64) -> f64 {
    main_diameter / 10.0
}

fn require_positive(field: ParameterField, value: f64) -> ParameterResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        warn!("Rejected {} = {}", field, value);
        Err(ParameterError::InvalidDimension { field, value })
    }
}

impl FlowValveSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec from configured defaults.
    ///
    /// Values are applied in dialog order (angle, diameter, length, hole
    /// radius, hole count) through the public setters, so a bad config fails
    /// with the same error a bad dialog input would.
    pub fn from_defaults(defaults: &FlowValveDefaults) -> ParameterResult<Self> {
        let mut spec = Self::default();
        spec.set_sensor_pipe_diameter(defaults.sensor_pipe_diameter)?;
        spec.set_angle_epsilon(defaults.angle_epsilon)?;
        spec.set_angle(defaults.angle_degrees.to_radians())?;
        spec.set_main_diameter(defaults.main_diameter)?;
        spec.set_length(defaults.length)?;
        spec.set_hole_radius(defaults.hole_radius)?;
        spec.set_hole_count(defaults.hole_count)?;
        Ok(spec)
    }

    // === Setters ===

    /// Set the sensor/main pipe angle in radians. Any real input is taken
    /// modulo 2π; only angles strictly inside (0, π) give a usable
    /// transducer distance.
    pub fn set_angle(&mut self, radians: f64) -> ParameterResult<()> {
        if !radians.is_finite() {
            warn!("Rejected non-finite angle {}", radians);
            return Err(ParameterError::DegenerateAngle { angle: radians });
        }
        let angle = normalize_angle(radians);
        let distance = transducer_distance(self.main_diameter, angle, self.angle_epsilon)
            .inspect_err(|_| warn!("Rejected degenerate angle {:.4} deg", angle.to_degrees()))?;

        self.angle = angle;
        self.transducer_distance = distance;
        debug!(angle_deg = angle.to_degrees(), p = distance, "Recomputed transducer distance");
        Ok(())
    }

    pub fn set_main_diameter(&mut self, value: f64) -> ParameterResult<()> {
        let diameter = require_positive(ParameterField::MainDiameter, value)?;
        let distance = transducer_distance(diameter, self.angle, self.angle_epsilon)?;

        self.main_diameter = diameter;
        self.transducer_distance = distance;
        self.wall_thickness = wall_thickness(diameter);
        debug!(d = diameter, p = distance, wt = self.wall_thickness, "Recomputed derived values");
        Ok(())
    }

    pub fn set_length(&mut self, value: f64) -> ParameterResult<()> {
        self.length = require_positive(ParameterField::Length, value)?;
        Ok(())
    }

    pub fn set_hole_radius(&mut self, value: f64) -> ParameterResult<()> {
        self.hole_radius = require_positive(ParameterField::HoleRadius, value)?;
        Ok(())
    }

    /// The dialog reports the count as a real number; only whole values of
    /// at least one are accepted.
    pub fn set_hole_count(&mut self, value: f64) -> ParameterResult<()> {
        let whole = value.is_finite() && value.fract() == 0.0;
        if !whole || value < 1.0 || value > u32::MAX as f64 {
            warn!("Rejected hole count {}", value);
            return Err(ParameterError::InvalidDimension {
                field: ParameterField::HoleCount,
                value,
            });
        }
        self.hole_count = value as u32;
        Ok(())
    }

    fn set_sensor_pipe_diameter(&mut self, value: f64) -> ParameterResult<()> {
        let field = ParameterField::SensorPipeDiameter;
        let diameter = require_positive(field, value)?;
        // The sensor flange bolt circle sits at d − inset
        if diameter <= SENSOR_BOLT_INSET {
            return Err(ParameterError::InvalidDimension { field, value });
        }
        self.sensor_pipe_diameter = diameter;
        Ok(())
    }

    fn set_angle_epsilon(&mut self, value: f64) -> ParameterResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(ParameterError::InvalidDimension {
                field: ParameterField::AngleEpsilon,
                value,
            });
        }
        self.angle_epsilon = value;
        Ok(())
    }

    // === Readers ===

    pub fn hole_count(&self) -> u32 {
        self.hole_count
    }

    pub fn hole_radius(&self) -> f64 {
        self.hole_radius
    }

    /// Angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }

    pub fn main_diameter(&self) -> f64 {
        self.main_diameter
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn sensor_pipe_diameter(&self) -> f64 {
        self.sensor_pipe_diameter
    }

    /// Distance between the two sensor transducers (P).
    pub fn transducer_distance(&self) -> f64 {
        self.transducer_distance
    }

    /// Main pipe wall thickness (WT).
    pub fn wall_thickness(&self) -> f64 {
        self.wall_thickness
    }

    // === Hand-off ===

    /// Check every field against the constraints the construction relies on.
    ///
    /// The setters already enforce these individually; the freeze checks
    /// them again before anything reaches construction.
    pub fn validate(&self) -> ParameterResult<()> {
        require_positive(ParameterField::MainDiameter, self.main_diameter)?;
        require_positive(ParameterField::Length, self.length)?;
        require_positive(ParameterField::HoleRadius, self.hole_radius)?;
        if self.hole_count == 0 {
            return Err(ParameterError::InvalidDimension {
                field: ParameterField::HoleCount,
                value: 0.0,
            });
        }
        if !self.transducer_distance.is_finite() || self.transducer_distance <= 0.0 {
            warn!(
                "Angle {:.4} deg yields transducer distance {}",
                self.angle.to_degrees(),
                self.transducer_distance
            );
            return Err(ParameterError::DegenerateAngle { angle: self.angle });
        }
        Ok(())
    }

    /// Freeze the spec and produce every value the construction service needs.
    pub fn into_construction_parameters(self) -> ParameterResult<GeometryParameters> {
        self.validate()?;
        info!(
            "Freezing flow valve: D={} L={} theta={:.2}deg H={} RH={} P={:.3} WT={}",
            self.main_diameter,
            self.length,
            self.angle_degrees(),
            self.hole_count,
            self.hole_radius,
            self.transducer_distance,
            self.wall_thickness
        );
        Ok(GeometryParameters::from_spec(&self))
    }
}
