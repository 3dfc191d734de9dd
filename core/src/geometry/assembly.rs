//! The full flow-valve parameter bundle and its derivation from a spec.
//!
//! Naming: `d` is the sensor pipe diameter, `D` the main pipe diameter, `P`
//! the transducer distance and `WT` the main pipe wall thickness. Every
//! sensor-side offset is measured along the sensor axis from the sensor
//! sketch plane, starting at `P/2`.

use super::{Annulus, BoltPattern, Extent, FeatureOperation, Lever, Plane, Point3, Vector3};
use crate::params::FlowValveSpec;
use crate::units::{decimal, round_to, AngleUnit, UnitType};
use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Sensor pipe reach past `P/2`, each side.
pub const SENSOR_PIPE_OVERHANG: f64 = 70.0;
/// The sensor bore is cut well past both pipe ends.
pub const SENSOR_BORE_OVERHANG: f64 = 3.0 * SENSOR_PIPE_OVERHANG;
pub const SENSOR_FLANGE_HALF_THICKNESS: f64 = 1.0;
/// Bolt circle radius of sensor-side flanges is `d − inset`.
pub const SENSOR_BOLT_INSET: f64 = 5.0;
pub const SENSOR_BOLT_RADIUS: f64 = 2.0;
/// Bolt cuts and main flanges are this fraction of the pipe diameter deep.
pub const FLANGE_DEPTH_RATIO: f64 = 0.2;

pub const VALVE_LOWER_FLANGE_OFFSET: f64 = 71.0;
pub const VALVE_LOWER_FLANGE_THICKNESS: f64 = 2.0;
pub const VALVE_PIPE_OFFSET: f64 = 72.0;
pub const VALVE_PIPE_LENGTH: f64 = 30.0;
pub const VALVE_HOUSING_OFFSET: f64 = 87.0;
pub const VALVE_HOUSING_RIM: f64 = 6.0;
pub const VALVE_HOUSING_HALF_DEPTH: f64 = 7.5;
pub const VALVE_UPPER_FLANGE_OFFSET: f64 = 102.0;

/// The XY plane rotated `angle` radians about the model X axis.
pub fn angled_plane(angle: f64) -> Plane {
    let rotation = na::Rotation3::from_axis_angle(&Vector3::x_axis(), angle);
    Plane::new(Point3::origin(), rotation * Vector3::z())
}

/// Angled pipe carrying the two flow transducers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorPipe {
    /// Radians from the XY plane about the X axis.
    pub plane_angle: f64,
    pub plane: Plane,
    pub ring: Annulus,
    pub extent: Extent,
}

impl SensorPipe {
    pub fn axis(&self) -> Vector3 {
        self.plane.normal
    }
}

/// Bolted flange ring at one end of a pipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flange {
    pub label: String,
    /// Sketch plane of the flange ring.
    pub plane: Plane,
    /// Signed distance of `plane` from the reference plane it was offset from.
    pub offset: f64,
    pub ring: Annulus,
    pub extent: Extent,
    pub bolts: BoltPattern,
}

/// Main pipe ring, joined onto the sensor pipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainPipe {
    pub plane: Plane,
    pub ring: Annulus,
    pub extent: Extent,
    pub operation: FeatureOperation,
}

/// Full circular profile removed from whatever bodies it passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularCut {
    pub plane: Plane,
    pub radius: f64,
    pub extent: Extent,
    pub operation: FeatureOperation,
}

impl CircularCut {
    fn through(plane: Plane, radius: f64, extent: Extent) -> Self {
        Self {
            plane,
            radius,
            extent,
            operation: FeatureOperation::Cut,
        }
    }
}

/// A straight pipe section placed along the sensor axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSection {
    pub plane: Plane,
    pub offset: f64,
    pub ring: Annulus,
    pub extent: Extent,
    pub operation: FeatureOperation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub plane: Plane,
    pub offset: f64,
    pub radius: f64,
    /// Radians revolved around the in-plane diameter.
    pub revolve_angle: f64,
    pub bore_radius: f64,
    pub bore: Extent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallValve {
    pub lower_flange: Flange,
    pub pipe: PipeSection,
    pub housing: PipeSection,
    pub ball: Ball,
    pub upper_flange: Flange,
}

/// Every numeric value the construction service needs, frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryParameters {
    /// Name for the new component, e.g. `Flow-valve (D40.0cm θ70.0deg)`.
    pub component_name: String,
    pub angle: f64,
    pub main_diameter: f64,
    pub length: f64,
    pub hole_radius: f64,
    pub hole_count: u32,
    pub transducer_distance: f64,
    pub wall_thickness: f64,
    pub sensor_pipe_diameter: f64,

    pub sensor_pipe: SensorPipe,
    /// Top flange first, then bottom.
    pub sensor_flanges: [Flange; 2],
    /// Clears the sensor pipe out of the main pipe's cross-section. Must run
    /// before `main_pipe` is joined.
    pub main_clearing: CircularCut,
    pub main_pipe: MainPipe,
    /// Opens the transducer path through the sensor pipe and the main pipe
    /// wall. Must run after `main_pipe` is joined.
    pub sensor_bore: CircularCut,
    /// Right (+Z) flange first, then left.
    pub main_flanges: [Flange; 2],
    pub ball_valve: BallValve,
    pub lever: Lever,
}

/// Flange on the sensor axis. Sensor-side flanges share their ring and bolt
/// layout; only thickness and offset differ.
fn sensor_flange(
    label: &str,
    sensor_plane: &Plane,
    offset: f64,
    d: f64,
    hole_count: u32,
    extent: Extent,
    cut: Extent,
) -> Flange {
    Flange {
        label: label.to_string(),
        plane: sensor_plane.offset(offset),
        offset,
        ring: Annulus::new(d - d / 10.0, d / 2.0 - d / 10.0),
        extent,
        bolts: BoltPattern::full_circle(d - SENSOR_BOLT_INSET, SENSOR_BOLT_RADIUS, cut, hole_count),
    }
}

/// `Flow-valve (D{D}cm θ{θ}deg)`, with whole values printed as `40.0`.
fn component_name(main_diameter: f64, angle: f64) -> String {
    let degrees = round_to(AngleUnit::Degrees.from_radians(angle), 4);
    format!(
        "Flow-valve (D{}{} θ{}{})",
        decimal(main_diameter),
        UnitType::Length,
        decimal(degrees),
        AngleUnit::Degrees
    )
}

fn main_flange(label: &str, offset: f64, spec: &FlowValveSpec, direction: f64) -> Flange {
    let d = spec.main_diameter();
    let depth = FLANGE_DEPTH_RATIO * d;
    Flange {
        label: label.to_string(),
        plane: Plane::xy().offset(offset),
        offset,
        ring: Annulus::new(d, d / 2.0 - spec.wall_thickness()),
        extent: Extent::OneSided(direction * depth),
        bolts: BoltPattern::full_circle(
            d - d / 5.0,
            spec.hole_radius(),
            Extent::Symmetric(depth),
            spec.hole_count(),
        ),
    }
}

impl GeometryParameters {
    /// Derive the bundle. Only called on a validated spec.
    pub(crate) fn from_spec(spec: &FlowValveSpec) -> Self {
        let d = spec.sensor_pipe_diameter();
        let big_d = spec.main_diameter();
        let half_p = spec.transducer_distance() / 2.0;
        let holes = spec.hole_count();
        let sensor_depth = FLANGE_DEPTH_RATIO * d;

        let sensor_plane = angled_plane(spec.angle());
        let pipe_end = half_p + SENSOR_PIPE_OVERHANG;

        let sensor_pipe = SensorPipe {
            plane_angle: spec.angle(),
            plane: sensor_plane,
            ring: Annulus::new(d / 2.0, d / 2.0 - d / 10.0),
            extent: Extent::Symmetric(pipe_end),
        };

        let flange_half = Extent::Symmetric(SENSOR_FLANGE_HALF_THICKNESS);
        let sensor_cut = Extent::Symmetric(sensor_depth);
        let sensor_flanges = [
            sensor_flange("sensor top", &sensor_plane, pipe_end, d, holes, flange_half, sensor_cut),
            sensor_flange("sensor bottom", &sensor_plane, -pipe_end, d, holes, flange_half, sensor_cut),
        ];

        let half_l = spec.length() / 2.0;
        let main_clearing = CircularCut::through(Plane::xy(), big_d / 2.0, Extent::Symmetric(half_l));
        let main_pipe = MainPipe {
            plane: Plane::xy(),
            ring: Annulus::new(big_d / 2.0, big_d / 2.0 - spec.wall_thickness()),
            extent: Extent::Symmetric(half_l),
            operation: FeatureOperation::Join,
        };
        let sensor_bore = CircularCut::through(
            sensor_plane,
            sensor_pipe.ring.inner_radius,
            Extent::Symmetric(half_p + SENSOR_BORE_OVERHANG),
        );

        let main_flanges = [
            main_flange("main right", half_l, spec, 1.0),
            main_flange("main left", -half_l, spec, -1.0),
        ];

        let along_sensor = |offset: f64| sensor_plane.offset(half_p + offset);
        let ball_valve = BallValve {
            lower_flange: sensor_flange(
                "valve lower",
                &sensor_plane,
                half_p + VALVE_LOWER_FLANGE_OFFSET,
                d,
                holes,
                Extent::OneSided(VALVE_LOWER_FLANGE_THICKNESS),
                Extent::OneSided(sensor_depth),
            ),
            pipe: PipeSection {
                plane: along_sensor(VALVE_PIPE_OFFSET),
                offset: half_p + VALVE_PIPE_OFFSET,
                ring: Annulus::new(d / 2.0, d / 2.0 - d / 10.0),
                extent: Extent::OneSided(VALVE_PIPE_LENGTH),
                operation: FeatureOperation::NewBody,
            },
            housing: PipeSection {
                plane: along_sensor(VALVE_HOUSING_OFFSET),
                offset: half_p + VALVE_HOUSING_OFFSET,
                ring: Annulus::new(d / 2.0 + VALVE_HOUSING_RIM, d / 2.0),
                extent: Extent::Symmetric(VALVE_HOUSING_HALF_DEPTH),
                operation: FeatureOperation::Join,
            },
            ball: Ball {
                plane: along_sensor(VALVE_HOUSING_OFFSET),
                offset: half_p + VALVE_HOUSING_OFFSET,
                radius: d / 2.0 - d / 10.0,
                revolve_angle: TAU,
                bore_radius: d / 2.0 - d / 4.0,
                bore: Extent::Symmetric(d / 2.0),
            },
            upper_flange: sensor_flange(
                "valve upper",
                &sensor_plane,
                half_p + VALVE_UPPER_FLANGE_OFFSET,
                d,
                holes,
                flange_half,
                sensor_cut,
            ),
        };

        Self {
            component_name: component_name(big_d, spec.angle()),
            angle: spec.angle(),
            main_diameter: big_d,
            length: spec.length(),
            hole_radius: spec.hole_radius(),
            hole_count: holes,
            transducer_distance: spec.transducer_distance(),
            wall_thickness: spec.wall_thickness(),
            sensor_pipe_diameter: d,
            sensor_pipe,
            sensor_flanges,
            main_clearing,
            main_pipe,
            sensor_bore,
            main_flanges,
            ball_valve,
            lever: Lever::for_angle(spec.angle()),
        }
    }

    /// Every radius, depth and extent in the bundle, labelled. Offsets are
    /// signed positions and are not included.
    pub fn lengths(&self) -> Vec<(String, f64)> {
        let mut out = vec![
            ("main diameter".to_string(), self.main_diameter),
            ("length".to_string(), self.length),
            ("hole radius".to_string(), self.hole_radius),
            ("transducer distance".to_string(), self.transducer_distance),
            ("wall thickness".to_string(), self.wall_thickness),
        ];
        let mut ring = |name: &str, ring: &Annulus| {
            out.push((format!("{} outer radius", name), ring.outer_radius));
            out.push((format!("{} inner radius", name), ring.inner_radius));
            out.push((format!("{} wall", name), ring.wall()));
        };
        ring("sensor pipe", &self.sensor_pipe.ring);
        ring("main pipe", &self.main_pipe.ring);
        ring("valve pipe", &self.ball_valve.pipe.ring);
        ring("valve housing", &self.ball_valve.housing.ring);
        for flange in self.flanges() {
            ring(&flange.label, &flange.ring);
        }

        out.push(("sensor pipe extent".to_string(), self.sensor_pipe.extent.distance()));
        out.push(("sensor bore radius".to_string(), self.sensor_bore.radius));
        out.push(("sensor bore extent".to_string(), self.sensor_bore.extent.distance()));
        out.push(("main clearing radius".to_string(), self.main_clearing.radius));
        out.push(("main clearing extent".to_string(), self.main_clearing.extent.distance()));
        out.push(("main pipe extent".to_string(), self.main_pipe.extent.distance()));
        out.push(("valve pipe extent".to_string(), self.ball_valve.pipe.extent.distance()));
        out.push(("housing extent".to_string(), self.ball_valve.housing.extent.distance()));
        out.push(("ball radius".to_string(), self.ball_valve.ball.radius));
        out.push(("ball bore radius".to_string(), self.ball_valve.ball.bore_radius));
        out.push(("ball bore extent".to_string(), self.ball_valve.ball.bore.distance()));
        for flange in self.flanges() {
            out.push((format!("{} thickness", flange.label), flange.extent.distance()));
            out.push((format!("{} bolt circle", flange.label), flange.bolts.circle_radius));
            out.push((format!("{} bolt radius", flange.label), flange.bolts.hole_radius));
            out.push((format!("{} bolt depth", flange.label), flange.bolts.cut.distance()));
        }
        out
    }

    /// All six bolted flanges in construction order.
    pub fn flanges(&self) -> impl Iterator<Item = &Flange> {
        self.sensor_flanges
            .iter()
            .chain(self.main_flanges.iter())
            .chain([&self.ball_valve.lower_flange, &self.ball_valve.upper_flange])
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
