//! Ball-valve lever: a two-step base on a tilted plane plus a flat handle.
//!
//! Only the base plane follows the sensor angle; the handle outline is a
//! fixed shape drawn on the model YZ plane.

use super::{angled_plane, Extent, FeatureOperation, Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

pub const LEVER_BASE_CENTER: [f64; 3] = [-1.218, 108.25, -14.0];
pub const STEM_RADIUS: f64 = 2.5;
pub const STEM_HALF_DEPTH: f64 = 2.0;
pub const PIN_RADIUS: f64 = 1.0;
pub const PIN_HALF_DEPTH: f64 = 3.5;
pub const HANDLE_HALF_THICKNESS: f64 = 2.0;

/// Handle centre line, (z, y) on the YZ plane.
const HANDLE_INNER: [[f64; 2]; 4] = [
    [-53.5, -100.0],
    [-50.0, -90.35],
    [-51.282, -87.512],
    [-46.0, -73.0],
];
const HANDLE_OUTER: [[f64; 2]; 4] = [
    [-46.7808, -72.806],
    [-52.137, -87.523],
    [-50.851, -90.37],
    [-54.264, -99.727],
];
const HANDLE_TIP_CENTER: [f64; 2] = [-46.3904, -72.903];
const HANDLE_ROOT_CENTER: [f64; 2] = [-53.882, -99.8635];

/// One edge of a sketch profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProfileSegment {
    Line { start: [f64; 2], end: [f64; 2] },
    /// Arc from `start` swept `sweep` radians counter-clockwise about `center`.
    Arc { center: [f64; 2], start: [f64; 2], sweep: f64 },
}

impl ProfileSegment {
    pub fn start(&self) -> [f64; 2] {
        match self {
            Self::Line { start, .. } | Self::Arc { start, .. } => *start,
        }
    }

    pub fn end(&self) -> [f64; 2] {
        match *self {
            Self::Line { end, .. } => end,
            Self::Arc { center, start, sweep } => {
                let (dx, dy) = (start[0] - center[0], start[1] - center[1]);
                let (s, c) = sweep.sin_cos();
                [center[0] + dx * c - dy * s, center[1] + dx * s + dy * c]
            }
        }
    }
}

/// Closed outline of the lever handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleProfile {
    pub segments: Vec<ProfileSegment>,
}

impl HandleProfile {
    pub fn standard() -> Self {
        let polyline = |pts: &[[f64; 2]; 4]| {
            pts.windows(2)
                .map(|w| ProfileSegment::Line { start: w[0], end: w[1] })
                .collect::<Vec<_>>()
        };

        let mut segments = polyline(&HANDLE_INNER);
        segments.push(ProfileSegment::Arc {
            center: HANDLE_TIP_CENTER,
            start: HANDLE_INNER[3],
            sweep: PI,
        });
        segments.extend(polyline(&HANDLE_OUTER));
        segments.push(ProfileSegment::Arc {
            center: HANDLE_ROOT_CENTER,
            start: HANDLE_INNER[0],
            sweep: -PI,
        });
        Self { segments }
    }

    /// True when every segment endpoint meets exactly one other endpoint.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        let ends: Vec<[f64; 2]> = self
            .segments
            .iter()
            .flat_map(|s| [s.start(), s.end()])
            .collect();
        ends.iter().all(|p| {
            let matches = ends
                .iter()
                .filter(|q| (p[0] - q[0]).hypot(p[1] - q[1]) <= tolerance)
                .count();
            // the point itself plus its partner
            matches == 2
        })
    }
}

/// A circular boss joined onto an existing body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub radius: f64,
    pub extent: Extent,
    pub operation: FeatureOperation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lever {
    /// Radians from the XY plane about the X axis.
    pub base_plane_angle: f64,
    pub base_plane: Plane,
    pub base_center: Point3,
    pub stem: Boss,
    pub pin: Boss,
    pub handle_plane: Plane,
    pub handle: HandleProfile,
    pub handle_extent: Extent,
}

impl Lever {
    /// Lever for a sensor pipe tilted `angle` radians; the base plane stands
    /// a quarter turn past the sensor plane.
    pub fn for_angle(angle: f64) -> Self {
        let base_plane_angle = angle + FRAC_PI_2;
        let [x, y, z] = LEVER_BASE_CENTER;
        Self {
            base_plane_angle,
            base_plane: angled_plane(base_plane_angle),
            base_center: Point3::new(x, y, z),
            stem: Boss {
                radius: STEM_RADIUS,
                extent: Extent::Symmetric(STEM_HALF_DEPTH),
                operation: FeatureOperation::Join,
            },
            pin: Boss {
                radius: PIN_RADIUS,
                extent: Extent::Symmetric(PIN_HALF_DEPTH),
                operation: FeatureOperation::Join,
            },
            handle_plane: Plane::new(Point3::origin(), Vector3::x()),
            handle: HandleProfile::standard(),
            handle_extent: Extent::Symmetric(HANDLE_HALF_THICKNESS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ApproxEq;

    #[test]
    fn test_arc_end_point() {
        let arc = ProfileSegment::Arc {
            center: [0.0, 0.0],
            start: [1.0, 0.0],
            sweep: FRAC_PI_2,
        };
        let end = arc.end();
        assert!(end[0].approx_eq(&0.0));
        assert!(end[1].approx_eq(&1.0));
    }

    #[test]
    fn test_standard_handle_is_closed() {
        let handle = HandleProfile::standard();
        assert_eq!(handle.segments.len(), 8);
        assert!(handle.is_closed(1e-3));
    }

    #[test]
    fn test_open_profile_detected() {
        let mut handle = HandleProfile::standard();
        handle.segments.pop();
        assert!(!handle.is_closed(1e-3));
    }

    #[test]
    fn test_lever_base_plane_follows_angle() {
        let lever = Lever::for_angle(0.0);
        assert!(lever.base_plane_angle.approx_eq(&FRAC_PI_2));
        // XY rotated a quarter turn about X stands upright facing -Y
        assert!(lever.base_plane.normal.approx_eq(&Vector3::new(0.0, -1.0, 0.0)));
        assert_eq!(lever.stem.operation, FeatureOperation::Join);
        assert!(lever.pin.radius < lever.stem.radius);
    }
}
