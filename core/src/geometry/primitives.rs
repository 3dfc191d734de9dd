use super::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// A sketch plane placed in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    /// The model XY plane through the origin.
    pub fn xy() -> Self {
        Self::new(Point3::origin(), Vector3::z())
    }

    /// Parallel plane shifted `distance` along the normal.
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.normal * distance,
            normal: self.normal,
        }
    }

    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(&self.normal)
    }
}

/// Ring profile between two concentric circles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annulus {
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl Annulus {
    pub fn new(outer_radius: f64, inner_radius: f64) -> Self {
        Self {
            outer_radius,
            inner_radius,
        }
    }

    pub fn wall(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }
}

/// How far an extrude or cut reaches from its sketch plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    /// Equal distance on both sides of the plane.
    Symmetric(f64),
    /// One side only; a negative distance runs against the plane normal.
    OneSided(f64),
}

impl Extent {
    /// Unsigned reach on the longer side.
    pub fn distance(&self) -> f64 {
        match self {
            Self::Symmetric(d) | Self::OneSided(d) => d.abs(),
        }
    }
}

/// What a feature does to the bodies it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FeatureOperation {
    #[default]
    NewBody,
    Join,
    Cut,
}

/// Bolt holes cut through a flange and repeated around its axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoltPattern {
    /// Distance from the flange axis to each hole centre.
    pub circle_radius: f64,
    pub hole_radius: f64,
    pub cut: Extent,
    pub count: u32,
    /// Radians swept by the pattern.
    pub total_angle: f64,
}

impl BoltPattern {
    pub fn full_circle(circle_radius: f64, hole_radius: f64, cut: Extent, count: u32) -> Self {
        Self {
            circle_radius,
            hole_radius,
            cut,
            count,
            total_angle: TAU,
        }
    }

    /// Hole centres in sketch coordinates. The seed hole sits on the +Y axis
    /// and the rest follow at equal angular steps.
    pub fn hole_centers(&self) -> Vec<[f64; 2]> {
        if self.count == 0 {
            return Vec::new();
        }
        let step = self.total_angle / self.count as f64;
        (0..self.count)
            .map(|i| {
                let a = step * i as f64;
                [-self.circle_radius * a.sin(), self.circle_radius * a.cos()]
            })
            .collect()
    }
}
