//! Static obstacle geometry: the ground plane and the sphere the mesh drapes over.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An infinite plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Build a plane, normalizing the given normal.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Signed distance from `p` to the plane along the normal (positive above).
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    /// Closest point on the plane to `p`.
    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.signed_distance(p) * self.normal
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y)
    }
}

/// A solid sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Distance from `p` to the surface (negative inside).
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        p.distance(self.center) - self.radius
    }

    /// Outward unit normal at `p`. Zero when `p` is the centre.
    pub fn outward_normal(&self, p: Vec3) -> Vec3 {
        (p - self.center).normalize_or_zero()
    }

    /// True when `p` is inside the sphere or within `epsilon` of its surface.
    pub fn contains(&self, p: Vec3, epsilon: f32) -> bool {
        self.center.distance(p) < self.radius + epsilon
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 30.0, -5.0), 30.0)
    }
}

/// One of the two static obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Plane(Plane),
    Sphere(Sphere),
}

impl Obstacle {
    /// Surface normal facing away from the obstacle at `p`
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        match self {
            Obstacle::Plane(plane) => plane.normal,
            Obstacle::Sphere(sphere) => sphere.outward_normal(p),
        }
    }
}
