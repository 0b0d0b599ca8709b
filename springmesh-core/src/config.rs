//! Simulation configuration.
//!
//! Every field has a default, so a partial TOML document only needs to
//! name the values it overrides. The defaults reproduce the reference
//! cloth scene: a 20x20 sheet pinned at two corners, dropped onto a
//! sphere resting on the ground.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::obstacle::{Plane, Sphere};

/// Global forces and stepping parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Gravitational acceleration applied as `mass * gravity`.
    pub gravity: Vec3,
    /// Linear drag coefficient, force `-drag * velocity`.
    pub drag: f32,
    /// Damping coefficient along each spring's axis.
    pub spring_damping: f32,
    /// Fixed substeps run by one `advance` call.
    pub substeps: u32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -980.0, 0.0),
            drag: 0.05,
            spring_damping: 0.01,
            substeps: 100,
        }
    }
}

/// Friction, restitution and the thresholds separating slow contact from impact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactParams {
    /// Coulomb friction coefficient for sustained contact.
    pub friction: f32,
    /// Fraction of normal velocity kept (and reversed) on impact.
    pub restitution: f32,
    /// Distance above a plane still counted as touching it.
    pub contact_distance: f32,
    /// Normal speed below which a touching particle is in slow contact.
    pub slow_speed: f32,
    /// Slack added to the sphere radius for contact and collision tests.
    pub sphere_epsilon: f32,
    /// Plane penetration depth that triggers collision response.
    pub penetration: f32,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            friction: 10.0,
            restitution: 0.8,
            contact_distance: 0.001,
            slow_speed: 30.0,
            sphere_epsilon: 0.0001,
            penetration: 0.00001,
        }
    }
}

/// Layout and stiffness of the particle grid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cols: usize,
    pub rows: usize,
    /// Distance between neighbouring particles.
    pub spacing: f32,
    /// Position of particle (0, 0). Columns grow along +X, rows along -Y.
    pub origin: Vec3,
    /// Upper bound of the random out-of-plane (Z) offset.
    pub jitter: f32,
    /// Seed for the jitter generator.
    pub seed: u64,
    pub particle_mass: f32,
    pub structural_stiffness: f32,
    pub shear_stiffness: f32,
    pub bend_stiffness: f32,
    /// Add every shear diagonal a second time, doubling shear stiffness.
    pub duplicate_shear: bool,
    /// Particles pinned at initialization. Defaults to both ends of the first row.
    pub pinned: Option<Vec<usize>>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 20,
            spacing: 2.0,
            origin: Vec3::new(-2.0, 102.0, 0.0),
            jitter: 0.1,
            seed: 0,
            particle_mass: 0.01,
            structural_stiffness: 800.0,
            shear_stiffness: 200.0,
            bend_stiffness: 100.0,
            duplicate_shear: true,
            pinned: None,
        }
    }
}

impl GridConfig {
    pub fn particle_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Row-major index of the particle at (`col`, `row`)
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    pub fn pinned_indices(&self) -> Vec<usize> {
        match &self.pinned {
            Some(indices) => indices.clone(),
            None => vec![0, self.cols.saturating_sub(1)],
        }
    }
}

/// Complete configuration of a simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsParams,
    pub contact: ContactParams,
    pub grid: GridConfig,
    pub ground: Plane,
    pub sphere: Sphere,
}

impl SimulationConfig {
    /// Check the configuration for values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.cols < 2 || grid.rows < 2 {
            return Err(ConfigError::GridTooSmall {
                cols: grid.cols,
                rows: grid.rows,
            });
        }
        if !(grid.particle_mass.is_finite() && grid.particle_mass > 0.0) {
            return Err(ConfigError::InvalidMass(grid.particle_mass));
        }
        if !(grid.spacing.is_finite() && grid.spacing > 0.0) {
            return Err(ConfigError::InvalidSpacing(grid.spacing));
        }
        if self.physics.substeps == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        if self.ground.normal.length_squared() <= f32::EPSILON {
            return Err(ConfigError::DegeneratePlaneNormal);
        }
        if !(self.sphere.radius.is_finite() && self.sphere.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.sphere.radius));
        }

        let coefficients = [
            ("drag", self.physics.drag),
            ("spring_damping", self.physics.spring_damping),
            ("friction", self.contact.friction),
            ("restitution", self.contact.restitution),
            ("jitter", grid.jitter),
            ("structural_stiffness", grid.structural_stiffness),
            ("shear_stiffness", grid.shear_stiffness),
            ("bend_stiffness", grid.bend_stiffness),
        ];
        for (name, value) in coefficients {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeCoefficient { name, value });
            }
        }

        let count = grid.particle_count();
        for index in grid.pinned_indices() {
            if index >= count {
                return Err(ConfigError::PinnedOutOfBounds { index, count });
            }
        }

        Ok(())
    }
}
