use glam::Vec3;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::engine::{Particle, Spring, World};
use crate::error::SimulationError;
use crate::integrator;
use crate::obstacle::{Plane, Sphere};
use crate::topology::{build_particles, build_springs, TopologyCounts};

/// Summary of the mesh state, read between `advance` calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    pub centroid: Vec3,
    /// Lowest signed distance of any particle above the ground plane
    pub min_height: f32,
    pub max_speed: f32,
    pub kinetic_energy: f32,
    pub momentum: Vec3,
}

/// A cloth simulation: the mesh, its obstacles and the fixed-substep loop.
///
/// The host calls [`Simulation::advance`] once per frame and reads particle
/// and spring state only between calls.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    frame_count: u64,
    elapsed: f32,
    diverged: bool,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let world = World::new(config.ground, config.sphere);
        let mut sim = Self {
            config,
            world,
            frame_count: 0,
            elapsed: 0.0,
            diverged: false,
        };
        sim.initialize();
        Ok(sim)
    }

    /// Rebuild the particle grid and its springs, and pin the configured particles.
    pub fn initialize(&mut self) {
        let grid = &self.config.grid;
        let mut particles = build_particles(grid);
        let springs = build_springs(&particles, grid);
        for index in grid.pinned_indices() {
            particles[index].fixed = true;
        }

        let counts = TopologyCounts::of(&springs);
        debug!(
            particles = particles.len(),
            structural = counts.structural,
            shear = counts.shear,
            bend = counts.bend,
            "mesh initialized"
        );

        self.world.particles = particles;
        self.world.springs = springs;
        self.frame_count = 0;
        self.elapsed = 0.0;
        self.diverged = false;
    }

    /// Advance the simulation by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        integrator::advance(&mut self.world, &self.config.physics, &self.config.contact, dt);
        self.frame_count += 1;
        self.elapsed += dt;

        if !self.diverged && !self.world.is_finite() {
            self.diverged = true;
            warn!(frame = self.frame_count, "particle state became non-finite");
        }
    }

    /// Flip the pinned state of a particle and return the new state.
    pub fn toggle_pin(&mut self, index: usize) -> Result<bool, SimulationError> {
        let count = self.world.particles.len();
        let particle = self
            .world
            .particles
            .get_mut(index)
            .ok_or(SimulationError::ParticleOutOfBounds { index, count })?;
        particle.toggle_fixed();
        info!(index, fixed = particle.fixed, "pin toggled");
        Ok(particle.fixed)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.world.particles
    }

    pub fn springs(&self) -> &[Spring] {
        &self.world.springs
    }

    /// Endpoint positions of every spring
    pub fn spring_segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let particles = &self.world.particles;
        self.world
            .springs
            .iter()
            .map(move |s| (particles[s.a].pos, particles[s.b].pos))
    }

    pub fn ground(&self) -> &Plane {
        &self.world.ground
    }

    pub fn sphere(&self) -> &Sphere {
        &self.world.sphere
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Simulated seconds since the last initialize
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finite(&self) -> bool {
        self.world.is_finite()
    }

    pub fn stats(&self) -> MeshStats {
        let particles = &self.world.particles;
        let count = particles.len().max(1) as f32;
        let centroid = particles.iter().map(|p| p.pos).sum::<Vec3>() / count;
        let min_height = particles
            .iter()
            .map(|p| self.world.ground.signed_distance(p.pos))
            .fold(f32::INFINITY, f32::min);
        let max_speed = particles
            .iter()
            .map(|p| p.vel.length())
            .fold(0.0, f32::max);
        let kinetic_energy = particles.iter().map(Particle::kinetic_energy).sum();

        MeshStats {
            centroid,
            min_height,
            max_speed,
            kinetic_energy,
            momentum: self.world.total_momentum(),
        }
    }
}
