use glam::Vec3;

use crate::config::ContactParams;
use crate::obstacle::{Obstacle, Plane, Sphere};

/// Stiffness used when a spring is built without one
pub const DEFAULT_STIFFNESS: f32 = 800.0;

/// A point mass in the mesh
#[derive(Debug, Clone)]
pub struct Particle {
    pub mass: f32,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Forces accumulated during the current substep
    pub force: Vec3,
    /// Pinned particles keep accumulating forces but never move.
    pub fixed: bool,
}

impl Particle {
    pub fn new(pos: Vec3, mass: f32) -> Self {
        Self {
            mass,
            pos,
            vel: Vec3::ZERO,
            force: Vec3::ZERO,
            fixed: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.vel = vel;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn toggle_fixed(&mut self) {
        self.fixed = !self.fixed;
    }

    pub fn clear_force(&mut self) {
        self.force = Vec3::ZERO;
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Semi-implicit Euler: velocity from force first, then position from the new velocity.
    pub fn step(&mut self, dt: f32) {
        if self.fixed {
            self.vel = Vec3::ZERO;
            return;
        }
        self.vel += self.force / self.mass * dt;
        self.pos += self.vel * dt;
    }

    pub fn momentum(&self) -> Vec3 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Resting or sliding on the plane: touching it and moving slowly along its normal.
    pub fn is_contacting_plane(&self, plane: &Plane, params: &ContactParams) -> bool {
        plane.signed_distance(self.pos) < params.contact_distance
            && self.vel.dot(plane.normal).abs() < params.slow_speed
    }

    /// Resting or sliding on the sphere surface at low normal speed.
    pub fn is_contacting_sphere(&self, sphere: &Sphere, params: &ContactParams) -> bool {
        sphere.contains(self.pos, params.sphere_epsilon)
            && self.vel.dot(sphere.outward_normal(self.pos)).abs() < params.slow_speed
    }

    pub fn is_contacting(&self, obstacle: &Obstacle, params: &ContactParams) -> bool {
        match obstacle {
            Obstacle::Plane(plane) => self.is_contacting_plane(plane, params),
            Obstacle::Sphere(sphere) => self.is_contacting_sphere(sphere, params),
        }
    }

    /// Friction and normal-force cancellation for sustained contact.
    ///
    /// Friction opposes the tangential velocity with magnitude `friction * |f_n|`,
    /// clamped so that it can at most bring the tangential velocity to rest
    /// within `dt`. The normal component of the accumulated force is then
    /// removed. Does nothing unless the particle is in slow contact.
    pub fn resolve_contact(&mut self, obstacle: &Obstacle, dt: f32, params: &ContactParams) {
        if !self.is_contacting(obstacle, params) {
            return;
        }
        let n = obstacle.normal_at(self.pos);
        let f_n = self.force.dot(n) * n;
        let v_n = self.vel.dot(n) * n;
        let v_t = self.vel - v_n;

        let mut friction = -params.friction * f_n.length() * v_t.normalize_or_zero();
        if friction.length() * dt > v_t.length() * self.mass {
            // static lock
            friction = -v_t / dt * self.mass;
        }
        self.add_force(friction);
        self.add_force(-f_n);
    }

    /// Impact response after integration.
    ///
    /// Plane impacts reflect and damp the normal velocity and snap the
    /// particle back onto the surface. Sphere impacts only adjust velocity
    /// and leave any penetration in place.
    pub fn resolve_collision(&mut self, obstacle: &Obstacle, params: &ContactParams) {
        match obstacle {
            Obstacle::Plane(plane) => self.resolve_plane_collision(plane, params),
            Obstacle::Sphere(sphere) => self.resolve_sphere_collision(sphere, params),
        }
    }

    fn resolve_plane_collision(&mut self, plane: &Plane, params: &ContactParams) {
        if plane.signed_distance(self.pos) < params.penetration && self.vel.dot(plane.normal) < 0.0 {
            self.reflect_normal_velocity(plane.normal, params.restitution);
            self.pos = plane.project(self.pos);
        }
    }

    fn resolve_sphere_collision(&mut self, sphere: &Sphere, params: &ContactParams) {
        if sphere.contains(self.pos, params.sphere_epsilon)
            && self.vel.dot(self.pos - sphere.center) < 0.0
        {
            self.reflect_normal_velocity(sphere.outward_normal(self.pos), params.restitution);
        }
    }

    fn reflect_normal_velocity(&mut self, n: Vec3, restitution: f32) {
        let v_n = self.vel.dot(n) * n;
        let v_t = self.vel - v_n;
        self.vel = v_t - restitution * v_n;
    }
}

/// Which link family of the cloth topology a spring belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpringKind {
    Structural,
    Shear,
    Bend,
}

/// A damped spring between two particles of the same world, addressed by index
#[derive(Debug, Clone)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    pub stiffness: f32,
    pub kind: SpringKind,
    rest_length: f32,
}

impl Spring {
    /// Link particles `a` and `b`, taking their current separation as the rest length.
    pub fn new(particles: &[Particle], a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b, "a spring needs two distinct particles");
        Self {
            a,
            b,
            stiffness: DEFAULT_STIFFNESS,
            kind: SpringKind::Structural,
            rest_length: particles[a].pos.distance(particles[b].pos),
        }
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_kind(mut self, kind: SpringKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Force this spring exerts on particle `b`. Particle `a` receives the negation.
    ///
    /// Zero when the endpoints coincide, since the spring axis is undefined there.
    pub fn force_on_b(&self, particles: &[Particle], damping: f32) -> Vec3 {
        let p1 = &particles[self.a];
        let p2 = &particles[self.b];
        let delta = p2.pos - p1.pos;
        let length = delta.length();
        if length <= f32::EPSILON {
            return Vec3::ZERO;
        }
        let dir = delta / length;
        let stretch = self.stiffness * (length - self.rest_length);
        let damping = damping * (p2.vel - p1.vel).dot(dir);
        -(stretch + damping) * dir
    }

    pub fn apply(&self, particles: &mut [Particle], damping: f32) {
        let f = self.force_on_b(particles, damping);
        particles[self.a].add_force(-f);
        particles[self.b].add_force(f);
    }
}

/// The particles, springs and obstacles stepped by the integrator
#[derive(Debug, Clone)]
pub struct World {
    pub particles: Vec<Particle>,
    pub springs: Vec<Spring>,
    pub ground: Plane,
    pub sphere: Sphere,
}

impl World {
    pub fn new(ground: Plane, sphere: Sphere) -> Self {
        Self {
            particles: Vec::new(),
            springs: Vec::new(),
            ground: Plane::new(ground.point, ground.normal),
            sphere,
        }
    }

    pub fn add_particle(&mut self, particle: Particle) -> usize {
        let idx = self.particles.len();
        self.particles.push(particle);
        idx
    }

    /// Connect two existing particles; rest length is their current separation.
    pub fn add_spring(&mut self, a: usize, b: usize, stiffness: f32) -> usize {
        let idx = self.springs.len();
        self.springs
            .push(Spring::new(&self.particles, a, b).with_stiffness(stiffness));
        idx
    }

    pub fn obstacles(&self) -> [Obstacle; 2] {
        [Obstacle::Plane(self.ground), Obstacle::Sphere(self.sphere)]
    }

    pub fn total_momentum(&self) -> Vec3 {
        self.particles.iter().map(Particle::momentum).sum()
    }

    pub fn is_finite(&self) -> bool {
        self.particles
            .iter()
            .all(|p| p.pos.is_finite() && p.vel.is_finite())
    }
}
