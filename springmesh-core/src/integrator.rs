use crate::config::{ContactParams, PhysicsParams};
use crate::engine::World;

/// Advance the world by `dt`, split into `physics.substeps` equal substeps
pub fn advance(world: &mut World, physics: &PhysicsParams, contact: &ContactParams, dt: f32) {
    let substeps = physics.substeps.max(1);
    let h = dt / substeps as f32;
    for _ in 0..substeps {
        substep(world, physics, contact, h);
    }
}

/// One explicit substep of size `h`.
///
/// Order matters: forces are cleared, gravity/drag and spring forces
/// accumulate, slow contacts adjust the accumulated force, particles
/// integrate, and finally impacts correct velocity (and position for the
/// plane).
pub fn substep(world: &mut World, physics: &PhysicsParams, contact: &ContactParams, h: f32) {
    let obstacles = world.obstacles();

    for p in world.particles.iter_mut() {
        p.clear_force();
    }

    for p in world.particles.iter_mut() {
        let weight = p.mass * physics.gravity;
        let drag = -physics.drag * p.vel;
        p.add_force(weight);
        p.add_force(drag);
    }

    for spring in &world.springs {
        spring.apply(&mut world.particles, physics.spring_damping);
    }

    for p in world.particles.iter_mut() {
        for obstacle in &obstacles {
            p.resolve_contact(obstacle, h, contact);
        }
    }

    for p in world.particles.iter_mut() {
        p.step(h);
        for obstacle in &obstacles {
            p.resolve_collision(obstacle, contact);
        }
    }
}
