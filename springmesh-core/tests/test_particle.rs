//! Unit tests for particle integration, contact and collision

use glam::Vec3;
use springmesh_core::tests::test_helpers::{approx_eq_f32, approx_eq_vec3};
use springmesh_core::{ContactParams, Obstacle, Particle, Plane, Sphere};

const SUBSTEP: f32 = 1.0 / 6000.0;

fn ground() -> Obstacle {
    Obstacle::Plane(Plane::default())
}

#[test]
fn test_step_updates_velocity_before_position() {
    let mut p = Particle::new(Vec3::ZERO, 2.0);
    p.add_force(Vec3::new(4.0, 0.0, 0.0));
    p.step(0.5);

    // v = 0 + (4 / 2) * 0.5 = 1, then x = 0 + 1 * 0.5
    assert!(approx_eq_vec3(p.vel, Vec3::new(1.0, 0.0, 0.0), 1e-6));
    assert!(approx_eq_vec3(p.pos, Vec3::new(0.5, 0.0, 0.0), 1e-6));
}

#[test]
fn test_forces_accumulate_until_cleared() {
    let mut p = Particle::new(Vec3::ZERO, 1.0);
    p.add_force(Vec3::new(1.0, 2.0, 3.0));
    p.add_force(Vec3::new(-1.0, 1.0, 0.0));
    assert_eq!(p.force, Vec3::new(0.0, 3.0, 3.0));

    p.clear_force();
    assert_eq!(p.force, Vec3::ZERO);
}

#[test]
fn test_fixed_particle_accumulates_but_does_not_move() {
    let start = Vec3::new(1.0, 2.0, 3.0);
    let mut p = Particle::new(start, 1.0)
        .with_velocity(Vec3::new(5.0, 0.0, 0.0))
        .pinned();
    p.add_force(Vec3::new(0.0, -100.0, 0.0));
    assert_eq!(p.force, Vec3::new(0.0, -100.0, 0.0));

    p.step(0.1);
    assert_eq!(p.pos, start);
    assert_eq!(p.vel, Vec3::ZERO);
}

#[test]
fn test_toggle_fixed_releases_pin() {
    let mut p = Particle::new(Vec3::ZERO, 1.0).pinned();
    p.toggle_fixed();
    assert!(!p.fixed);
    p.add_force(Vec3::new(0.0, -1.0, 0.0));
    p.step(1.0);
    assert!(p.pos.y < 0.0);
}

#[test]
fn test_plane_contact_requires_touching_and_slow() {
    let params = ContactParams::default();
    let plane = Plane::default();

    let resting = Particle::new(Vec3::new(0.0, 0.0005, 0.0), 0.01)
        .with_velocity(Vec3::new(1.0, -2.0, 0.0));
    assert!(resting.is_contacting_plane(&plane, &params));

    let above = Particle::new(Vec3::new(0.0, 0.01, 0.0), 0.01);
    assert!(!above.is_contacting_plane(&plane, &params));

    let impact = Particle::new(Vec3::ZERO, 0.01).with_velocity(Vec3::new(0.0, -100.0, 0.0));
    assert!(!impact.is_contacting_plane(&plane, &params));
}

#[test]
fn test_sphere_contact_requires_surface_and_slow() {
    let params = ContactParams::default();
    let sphere = Sphere::new(Vec3::ZERO, 2.0);

    let on_surface = Particle::new(Vec3::new(0.0, 2.00005, 0.0), 0.01)
        .with_velocity(Vec3::new(3.0, -1.0, 0.0));
    assert!(on_surface.is_contacting_sphere(&sphere, &params));

    let outside = Particle::new(Vec3::new(0.0, 2.5, 0.0), 0.01);
    assert!(!outside.is_contacting_sphere(&sphere, &params));

    let fast = Particle::new(Vec3::new(0.0, 1.9, 0.0), 0.01)
        .with_velocity(Vec3::new(0.0, -50.0, 0.0));
    assert!(!fast.is_contacting_sphere(&sphere, &params));
}

#[test]
fn test_contact_cancels_normal_force() {
    let params = ContactParams::default();
    let mut p = Particle::new(Vec3::ZERO, 0.01);
    p.add_force(Vec3::new(0.0, -9.8, 0.0));

    p.resolve_contact(&ground(), SUBSTEP, &params);

    // No tangential motion, so no friction; only the normal force is removed
    assert!(approx_eq_vec3(p.force, Vec3::ZERO, 1e-6));
}

#[test]
fn test_kinetic_friction_opposes_sliding() {
    let params = ContactParams::default();
    let mut p = Particle::new(Vec3::ZERO, 0.01).with_velocity(Vec3::new(5.0, 0.0, 0.0));
    p.add_force(Vec3::new(0.0, -9.8, 0.0));

    p.resolve_contact(&ground(), SUBSTEP, &params);

    // |f_friction| = mu * |f_n| = 10 * 9.8
    assert!(approx_eq_f32(p.force.x, -98.0, 1e-3));
    assert!(approx_eq_f32(p.force.y, 0.0, 1e-6));

    let friction = p.force.x.abs();
    assert!(friction * SUBSTEP / p.mass <= 5.0);
}

#[test]
fn test_friction_clamp_stops_without_reversal() {
    let params = ContactParams::default();
    let mut p = Particle::new(Vec3::ZERO, 0.01).with_velocity(Vec3::new(0.5, 0.0, 0.0));
    p.add_force(Vec3::new(0.0, -9.8, 0.0));

    p.resolve_contact(&ground(), SUBSTEP, &params);
    let friction = p.force.x.abs();
    assert!(friction * SUBSTEP / p.mass <= 0.5 + 1e-5);

    p.step(SUBSTEP);
    assert!(p.vel.x.abs() < 1e-4, "sliding should lock, got {}", p.vel.x);
    assert!(p.vel.x > -1e-4, "friction must not reverse the motion");
    assert!(approx_eq_f32(p.pos.y, 0.0, 1e-6));
}

#[test]
fn test_contact_is_noop_without_contact() {
    let params = ContactParams::default();
    let mut p = Particle::new(Vec3::new(0.0, 5.0, 0.0), 0.01).with_velocity(Vec3::X);
    p.add_force(Vec3::new(0.0, -9.8, 0.0));

    p.resolve_contact(&ground(), SUBSTEP, &params);
    assert_eq!(p.force, Vec3::new(0.0, -9.8, 0.0));
}

#[test]
fn test_plane_collision_reflects_and_snaps() {
    let params = ContactParams::default();
    let mut p = Particle::new(Vec3::new(1.0, -0.5, 2.0), 0.01)
        .with_velocity(Vec3::new(3.0, -10.0, 0.0));

    p.resolve_collision(&ground(), &params);

    assert!(approx_eq_vec3(p.vel, Vec3::new(3.0, 8.0, 0.0), 1e-5));
    assert_eq!(p.pos, Vec3::new(1.0, 0.0, 2.0));
}

#[test]
fn test_plane_collision_ignores_separating_motion() {
    let params = ContactParams::default();
    let mut p = Particle::new(Vec3::new(0.0, -0.5, 0.0), 0.01)
        .with_velocity(Vec3::new(0.0, 5.0, 0.0));

    p.resolve_collision(&ground(), &params);

    assert_eq!(p.vel, Vec3::new(0.0, 5.0, 0.0));
    assert_eq!(p.pos, Vec3::new(0.0, -0.5, 0.0));
}

#[test]
fn test_sphere_collision_damps_velocity_only() {
    let params = ContactParams::default();
    let sphere = Obstacle::Sphere(Sphere::new(Vec3::ZERO, 2.0));
    let mut p = Particle::new(Vec3::new(0.0, 1.9, 0.0), 0.01)
        .with_velocity(Vec3::new(1.0, -10.0, 0.0));

    p.resolve_collision(&sphere, &params);

    assert!(approx_eq_vec3(p.vel, Vec3::new(1.0, 8.0, 0.0), 1e-5));
    // penetration is left in place
    assert_eq!(p.pos, Vec3::new(0.0, 1.9, 0.0));
}

#[test]
fn test_sphere_collision_at_center_is_harmless() {
    let params = ContactParams::default();
    let sphere = Obstacle::Sphere(Sphere::new(Vec3::ZERO, 2.0));
    let mut p = Particle::new(Vec3::ZERO, 0.01).with_velocity(Vec3::new(1.0, 0.0, 0.0));

    p.resolve_contact(&sphere, SUBSTEP, &params);
    p.resolve_collision(&sphere, &params);

    assert!(p.vel.is_finite());
    assert!(p.force.is_finite());
}

#[test]
fn test_sphere_friction_opposes_sliding_on_top() {
    let params = ContactParams::default();
    let sphere = Obstacle::Sphere(Sphere::new(Vec3::ZERO, 2.0));
    let mut p = Particle::new(Vec3::new(0.0, 2.0, 0.0), 0.01)
        .with_velocity(Vec3::new(5.0, 0.0, 0.0));
    p.add_force(Vec3::new(0.0, -9.8, 0.0));

    p.resolve_contact(&sphere, SUBSTEP, &params);

    // force into the sphere is cancelled, friction is mu * |f_n|
    assert!(approx_eq_vec3(p.force, Vec3::new(-98.0, 0.0, 0.0), 1e-3));
    assert!(p.force.length() * SUBSTEP / p.mass <= 5.0);
}

#[test]
fn test_sphere_friction_follows_local_normal() {
    let params = ContactParams::default();
    let sphere = Obstacle::Sphere(Sphere::new(Vec3::ZERO, 2.0));
    let mut p = Particle::new(Vec3::new(2.0, 0.0, 0.0), 0.01)
        .with_velocity(Vec3::new(0.0, 0.0, 5.0));
    p.add_force(Vec3::new(-9.8, 0.0, 0.0));

    p.resolve_contact(&sphere, SUBSTEP, &params);

    assert!(approx_eq_vec3(p.force, Vec3::new(0.0, 0.0, -98.0), 1e-3));
}

#[test]
fn test_sphere_friction_clamp_stops_without_reversal() {
    let params = ContactParams::default();
    let sphere = Obstacle::Sphere(Sphere::new(Vec3::ZERO, 2.0));
    let mut p = Particle::new(Vec3::new(0.0, 2.0, 0.0), 0.01)
        .with_velocity(Vec3::new(0.5, 0.0, 0.0));
    p.add_force(Vec3::new(0.0, -9.8, 0.0));

    p.resolve_contact(&sphere, SUBSTEP, &params);
    assert!(approx_eq_f32(p.force.y, 0.0, 1e-6));
    assert!(p.force.x.abs() * SUBSTEP / p.mass <= 0.5 + 1e-5);

    p.step(SUBSTEP);
    assert!(p.vel.x.abs() < 1e-4, "sliding should lock, got {}", p.vel.x);
    assert!(p.vel.x > -1e-4, "friction must not reverse the motion");
}
