//! Cloth grid construction: particle layout and the spring families linking it.
//!
//! Particle (`col`, `row`) has index `row * cols + col`. Springs are emitted in
//! a fixed order: horizontal and vertical structural links, both cell
//! diagonals as shear links (twice over when `duplicate_shear` is set), then
//! skip-one horizontal and vertical bend links.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GridConfig;
use crate::engine::{Particle, Spring, SpringKind};

/// Lay the particles out on the grid with a seeded random Z offset each.
pub fn build_particles(grid: &GridConfig) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(grid.seed);
    let mut particles = Vec::with_capacity(grid.particle_count());
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let jitter = if grid.jitter > 0.0 {
                rng.gen_range(0.0..grid.jitter)
            } else {
                0.0
            };
            let pos = grid.origin
                + Vec3::new(
                    col as f32 * grid.spacing,
                    -(row as f32) * grid.spacing,
                    jitter,
                );
            particles.push(Particle::new(pos, grid.particle_mass));
        }
    }
    particles
}

/// Build the structural, shear and bend springs over `particles`.
pub fn build_springs(particles: &[Particle], grid: &GridConfig) -> Vec<Spring> {
    let (cols, rows) = (grid.cols, grid.rows);
    let mut springs = Vec::with_capacity(expected_counts(cols, rows, grid.duplicate_shear).total());
    let mut link = |a: usize, b: usize, stiffness: f32, kind: SpringKind| {
        springs.push(
            Spring::new(particles, a, b)
                .with_stiffness(stiffness)
                .with_kind(kind),
        );
    };

    for row in 0..rows {
        for col in 0..cols.saturating_sub(1) {
            link(grid.index(col, row), grid.index(col + 1, row), grid.structural_stiffness, SpringKind::Structural);
        }
    }
    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols {
            link(grid.index(col, row), grid.index(col, row + 1), grid.structural_stiffness, SpringKind::Structural);
        }
    }

    let shear_passes = if grid.duplicate_shear { 2 } else { 1 };
    for _ in 0..shear_passes {
        for row in 0..rows.saturating_sub(1) {
            for col in 0..cols.saturating_sub(1) {
                link(grid.index(col, row), grid.index(col + 1, row + 1), grid.shear_stiffness, SpringKind::Shear);
            }
        }
        for row in 0..rows.saturating_sub(1) {
            for col in 0..cols.saturating_sub(1) {
                link(grid.index(col, row + 1), grid.index(col + 1, row), grid.shear_stiffness, SpringKind::Shear);
            }
        }
    }

    for row in 0..rows {
        for col in 0..cols.saturating_sub(2) {
            link(grid.index(col, row), grid.index(col + 2, row), grid.bend_stiffness, SpringKind::Bend);
        }
    }
    for row in 0..rows.saturating_sub(2) {
        for col in 0..cols {
            link(grid.index(col, row), grid.index(col, row + 2), grid.bend_stiffness, SpringKind::Bend);
        }
    }

    springs
}

/// Number of springs in each link family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopologyCounts {
    pub structural: usize,
    pub shear: usize,
    pub bend: usize,
}

impl TopologyCounts {
    pub fn of(springs: &[Spring]) -> Self {
        let mut counts = Self::default();
        for spring in springs {
            match spring.kind {
                SpringKind::Structural => counts.structural += 1,
                SpringKind::Shear => counts.shear += 1,
                SpringKind::Bend => counts.bend += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.structural + self.shear + self.bend
    }
}

/// Counts a `cols` x `rows` grid produces
pub fn expected_counts(cols: usize, rows: usize, duplicate_shear: bool) -> TopologyCounts {
    let per_pass = 2 * cols.saturating_sub(1) * rows.saturating_sub(1);
    TopologyCounts {
        structural: rows * cols.saturating_sub(1) + cols * rows.saturating_sub(1),
        shear: if duplicate_shear { 2 * per_pass } else { per_pass },
        bend: rows * cols.saturating_sub(2) + cols * rows.saturating_sub(2),
    }
}
