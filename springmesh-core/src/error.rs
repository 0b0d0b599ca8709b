use thiserror::Error;

/// A configuration the simulation refuses to build from
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 2x2, got {cols}x{rows}")]
    GridTooSmall { cols: usize, rows: usize },
    #[error("particle mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    #[error("grid spacing must be positive and finite, got {0}")]
    InvalidSpacing(f32),
    #[error("substeps per advance must be at least 1")]
    ZeroSubsteps,
    #[error("ground plane normal has zero length")]
    DegeneratePlaneNormal,
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("{name} must be non-negative and finite, got {value}")]
    NegativeCoefficient { name: &'static str, value: f32 },
    #[error("pinned particle {index} out of bounds (count: {count})")]
    PinnedOutOfBounds { index: usize, count: usize },
}

/// Errors raised at the simulation's host-facing edges
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("particle index {index} out of bounds (count: {count})")]
    ParticleOutOfBounds { index: usize, count: usize },
}
