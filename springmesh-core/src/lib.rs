//! Mass-spring cloth simulation against a ground plane and a sphere.

pub mod config;
pub mod engine;
pub mod error;
pub mod integrator;
pub mod obstacle;
pub mod runtime;
pub mod topology;

pub use config::{ContactParams, GridConfig, PhysicsParams, SimulationConfig};
pub use engine::{Particle, Spring, SpringKind, World, DEFAULT_STIFFNESS};
pub use error::{ConfigError, SimulationError};
pub use obstacle::{Obstacle, Plane, Sphere};
pub use runtime::{MeshStats, Simulation};
pub use topology::{build_particles, build_springs, expected_counts, TopologyCounts};
