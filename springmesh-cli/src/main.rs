use clap::{Parser, Subcommand};
use springmesh_core::{MeshStats, Simulation};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod viewer;

#[derive(Parser)]
#[command(name = "springmesh")]
#[command(about = "Springmesh - mass-spring cloth simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless and print the final mesh state
    Run {
        /// TOML config file (defaults to the built-in scene)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to advance
        #[arg(short, long, default_value_t = 300)]
        frames: u32,
        /// Frame time in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
    },
    /// Check a TOML config file
    Validate {
        /// Path to the config file
        file: PathBuf,
    },
    /// Open the interactive viewer
    View {
        /// TOML config file, reloaded when it changes on disk
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, frames, dt } => run(config.as_ref(), frames, dt),
        Commands::Validate { file } => validate(&file),
        Commands::View { config } => viewer::launch(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Option<&PathBuf>, frames: u32, dt: f32) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load(config)?;
    let mut sim = Simulation::new(config)?;

    for _ in 0..frames {
        sim.advance(dt);
    }

    if !sim.is_finite() {
        return Err("simulation diverged; try a smaller dt or more substeps".into());
    }
    print_stats(&sim.stats(), sim.elapsed());
    Ok(())
}

fn validate(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load(Some(file))?;
    println!(
        "{}: ok ({}x{} grid, {} substeps)",
        file.display(),
        config.grid.cols,
        config.grid.rows,
        config.physics.substeps
    );
    Ok(())
}

fn print_stats(stats: &MeshStats, elapsed: f32) {
    println!("elapsed = {}", elapsed);
    println!(
        "centroid = ({}, {}, {})",
        stats.centroid.x, stats.centroid.y, stats.centroid.z
    );
    println!("min_height = {}", stats.min_height);
    println!("max_speed = {}", stats.max_speed);
    println!("kinetic_energy = {}", stats.kinetic_energy);
    println!(
        "momentum = ({}, {}, {})",
        stats.momentum.x, stats.momentum.y, stats.momentum.z
    );
}
