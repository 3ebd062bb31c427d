use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod output;
mod pipeline;
mod surface;
mod volume;

use config::{Config, OutputFormat};

#[derive(Parser)]
#[command(name = "niimesh")]
#[command(about = "Convert NIfTI label volumes to surface meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a directory of NIfTI label volumes into surface meshes
    Convert(ConvertArgs),

    /// Display NIfTI volume statistics
    Info {
        /// Input NIfTI file (.nii or .nii.gz)
        input: PathBuf,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Path to a JSON configuration file (flags below override its settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the input NIfTI files
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Voxel edge length after isotropic resampling
    #[arg(long)]
    voxel_resample_length: Option<f32>,

    /// Voxel radius of the ball kernel used to close the label masks
    #[arg(long)]
    closing_radius: Option<u32>,

    /// Radial distance a vertex may move during smoothing
    #[arg(long)]
    smoothing_distance: Option<f32>,

    /// Smoothing relaxation factor; lower is more stable but needs more iterations
    #[arg(long)]
    smoothing_relaxation_factor: Option<f32>,

    /// Number of smoothing iterations
    #[arg(long)]
    smoothing_iterations: Option<u32>,

    /// Number of remeshing iterations
    #[arg(long)]
    remesh_iterations: Option<u32>,

    /// Target edge length after uniform remeshing
    #[arg(long)]
    remesh_edge_length: Option<f32>,

    /// Output directory for meshes and the config sidecar
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output mesh format
    #[arg(long, value_enum)]
    output_format: Option<OutputFormat>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => {
            let result = resolve_config(args).and_then(|config| pipeline::convert(&config));
            if let Err(e) = result {
                eprintln!("Error during conversion: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Info { input } => {
            if let Err(e) = pipeline::info(&input) {
                eprintln!("Error reading volume: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Start from the config file (or defaults) and apply flag overrides.
fn resolve_config(args: ConvertArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(value) = args.input_dir {
        config.input_dir = value;
    }
    if let Some(value) = args.voxel_resample_length {
        config.voxel_resample_length = value;
    }
    if let Some(value) = args.closing_radius {
        config.closing_radius = value;
    }
    if let Some(value) = args.smoothing_distance {
        config.smoothing_distance = value;
    }
    if let Some(value) = args.smoothing_relaxation_factor {
        config.smoothing_relaxation_factor = value;
    }
    if let Some(value) = args.smoothing_iterations {
        config.smoothing_iterations = value;
    }
    if let Some(value) = args.remesh_iterations {
        config.remesh_iterations = value;
    }
    if let Some(value) = args.remesh_edge_length {
        config.remesh_edge_length = value;
    }
    if let Some(value) = args.output_dir {
        config.output_dir = value;
    }
    if let Some(value) = args.output_format {
        config.output_format = value;
    }

    Ok(config)
}
