use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Mesh file format written for each label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// VTK XML PolyData
    Vtp,
    /// Binary stereolithography
    Stl,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Vtp => "vtp",
            OutputFormat::Stl => "stl",
        }
    }
}

/// Full set of pipeline parameters. Persisted next to the output meshes so a
/// run can be reproduced from its sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing the input NIfTI files
    pub input_dir: PathBuf,
    /// Voxel edge length after isotropic resampling
    pub voxel_resample_length: f32,
    /// Voxel radius of the ball kernel used to close the label masks
    pub closing_radius: u32,
    /// Radial distance a vertex may move during smoothing
    pub smoothing_distance: f32,
    /// Smoothing relaxation factor; lower is more stable but needs more iterations
    pub smoothing_relaxation_factor: f32,
    /// Number of smoothing iterations
    pub smoothing_iterations: u32,
    /// Number of remeshing iterations
    pub remesh_iterations: u32,
    /// Target edge length after uniform remeshing
    pub remesh_edge_length: f32,
    /// Output directory for meshes and the config sidecar
    pub output_dir: PathBuf,
    /// Output mesh format
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::from("."),
            voxel_resample_length: 0.3,
            closing_radius: 3,
            smoothing_distance: 0.3,
            smoothing_relaxation_factor: 0.01,
            smoothing_iterations: 1000,
            remesh_iterations: 10,
            remesh_edge_length: 1.0,
            output_dir: PathBuf::from("output"),
            output_format: OutputFormat::Vtp,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {:?}: {}", path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| format!("Invalid config file {:?}: {}", path, e).into())
    }

    /// Write the effective configuration as `config.json` into the output
    /// directory.
    pub fn write_sidecar(&self, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let path = dir.join("config.json");
        let file = File::create(&path)
            .map_err(|e| format!("Failed to create {:?}: {}", path, e))?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| format!("Failed to write {:?}: {}", path, e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.voxel_resample_length, 0.3);
        assert_eq!(config.closing_radius, 3);
        assert_eq!(config.smoothing_distance, 0.3);
        assert_eq!(config.smoothing_relaxation_factor, 0.01);
        assert_eq!(config.smoothing_iterations, 1000);
        assert_eq!(config.remesh_iterations, 10);
        assert_eq!(config.remesh_edge_length, 1.0);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.output_format, OutputFormat::Vtp);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "output_format": "stl", "closing_radius": 5 }"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Stl);
        assert_eq!(config.closing_radius, 5);
        assert_eq!(config.voxel_resample_length, 0.3);
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config {
            input_dir: PathBuf::from("scans"),
            output_format: OutputFormat::Stl,
            ..Config::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.input_dir, config.input_dir);
        assert_eq!(parsed.output_format, config.output_format);
        assert_eq!(parsed.smoothing_iterations, config.smoothing_iterations);
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Vtp.extension(), "vtp");
        assert_eq!(OutputFormat::Stl.extension(), "stl");
    }
}
