//! CSV export for simulated trajectories
//!
//! Writes the parallel arrays of a [`SimulationOutput`] to a CSV file that
//! loads directly into Excel, pandas or MATLAB. An optional comment header
//! records the model, solver and run parameters so an exported file stays
//! interpretable on its own.
//!
//! # Quick Example
//!
//! ```rust,ignore
//! use fedbatch_rs::output::export_trajectory_csv;
//!
//! export_trajectory_csv(&output, "run.csv", None)?;
//! ```
//!
//! **Output** (`run.csv`):
//! ```csv
//! Time (h),Oxygen (% sat),Biomass (g/L),Substrate (g/L),Volume (L)
//! 0.000000,100.000000,0.100000,5.000000,1.000000
//! 0.100000,99.731482,0.104081,4.989790,1.005000
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SimulationError};
use crate::session::SimulationOutput;

// =================================================================================================
// Configuration
// =================================================================================================

/// Configuration for CSV export.
#[derive(Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Header label for the oxygen column (default: "Oxygen (% sat)")
    pub oxygen_header: String,

    /// Metadata written as `#`-prefixed comment lines before the header
    pub metadata: Option<CsvMetadata>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 6,
            oxygen_header: "Oxygen (% sat)".to_string(),
            metadata: None,
        }
    }
}

impl CsvConfig {
    /// Builder pattern: set precision.
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: attach metadata.
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Builder pattern: label the oxygen column, e.g. `"Oxygen (mg/L)"`
    /// when the session exchanges absolute concentrations.
    pub fn oxygen_header(mut self, header: impl Into<String>) -> Self {
        self.oxygen_header = header.into();
        self
    }
}

/// Metadata for the CSV comment header. Only populated fields are written.
#[derive(Clone, Default)]
pub struct CsvMetadata {
    /// Model name (e.g., "Monod fed-batch")
    pub model_name: Option<String>,

    /// Solver name (e.g., "Dormand-Prince 4(5) (adaptive)")
    pub solver_name: Option<String>,

    /// Feed flow rate F (L/h)
    pub flow_rate: Option<f64>,

    /// Feed substrate concentration S_in (g/L)
    pub substrate_in: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Metadata describing one run.
    pub fn from_run(model: &str, solver: &str, flow_rate: f64, substrate_in: f64) -> Self {
        Self {
            model_name: Some(model.to_string()),
            solver_name: Some(solver.to_string()),
            flow_rate: Some(flow_rate),
            substrate_in: Some(substrate_in),
            custom: Vec::new(),
        }
    }

    /// Add a custom parameter line.
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =================================================================================================
// Helpers
// =================================================================================================

fn write_metadata_header(out: &mut impl Write, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(out, "# Fed-Batch Bioreactor Simulation Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(out, "# Model: {}", model)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(out, "# Solver: {}", solver)?;
    }
    if let Some(flow) = metadata.flow_rate {
        writeln!(out, "# Feed Flow Rate: {} L/h", flow)?;
    }
    if let Some(s_in) = metadata.substrate_in {
        writeln!(out, "# Feed Substrate: {} g/L", s_in)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }
    writeln!(out, "#")?;

    Ok(())
}

// =================================================================================================
// Export
// =================================================================================================

/// Export a trajectory to CSV.
///
/// One row per sample: time, oxygen, biomass, substrate, volume. Passing
/// `None` for the configuration uses the defaults.
///
/// # Errors
///
/// [`Validation`](SimulationError::Validation) for an empty trajectory or
/// non-finite values; [`Export`](SimulationError::Export) for I/O failures.
pub fn export_trajectory_csv(
    output: &SimulationOutput,
    path: impl AsRef<Path>,
    config: Option<&CsvConfig>,
) -> Result<()> {
    if output.is_empty() {
        return Err(SimulationError::validation(
            "empty trajectory: nothing to export",
        ));
    }

    let columns: [(&str, &[f64]); 4] = [
        ("times", &output.times),
        ("biomass", &output.biomass),
        ("substrate", &output.substrate),
        ("volume", &output.volume),
    ];
    for (name, values) in columns {
        if values.len() != output.times.len() {
            return Err(SimulationError::validation(format!(
                "column length mismatch: {} holds {} values for {} times",
                name,
                values.len(),
                output.times.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::validation(format!(
                "non-finite value in {name} column"
            )));
        }
    }
    if output.oxygen.len() != output.times.len()
        || output.oxygen.iter().any(|v| !v.is_finite())
    {
        return Err(SimulationError::validation("invalid oxygen column"));
    }

    let default = CsvConfig::default();
    let config = config.unwrap_or(&default);

    let mut out = BufWriter::new(File::create(path)?);

    if let Some(metadata) = &config.metadata {
        write_metadata_header(&mut out, metadata)?;
    }

    let d = config.delimiter;
    writeln!(
        out,
        "Time (h){d}{}{d}Biomass (g/L){d}Substrate (g/L){d}Volume (L)",
        config.oxygen_header
    )?;

    let p = config.precision;
    for i in 0..output.times.len() {
        writeln!(
            out,
            "{:.p$}{d}{:.p$}{d}{:.p$}{d}{:.p$}{d}{:.p$}",
            output.times[i], output.oxygen[i], output.biomass[i], output.substrate[i],
            output.volume[i],
        )?;
    }

    out.flush()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_output() -> SimulationOutput {
        SimulationOutput {
            times: vec![0.0, 0.5, 1.0],
            oxygen: vec![100.0, 98.5, 97.25],
            biomass: vec![0.1, 0.12, 0.15],
            substrate: vec![5.0, 4.8, 4.5],
            volume: vec![1.0, 1.025, 1.05],
        }
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");

        export_trajectory_csv(&sample_output(), &path, None).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4); // header + 3 rows
        assert!(lines[0].starts_with("Time (h),Oxygen (% sat)"));
        assert!(lines[1].starts_with("0.000000,100.000000"));
    }

    #[test]
    fn test_export_with_metadata_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");

        let mut metadata = CsvMetadata::from_run("Monod fed-batch", "RK4 (fixed-step)", 0.05, 10.0);
        metadata.add_custom("Session".to_string(), "demo".to_string());
        let config = CsvConfig::default().with_metadata(metadata).precision(3);

        export_trajectory_csv(&sample_output(), &path, Some(&config)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Model: Monod fed-batch"));
        assert!(content.contains("# Feed Flow Rate: 0.05 L/h"));
        assert!(content.contains("# Session: demo"));
        assert!(content.contains("0.000,100.000"));
    }

    #[test]
    fn test_export_rejects_empty_trajectory() {
        let empty = SimulationOutput {
            times: vec![],
            oxygen: vec![],
            biomass: vec![],
            substrate: vec![],
            volume: vec![],
        };
        let err = export_trajectory_csv(&empty, "unused.csv", None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_export_rejects_nan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");

        let mut output = sample_output();
        output.biomass[1] = f64::NAN;

        let err = export_trajectory_csv(&output, &path, None).unwrap_err();
        assert!(err.is_validation());
        assert!(!path.exists(), "no file written for rejected data");
    }
}
