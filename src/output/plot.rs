//! Static plot generation for simulated trajectories
//!
//! Renders the four state channels of a [`SimulationOutput`] to a PNG image
//! with `plotters`. Channels live on very different scales (oxygen in
//! percent, biomass in g/L), so the overlay plot normalizes each channel to
//! its own maximum; the single-channel plot keeps physical units.
//!
//! # Example
//!
//! ```rust,ignore
//! use fedbatch_rs::output::{plot_trajectory, PlotConfig};
//!
//! plot_trajectory(&output, "culture.png", None)?;
//!
//! let config = PlotConfig {
//!     title: "Fed-batch run 42".to_string(),
//!     ..Default::default()
//! };
//! plot_trajectory(&output, "run42.png", Some(&config))?;
//! ```

use plotters::prelude::*;

use crate::error::{Result, SimulationError};
use crate::session::SimulationOutput;

// =================================================================================================
// Configuration
// =================================================================================================

/// Configuration for trajectory plots.
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Fed-Batch Culture")
    pub title: String,

    /// X-axis label (default: "Time (h)")
    pub xlabel: String,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Fed-Batch Culture".to_string(),
            xlabel: "Time (h)".to_string(),
            background: WHITE,
            line_width: 2,
            show_grid: true,
        }
    }
}

/// Channel palette: oxygen, biomass, substrate, volume.
const CHANNEL_COLORS: [RGBColor; 4] = [BLUE, GREEN, RED, BLACK];
const CHANNEL_NAMES: [&str; 4] = ["Oxygen", "Biomass", "Substrate", "Volume"];

// =================================================================================================
// Helpers
// =================================================================================================

fn plot_error(e: impl std::fmt::Display) -> SimulationError {
    SimulationError::Plot(e.to_string())
}

fn validate(output: &SimulationOutput) -> Result<()> {
    if output.len() < 2 {
        return Err(SimulationError::validation(
            "plotting needs at least two samples",
        ));
    }
    Ok(())
}

/// Normalize a channel to [0, 1] by its own maximum magnitude.
fn normalized(values: &[f64]) -> Vec<f64> {
    let max = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if max == 0.0 {
        values.to_vec()
    } else {
        values.iter().map(|v| v / max).collect()
    }
}

// =================================================================================================
// Plotting
// =================================================================================================

/// Plot all four state channels of a trajectory, each normalized to its
/// own maximum so they share one axis.
pub fn plot_trajectory(
    output: &SimulationOutput,
    path: &str,
    config: Option<&PlotConfig>,
) -> Result<()> {
    validate(output)?;
    let default = PlotConfig::default();
    let config = config.unwrap_or(&default);

    let channels = [
        normalized(&output.oxygen),
        normalized(&output.biomass),
        normalized(&output.substrate),
        normalized(&output.volume),
    ];

    let t_min = output.times[0];
    let t_max = *output.times.last().expect("validated non-empty");

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&config.background).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 40.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(t_min..t_max, 0.0..1.1f64)
        .map_err(plot_error)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&config.xlabel).y_desc("Normalized value");
    if config.show_grid {
        mesh.draw().map_err(plot_error)?;
    } else {
        mesh.disable_mesh().draw().map_err(plot_error)?;
    }

    for (i, channel) in channels.iter().enumerate() {
        let color = CHANNEL_COLORS[i];
        chart
            .draw_series(LineSeries::new(
                output.times.iter().zip(channel.iter()).map(|(t, v)| (*t, *v)),
                color.stroke_width(config.line_width),
            ))
            .map_err(plot_error)?
            .label(CHANNEL_NAMES[i])
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Plot one channel in its physical units.
///
/// `values` is typically one of the [`SimulationOutput`] arrays; `ylabel`
/// names it on the axis.
pub fn plot_channel(
    times: &[f64],
    values: &[f64],
    ylabel: &str,
    path: &str,
    config: Option<&PlotConfig>,
) -> Result<()> {
    if times.len() != values.len() {
        return Err(SimulationError::validation(format!(
            "length mismatch: {} times versus {} values",
            times.len(),
            values.len()
        )));
    }
    if times.len() < 2 {
        return Err(SimulationError::validation(
            "plotting needs at least two samples",
        ));
    }

    let default = PlotConfig::default();
    let config = config.unwrap_or(&default);

    let t_min = times[0];
    let t_max = *times.last().expect("checked non-empty");
    let v_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let v_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let pad = 0.1 * (v_max - v_min).max(f64::MIN_POSITIVE);
    let y_min = (v_min - pad).max(0.0);
    let y_max = v_max + pad;

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&config.background).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 40.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(t_min..t_max, y_min..y_max)
        .map_err(plot_error)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&config.xlabel).y_desc(ylabel);
    if config.show_grid {
        mesh.draw().map_err(plot_error)?;
    } else {
        mesh.disable_mesh().draw().map_err(plot_error)?;
    }

    chart
        .draw_series(LineSeries::new(
            times.iter().zip(values.iter()).map(|(t, v)| (*t, *v)),
            BLUE.stroke_width(config.line_width),
        ))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
