//! Output module for simulated trajectories
//!
//! Two concerns, two submodules:
//! - **Export**: CSV files for programmatic analysis (pandas, MATLAB)
//! - **Plotting**: static PNG images for human inspection
//!
//! Both accept the [`SimulationOutput`](crate::session::SimulationOutput)
//! a session returns; [`plot_channel`] additionally takes raw `&[f64]`
//! slices for one-off plots.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fedbatch_rs::output::{export_trajectory_csv, plot_trajectory};
//!
//! let output = session.simulate(0.0, 24.0, initial, &feed)?;
//! export_trajectory_csv(&output, "run.csv", None)?;
//! plot_trajectory(&output, "run.png", None)?;
//! ```

mod csv;
mod plot;

pub use csv::{export_trajectory_csv, CsvConfig, CsvMetadata};
pub use plot::{plot_channel, plot_trajectory, PlotConfig};
