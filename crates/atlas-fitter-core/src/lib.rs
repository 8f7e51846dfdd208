//! Core library for fitting rectangular areas into grown output bins.
//!
//! - Search: depth-first branch-and-bound over a guillotine free-rectangle
//!   partition, two split configurations per placement, incremental bin
//!   growth, on-demand bin creation
//! - Cost: primarily total bin area, secondarily bin count; quality is the
//!   ratio of placed area to bin area
//! - Budget: a hard cap on placement trials shared by all workers, so run
//!   time is bounded regardless of input
//!
//! Quick example:
//! ```
//! use atlas_fitter_core::prelude::*;
//! # fn main() -> atlas_fitter_core::Result<()> {
//! let items = vec![
//!     FitItem::new("a", 50, 30),
//!     FitItem::new("b", 250, 60),
//!     FitItem::new("c", 30, 260),
//!     FitItem::new("d", 80, 80),
//! ];
//! let cfg = FitterConfig {
//!     max_width: 300,
//!     max_height: 300,
//!     fit_calls_limit: 10_000,
//!     ..Default::default()
//! };
//! let out = fit_areas(items, &cfg)?;
//! println!("bins: {}, quality: {:.1}%", out.bins.len(), out.quality);
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;

mod search;

pub use config::*;
pub use error::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `atlas_fitter_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{FitterConfig, FitterConfigBuilder};
    pub use crate::error::{FitError, Result};
    pub use crate::model::{Bin, FitStats, PlacedArea};
    pub use crate::pipeline::{fit_areas, fit_areas_into, FitItem, FitOutput};
}
