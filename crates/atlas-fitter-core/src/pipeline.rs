use crate::config::FitterConfig;
use crate::error::{FitError, Result};
use crate::model::{Bin, FitStats, PlacedArea};
use crate::search::{self, engine::Limits, Globals};
use tracing::{debug, instrument};

/// An area to fit (key + dimensions). Bake any inter-item padding into the
/// dimensions; the engine never looks at the key.
#[derive(Debug, Clone)]
pub struct FitItem<K = String> {
    pub key: K,
    pub width: u32,
    pub height: u32,
}

impl<K> FitItem<K> {
    pub fn new(key: K, width: u32, height: u32) -> Self {
        Self { key, width, height }
    }
}

/// Output of a fitting run: placed areas in `(bin, x, y)` order, the grown
/// bins, and the quality ratio.
#[derive(Debug, Clone)]
pub struct FitOutput<K = String> {
    pub areas: Vec<PlacedArea<K>>,
    pub bins: Vec<Bin>,
    /// `100 * (sum of area sizes) / (sum of bin sizes)`; 100 means the
    /// packing is minimum-area optimal.
    pub quality: f64,
    /// Placement trials consumed out of the configured budget.
    pub fit_calls_used: u64,
}

impl<K> FitOutput<K> {
    /// Computes packing statistics for this layout.
    pub fn stats(&self) -> FitStats {
        let total_bin_area: u64 = self.bins.iter().map(|b| b.size).sum();
        let used_area: u64 = self
            .areas
            .iter()
            .map(|a| a.width as u64 * a.height as u64)
            .sum();
        let occupancy = if total_bin_area > 0 {
            used_area as f64 / total_bin_area as f64
        } else {
            0.0
        };
        FitStats {
            num_bins: self.bins.len(),
            num_areas: self.areas.len(),
            total_bin_area,
            used_area,
            occupancy,
            fit_calls_used: self.fit_calls_used,
        }
    }
}

/// Fits `items` into as few, as small bins as the call budget allows,
/// starting from `min_bin_count` empty bins.
///
/// Returns `FitError::BudgetExhausted` when the budget ran out before any
/// complete placement; retry with a larger `fit_calls_limit` and/or a larger
/// `min_bin_count`.
#[instrument(skip_all, fields(num_areas = items.len()))]
pub fn fit_areas<K>(items: Vec<FitItem<K>>, cfg: &FitterConfig) -> Result<FitOutput<K>> {
    fit_areas_into(items, Vec::new(), cfg)
}

/// Like [`fit_areas`], with an initial bin list. Seed dimensions are
/// upper-bound hints for the starting free space, not lower bounds: bins
/// still grow from 0x0, and a zero dimension opens the full configured
/// extent.
#[instrument(skip_all, fields(num_areas = items.len(), seed_bins = seed_bins.len()))]
pub fn fit_areas_into<K>(
    mut items: Vec<FitItem<K>>,
    seed_bins: Vec<Bin>,
    cfg: &FitterConfig,
) -> Result<FitOutput<K>> {
    cfg.validate()?;

    if items.is_empty() {
        return Ok(FitOutput {
            areas: Vec::new(),
            bins: Vec::new(),
            quality: 100.0,
            fit_calls_used: 0,
        });
    }
    if items.len() == 1 {
        // A single area occupies the origin of a bin sized exactly to it,
        // regardless of the configured caps.
        let it = items.remove(0);
        let bin = Bin::new(it.width, it.height);
        return Ok(FitOutput {
            areas: vec![PlacedArea {
                key: it.key,
                width: it.width,
                height: it.height,
                bin: 0,
                x: 0,
                y: 0,
            }],
            bins: vec![bin],
            quality: 100.0,
            fit_calls_used: 0,
        });
    }

    // Widest first; stable so equal widths keep input order.
    items.sort_by(|a, b| b.width.cmp(&a.width));
    let dims: Vec<(u32, u32)> = items.iter().map(|it| (it.width, it.height)).collect();
    let min_out_size: u64 = dims.iter().map(|&(w, h)| w as u64 * h as u64).sum();
    let largest_area = dims
        .iter()
        .map(|&(w, h)| w as u64 * h as u64)
        .max()
        .unwrap_or(0);
    let limits = Limits {
        max_width: cfg.max_width,
        max_height: cfg.max_height,
        max_bin_size: cfg.max_bin_size.max(largest_area),
    };

    let globals = Globals::new(cfg.fit_calls_limit);
    search::run_workers(&dims, &seed_bins, cfg, limits, &globals);
    let best = globals.into_best();

    if best.best_out_size == u64::MAX {
        return Err(FitError::BudgetExhausted {
            calls_limit: cfg.fit_calls_limit,
        });
    }

    let mut areas: Vec<PlacedArea<K>> = items
        .into_iter()
        .zip(best.best_placements.iter())
        .map(|(it, p)| PlacedArea {
            key: it.key,
            width: it.width,
            height: it.height,
            bin: p.bin,
            x: p.x,
            y: p.y,
        })
        .collect();
    areas.sort_by(|a, b| (a.bin, a.x, a.y).cmp(&(b.bin, b.x, b.y)));

    let quality = if best.best_out_size == 0 {
        100.0
    } else {
        100.0 * min_out_size as f64 / best.best_out_size as f64
    };
    let fit_calls_used = cfg.fit_calls_limit.saturating_sub(best.calls_left);
    debug!(
        quality,
        bins = best.best_bins.len(),
        fit_calls_used,
        "fit complete"
    );

    Ok(FitOutput {
        areas,
        bins: best.best_bins,
        quality,
        fit_calls_used,
    })
}
