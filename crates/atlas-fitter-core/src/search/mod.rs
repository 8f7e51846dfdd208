//! Search internals: worker launch and the state shared between workers.

pub(crate) mod engine;
pub(crate) mod list;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::FitterConfig;
use crate::model::Bin;

use engine::{Limits, Worker};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls taken from the shared budget per refill. Large enough to amortize
/// the lock, small enough that workers observe new bests promptly.
pub(crate) const REFILL_SLICE: u64 = 512;

/// Where one area landed, indexed like the sorted area table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Placement {
    pub bin: usize,
    pub x: u32,
    pub y: u32,
}

/// The winning layout plus the remaining budget. Every field mutates under
/// one lock so workers see either the prior or the new tuple, never a mix.
pub(crate) struct SharedBest {
    pub calls_left: u64,
    pub best_out_size: u64,
    pub best_bin_count: usize,
    pub best_placements: Vec<Placement>,
    pub best_bins: Vec<Bin>,
}

/// State shared by all workers of one fitting run. Created and destroyed
/// inside the public entry point.
pub(crate) struct Globals {
    shared: Mutex<SharedBest>,
}

impl Globals {
    pub(crate) fn new(calls_limit: u64) -> Self {
        Self {
            shared: Mutex::new(SharedBest {
                calls_left: calls_limit,
                best_out_size: u64::MAX,
                best_bin_count: usize::MAX,
                best_placements: Vec::new(),
                best_bins: Vec::new(),
            }),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SharedBest> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn into_best(self) -> SharedBest {
        self.shared
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs the search, one worker by default. With `parallel` enabled (config
/// flag plus cargo feature) each worker promotes a different root area to
/// the front of its unfitted list so the explorations diverge immediately.
pub(crate) fn run_workers(
    areas: &[(u32, u32)],
    seed_bins: &[Bin],
    cfg: &FitterConfig,
    limits: Limits,
    globals: &Globals,
) {
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            let workers = areas.len().min(rayon::current_num_threads()).max(1);
            (0..workers).into_par_iter().for_each(|root| {
                Worker::new(areas, seed_bins, limits, cfg.min_bin_count, globals, root).run();
            });
            return;
        }
    }

    Worker::new(areas, seed_bins, limits, cfg.min_bin_count, globals, 0).run();
}
