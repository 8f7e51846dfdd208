use serde::{Deserialize, Serialize};

/// An output bin's grown extent. Bins start at 0x0 and grow only as far as
/// the areas placed in them require; `size` always equals `width * height`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bin {
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

impl Bin {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            size: width as u64 * height as u64,
        }
    }
}

/// A placed area within the winning layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedArea<K = String> {
    /// Caller-supplied key; carried through the search unread.
    pub key: K,
    pub width: u32,
    pub height: u32,
    /// Index of the bin this area landed in.
    pub bin: usize,
    /// Offset within that bin.
    pub x: u32,
    pub y: u32,
}

/// Statistics about a completed fit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitStats {
    /// Number of bins in the winning layout (unused starting bins stay 0x0).
    pub num_bins: usize,
    /// Number of areas placed.
    pub num_areas: usize,
    /// Sum of bin sizes.
    pub total_bin_area: u64,
    /// Sum of area sizes.
    pub used_area: u64,
    /// used_area / total_bin_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
    /// Placement trials actually consumed out of the configured budget.
    pub fit_calls_used: u64,
}

impl FitStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Bins: {}, Areas: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px², Calls: {}",
            self.num_bins,
            self.num_areas,
            self.occupancy * 100.0,
            self.total_bin_area,
            self.used_area,
            self.fit_calls_used,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_bin_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_bin_area > 0 {
            (self.wasted_area() as f64 / self.total_bin_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
